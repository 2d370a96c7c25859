//! scorebox - render a tournament score box plot
//!
//! Loads one or more results datasets, applies an optional pan/zoom and
//! reset, then writes the scene as SVG sampled at a chosen clock time.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use scorebox_core::{export, ExportConfig, PlotConfig, PlotEvent, PlotSession, ViewTransform};
use scorebox_io::DirectorySource;

#[derive(Parser, Debug)]
#[command(name = "scorebox")]
#[command(about = "Box-and-whisker plot of player score distributions")]
#[command(version)]
struct Cli {
    /// Configuration file (TOML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the results and cheater CSV files
    #[arg(short = 'd', long)]
    data_dir: Option<PathBuf>,

    /// Dataset to load, without the .csv suffix; repeat to switch datasets
    #[arg(long = "dataset")]
    datasets: Vec<String>,

    /// Zoom factor applied to the player axis
    #[arg(long)]
    zoom: Option<f64>,

    /// Horizontal pan in pixels
    #[arg(long, allow_hyphen_values = true)]
    pan: Option<f64>,

    /// Reset the view and reload after the other events
    #[arg(long)]
    reset: bool,

    /// Clock time between consecutive events
    #[arg(long, default_value = "0")]
    step: f64,

    /// Clock time to sample the scene at (default: after all transitions)
    #[arg(long)]
    at: Option<f64>,

    /// Reject the whole dataset on the first bad row
    #[arg(long)]
    strict: bool,

    /// SVG output file
    #[arg(short, long, default_value = "scorebox.svg")]
    output: PathBuf,

    /// Also write per-player statistics as JSON
    #[arg(long)]
    stats_json: Option<PathBuf>,
}

impl Cli {
    /// Apply command line overrides on top of the loaded configuration
    fn apply_overrides(&self, config: &mut PlotConfig) {
        if let Some(dir) = &self.data_dir {
            config.data.directory = dir.clone();
        }
        if self.strict {
            config.data.strict = true;
        }
    }

    /// Scripted event sequence, in application order
    fn events(&self, default_dataset: &str) -> Vec<PlotEvent> {
        let mut events = Vec::new();
        let mut clock = 0.0;
        let mut tick = |events: &mut Vec<PlotEvent>, event: PlotEvent| {
            events.push(event);
            if self.step > 0.0 {
                clock += self.step;
                events.push(PlotEvent::Advance(clock));
            }
        };

        if self.datasets.is_empty() {
            tick(&mut events, PlotEvent::LoadDataset(default_dataset.to_string()));
        }
        for name in &self.datasets {
            tick(&mut events, PlotEvent::LoadDataset(name.clone()));
        }

        if self.zoom.is_some() || self.pan.is_some() {
            let transform =
                ViewTransform::new([self.pan.unwrap_or(0.0), 0.0], self.zoom.unwrap_or(1.0));
            tick(&mut events, PlotEvent::Transform(transform));
        }
        if self.reset {
            tick(&mut events, PlotEvent::Reset);
        }
        if let Some(at) = self.at {
            events.push(PlotEvent::Advance(at));
        }
        events
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = PlotConfig::load_or_default(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    let source = DirectorySource::new(&config.data.directory)
        .with_cheaters_file(config.data.cheaters_file.clone());
    let events = cli.events(&config.data.default_dataset);
    let export_config = ExportConfig::from_canvas(&config.canvas);

    let mut session = PlotSession::new(config, source)?;
    for event in events {
        session.handle(event)?;
    }
    if cli.at.is_none() {
        session.settle()?;
    }

    let output = export::export(&session, &export_config, &cli.output)?;
    info!("Wrote {} ({} bytes)", output.path.display(), output.size);

    if let Some(path) = &cli.stats_json {
        let output = export::export(&session, &ExportConfig::json(), path)?;
        info!("Wrote {} ({} bytes)", output.path.display(), output.size);
    }

    Ok(())
}
