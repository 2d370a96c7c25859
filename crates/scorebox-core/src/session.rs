//! Plot session state machine
//!
//! A session owns everything the plot needs between events:
//! - The results source and the cheater list
//! - The loaded dataset and its per-player statistics
//! - Scales, view transform and the retained scene
//! - The transition clock
//!
//! Events are applied one at a time through [`PlotSession::handle`]. A load
//! that fails leaves the session exactly as it was.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::axis::Axis;
use crate::config::PlotConfig;
use crate::error::{DatasetResult, SceneError, SceneResult, ScoreboxResult};
use crate::render::{BoxPlotRenderer, PlayerStats, PlotScales};
use crate::scene::{JoinSummary, Scene};
use crate::view::ViewTransform;
use scorebox_io::{CheaterSet, IoError, ResultsDataset, ResultsSource, SkippedRecord};

/// Input events driving the plot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlotEvent {
    /// Load the named dataset and redraw every player
    LoadDataset(String),
    /// Pan/zoom the player axis
    Transform(ViewTransform),
    /// Drop the scene and view, then reload the selected dataset
    Reset,
    /// Move the transition clock forward
    Advance(f64),
}

/// Outcome of a successful dataset load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadReport {
    pub dataset: String,
    pub players: usize,
    /// Rows rejected in lenient mode
    pub skipped: Vec<SkippedRecord>,
    pub join: JoinSummary,
}

/// Interactive box plot over one results source
pub struct PlotSession<S: ResultsSource> {
    id: String,
    created_at: String,
    config: PlotConfig,
    source: S,
    cheaters: CheaterSet,
    dataset: Option<ResultsDataset>,
    selected: Option<String>,
    players: Vec<PlayerStats>,
    scales: PlotScales,
    renderer: BoxPlotRenderer,
    transform: ViewTransform,
    scene: Scene,
    clock: f64,
    last_report: Option<LoadReport>,
}

impl<S: ResultsSource> PlotSession<S> {
    /// Create a session and read the cheater list
    ///
    /// A missing cheater list is not an error: every player then uses the
    /// regular palette.
    pub fn new(config: PlotConfig, source: S) -> ScoreboxResult<Self> {
        config.validate()?;
        let scales = PlotScales::from_config(&config)?;

        let cheaters = match source.load_cheaters() {
            Ok(set) => set,
            Err(IoError::FileNotFound(path)) => {
                warn!("Cheater list {} not found, using regular palette only", path);
                CheaterSet::new()
            }
            Err(e) => return Err(crate::error::DatasetError::from(e).into()),
        };

        let id = uuid::Uuid::new_v4().to_string();
        info!(
            "Created plot session {} on {} source with {} cheaters",
            id,
            source.source_name(),
            cheaters.len()
        );

        Ok(Self {
            id,
            created_at: chrono::Utc::now().to_rfc3339(),
            renderer: BoxPlotRenderer::new(config.style.clone()),
            config,
            source,
            cheaters,
            dataset: None,
            selected: None,
            players: Vec::new(),
            scales,
            transform: ViewTransform::identity(),
            scene: Scene::new(),
            clock: 0.0,
            last_report: None,
        })
    }

    /// Apply one event
    pub fn handle(&mut self, event: PlotEvent) -> ScoreboxResult<()> {
        match event {
            PlotEvent::LoadDataset(name) => {
                self.load_dataset(&name)?;
            }
            PlotEvent::Transform(transform) => self.apply_transform(transform)?,
            PlotEvent::Reset => {
                self.reset()?;
            }
            PlotEvent::Advance(now) => self.advance_to(now)?,
        }
        Ok(())
    }

    /// Load `name`, recompute every domain and join the new groups
    pub fn load_dataset(&mut self, name: &str) -> DatasetResult<LoadReport> {
        let (dataset, players) = self.fetch(name)?;
        let report = self.commit(name, dataset, players);
        Ok(report)
    }

    /// Apply a pan/zoom
    ///
    /// Only the player axis and the container move; statistics, the value
    /// axis domain and the primitives themselves are left alone.
    pub fn apply_transform(&mut self, transform: ViewTransform) -> SceneResult<()> {
        transform.validate()?;
        self.transform = transform;
        self.scene.set_container(transform);
        self.redraw_axes();
        debug!(
            "Applied view transform translate=({}, {}) scale={}",
            transform.translate[0], transform.translate[1], transform.scale
        );
        Ok(())
    }

    /// Discard the scene and view, rebuild scales from configuration and
    /// reload the selected dataset (or the default one)
    pub fn reset(&mut self) -> ScoreboxResult<LoadReport> {
        let name = self
            .selected
            .clone()
            .unwrap_or_else(|| self.config.data.default_dataset.clone());
        let (dataset, players) = self.fetch(&name)?;

        info!("Resetting view and reloading {}", name);
        self.scene.clear();
        self.transform = ViewTransform::identity();
        self.scales = PlotScales::from_config(&self.config)?;
        Ok(self.commit(&name, dataset, players))
    }

    /// Move the clock to `now` and drop groups that finished fading out
    ///
    /// The clock never runs backwards; a non-finite time is rejected.
    pub fn advance_to(&mut self, now: f64) -> SceneResult<()> {
        if !now.is_finite() {
            return Err(SceneError::InvalidClock { value: now });
        }
        if now < self.clock {
            warn!("Ignoring clock step back from {} to {}", self.clock, now);
            return Ok(());
        }
        self.clock = now;
        let removed = self.scene.prune(now);
        if removed > 0 {
            debug!("Removed {} faded groups at t={}", removed, now);
        }
        Ok(())
    }

    /// Advance the clock past every running transition
    pub fn settle(&mut self) -> SceneResult<()> {
        let target = self.clock + self.config.transition.duration;
        self.advance_to(target)
    }

    fn fetch(&self, name: &str) -> DatasetResult<(ResultsDataset, Vec<PlayerStats>)> {
        let dataset = self
            .source
            .load_results(name, &self.config.load_options())
            .map_err(|e| {
                warn!("Failed to load dataset {}: {}", name, e);
                e
            })?;
        let players = PlayerStats::compute_all(
            &dataset.players,
            &self.cheaters,
            self.config.stats.whisker_multiplier,
        )?;
        Ok((dataset, players))
    }

    fn commit(
        &mut self,
        name: &str,
        dataset: ResultsDataset,
        players: Vec<PlayerStats>,
    ) -> LoadReport {
        self.players = players;
        self.scales.fit(&self.players);

        let groups = self.renderer.render_all(&self.players, &self.scales);
        let join = self
            .scene
            .join(groups, self.clock, self.config.transition.duration);
        self.scene.set_container(self.transform);
        self.redraw_axes();

        info!(
            "Loaded dataset {} with {} players ({} skipped)",
            name,
            self.players.len(),
            dataset.skipped.len()
        );
        debug!(
            "Scene join: {} entered, {} updated, {} exited",
            join.entered, join.updated, join.exited
        );

        let report = LoadReport {
            dataset: name.to_string(),
            players: self.players.len(),
            skipped: dataset.skipped.clone(),
            join,
        };
        self.selected = Some(name.to_string());
        self.dataset = Some(dataset);
        self.last_report = Some(report.clone());
        report
    }

    fn redraw_axes(&mut self) {
        let canvas = &self.config.canvas;
        let style = &self.config.axis;
        let x_axis = Axis::band(&self.scales.x, &self.transform, canvas, style);
        let y_axis = Axis::linear(&self.scales.y, canvas, style);
        self.scene.set_axes(x_axis, y_axis);
    }

    /// Unique session identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Creation time, RFC 3339
    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn transform(&self) -> &ViewTransform {
        &self.transform
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scales(&self) -> &PlotScales {
        &self.scales
    }

    /// Statistics of the current dataset, in file order
    pub fn players(&self) -> &[PlayerStats] {
        &self.players
    }

    pub fn player(&self, identifier: &str) -> Option<&PlayerStats> {
        self.players.iter().find(|p| p.identifier == identifier)
    }

    pub fn dataset(&self) -> Option<&ResultsDataset> {
        self.dataset.as_ref()
    }

    /// Name of the dataset last loaded successfully
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn cheaters(&self) -> &CheaterSet {
        &self.cheaters
    }

    pub fn last_report(&self) -> Option<&LoadReport> {
        self.last_report.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scorebox_io::MemorySource;

    fn source() -> MemorySource {
        MemorySource::new()
            .with_results(
                "first",
                "player,scores\nA,\"[1,2,3,100]\"\nB,\"[5,6,7,8]\"\nC,\"[2,4,6,8]\"\n",
            )
            .with_results("second", "player,scores\nB,\"[5,6,7,8]\"\nD,\"[1,1,1]\"\n")
            .with_cheaters("player\nB\n")
    }

    #[test]
    fn test_new_session() {
        let session = PlotSession::new(PlotConfig::default(), source()).unwrap();
        assert!(!session.id().is_empty());
        assert!(session.cheaters().contains("B"));
        assert!(session.selected().is_none());
        assert!(session.scene().groups().is_empty());
    }

    #[test]
    fn test_missing_cheaters_is_empty_set() {
        let source = MemorySource::new().with_results("first", "player,scores\nA,\"[1]\"\n");
        let session = PlotSession::new(PlotConfig::default(), source).unwrap();
        assert!(session.cheaters().is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = PlotConfig::default();
        config.stats.turns = 0;
        assert!(PlotSession::new(config, source()).is_err());
    }

    #[test]
    fn test_load_dataset() {
        let mut session = PlotSession::new(PlotConfig::default(), source()).unwrap();
        let report = session.load_dataset("first").unwrap();

        assert_eq!(report.players, 3);
        assert_eq!(report.join.entered, 3);
        assert_eq!(session.selected(), Some("first"));
        assert!(session.player("B").unwrap().cheater);
        assert_eq!(session.scene().axis_redraws(), (1, 1));
        assert_eq!(
            session.scene().x_axis().unwrap().labels(),
            vec!["A", "B", "C"]
        );
    }

    #[test]
    fn test_failed_load_keeps_state() {
        let mut session = PlotSession::new(PlotConfig::default(), source()).unwrap();
        session.load_dataset("first").unwrap();
        let before = session.scene().groups().to_vec();

        assert!(session.load_dataset("missing").is_err());
        assert_eq!(session.selected(), Some("first"));
        assert_eq!(session.scene().groups(), before.as_slice());
        assert_eq!(session.scene().axis_redraws(), (1, 1));
    }

    #[test]
    fn test_transform_moves_container_and_axis() {
        let mut session = PlotSession::new(PlotConfig::default(), source()).unwrap();
        session.load_dataset("first").unwrap();
        let tick_before = session.scene().x_axis().unwrap().ticks[0].position;

        session
            .handle(PlotEvent::Transform(ViewTransform::new([-100.0, 0.0], 2.0)))
            .unwrap();
        assert_eq!(
            session.scene().container().container_attr(),
            "translate(-100,0) scale(2,1)"
        );
        assert_eq!(session.scene().axis_redraws(), (2, 2));
        let tick_after = session.scene().x_axis().unwrap().ticks[0].position;
        assert!(tick_after > tick_before);
    }

    #[test]
    fn test_invalid_transform_rejected() {
        let mut session = PlotSession::new(PlotConfig::default(), source()).unwrap();
        let err = session.apply_transform(ViewTransform::new([0.0, 0.0], -1.0));
        assert!(err.is_err());
        assert!(session.transform().is_identity());
    }

    #[test]
    fn test_reset_restores_identity() {
        let mut session = PlotSession::new(PlotConfig::default(), source()).unwrap();
        session.load_dataset("second").unwrap();
        session
            .apply_transform(ViewTransform::new([40.0, 0.0], 3.0))
            .unwrap();

        let report = session.reset().unwrap();
        assert_eq!(report.dataset, "second");
        assert_eq!(report.join.entered, 2);
        assert!(session.transform().is_identity());
        assert!(session.scene().container().is_identity());
    }

    #[test]
    fn test_clock_only_moves_forward() {
        let mut session = PlotSession::new(PlotConfig::default(), source()).unwrap();
        session.handle(PlotEvent::Advance(500.0)).unwrap();
        session.handle(PlotEvent::Advance(100.0)).unwrap();
        assert_eq!(session.clock(), 500.0);
        session.settle().unwrap();
        assert_eq!(session.clock(), 1500.0);
    }

    #[test]
    fn test_non_finite_clock_rejected() {
        let mut session = PlotSession::new(PlotConfig::default(), source()).unwrap();
        session.handle(PlotEvent::Advance(200.0)).unwrap();

        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(session.handle(PlotEvent::Advance(bad)).is_err());
            assert_eq!(session.clock(), 200.0);
        }

        // Later transitions still start from a usable clock
        session.load_dataset("first").unwrap();
        session.advance_to(5000.0).unwrap();
        let a = session.scene().group("A").unwrap();
        assert!(a.primitives.iter().all(|p| p.opacity_at(5000.0) == 1.0));
    }
}
