//! Figure export functionality
//!
//! Supports exporting the plot to:
//! - SVG: the scene sampled at a clock time, axes included
//! - JSON: per-player box statistics with session metadata

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::axis::{Axis, AxisPosition};
use crate::config::CanvasConfig;
use crate::error::{validation, ExportError, ExportResult};
use crate::scene::{Primitive, Scene, Shape};
use crate::session::PlotSession;
use scorebox_io::ResultsSource;
use scorebox_stats::BoxStats;

/// Export format for figures
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    /// SVG scalable vector graphics
    Svg,
    /// Box statistics as JSON
    Json,
}

impl ExportFormat {
    /// Get file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Svg => "svg",
            ExportFormat::Json => "json",
        }
    }

    /// Get MIME type for this format
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Svg => "image/svg+xml",
            ExportFormat::Json => "application/json",
        }
    }
}

/// Export configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Output format
    pub format: ExportFormat,

    /// Canvas width in pixels
    pub width: f64,

    /// Canvas height in pixels
    pub height: f64,

    /// Clock time to sample opacities at (None = session clock)
    pub time: Option<f64>,

    /// Whether to include axes and labels
    pub include_axes: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::Svg,
            width: 960.0,
            height: 600.0,
            time: None,
            include_axes: true,
        }
    }
}

impl ExportConfig {
    /// Create config for SVG export
    pub fn svg(width: f64, height: f64) -> Self {
        Self {
            format: ExportFormat::Svg,
            width,
            height,
            ..Default::default()
        }
    }

    /// Create config for statistics export
    pub fn json() -> Self {
        Self {
            format: ExportFormat::Json,
            ..Default::default()
        }
    }

    /// SVG export sized like the plot canvas
    pub fn from_canvas(canvas: &CanvasConfig) -> Self {
        Self::svg(canvas.width, canvas.height)
    }

    /// Sample the scene at a fixed clock time
    pub fn with_time(mut self, time: f64) -> Self {
        self.time = Some(time);
        self
    }

    /// Leave the axes out
    pub fn without_axes(mut self) -> Self {
        self.include_axes = false;
        self
    }

    /// Get suggested filename based on format
    pub fn suggested_filename(&self, base: &str) -> String {
        format!("{}.{}", base, self.format.extension())
    }
}

/// Metadata about the export
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    /// Creation timestamp (ISO 8601)
    pub created_at: String,

    /// Source session ID
    pub session_id: Option<String>,

    /// Dataset name
    pub dataset_name: Option<String>,

    /// Number of players exported
    pub player_count: usize,

    /// Software version
    pub software_version: String,
}

impl Default for ExportMetadata {
    fn default() -> Self {
        Self {
            created_at: chrono::Utc::now().to_rfc3339(),
            session_id: None,
            dataset_name: None,
            player_count: 0,
            software_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// A written export
#[derive(Clone, Debug)]
pub struct ExportOutput {
    pub path: PathBuf,
    pub format: ExportFormat,
    /// Bytes written
    pub size: usize,
    pub metadata: ExportMetadata,
}

#[derive(Serialize)]
struct PlayerSummary<'a> {
    identifier: &'a str,
    cheater: bool,
    #[serde(flatten)]
    stats: &'a BoxStats,
}

#[derive(Serialize)]
struct StatisticsDocument<'a> {
    metadata: &'a ExportMetadata,
    players: Vec<PlayerSummary<'a>>,
}

fn metadata_for<S: ResultsSource>(session: &PlotSession<S>) -> ExportMetadata {
    ExportMetadata {
        session_id: Some(session.id().to_string()),
        dataset_name: session.selected().map(str::to_string),
        player_count: session.players().len(),
        ..Default::default()
    }
}

/// Per-player statistics of the current dataset as pretty JSON
pub fn statistics_json<S: ResultsSource>(session: &PlotSession<S>) -> ExportResult<String> {
    let metadata = metadata_for(session);
    let document = StatisticsDocument {
        metadata: &metadata,
        players: session
            .players()
            .iter()
            .map(|p| PlayerSummary {
                identifier: &p.identifier,
                cheater: p.cheater,
                stats: &p.stats,
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Render the scene as an SVG document with opacities sampled at `now`
pub fn render_svg(scene: &Scene, config: &ExportConfig, now: f64) -> ExportResult<String> {
    validation::validate_dimensions(config.width, config.height)?;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">"#,
        config.width, config.height
    );

    let _ = writeln!(
        svg,
        r#"  <g class="boxes" transform="{}">"#,
        scene.container().container_attr()
    );
    for group in scene.groups() {
        let _ = writeln!(svg, r#"    <g class="{}">"#, escape_xml(&group.class_name()));
        for primitive in &group.primitives {
            write_primitive(&mut svg, primitive, now);
        }
        svg.push_str("    </g>\n");
    }
    svg.push_str("  </g>\n");

    if config.include_axes {
        for axis in [scene.x_axis(), scene.y_axis()].into_iter().flatten() {
            write_axis(&mut svg, axis);
        }
    }

    svg.push_str("</svg>\n");
    Ok(svg)
}

fn write_primitive(svg: &mut String, primitive: &Primitive, now: f64) {
    let class = primitive.kind.class_name();
    let style = &primitive.style;
    let mut paint = format!(
        r#"fill="{}" stroke="{}""#,
        escape_xml(style.fill.as_deref().unwrap_or("none")),
        escape_xml(&style.stroke)
    );
    if let Some(width) = style.stroke_width {
        let _ = write!(paint, r#" stroke-width="{}""#, width);
    }
    let opacity = primitive.opacity_at(now);

    let _ = match &primitive.shape {
        Shape::Rect {
            x,
            y,
            width,
            height,
        } => writeln!(
            svg,
            r#"      <rect class="{}" x="{}" y="{}" width="{}" height="{}" {} opacity="{}"/>"#,
            class, x, y, width, height, paint, opacity
        ),
        Shape::Path(path) => writeln!(
            svg,
            r#"      <path class="{}" d="{}" {} opacity="{}"/>"#,
            class,
            path.to_svg(),
            paint,
            opacity
        ),
        Shape::Circle { cx, cy, r } => writeln!(
            svg,
            r#"      <circle class="{}" cx="{}" cy="{}" r="{}" {} opacity="{}"/>"#,
            class, cx, cy, r, paint, opacity
        ),
    };
}

fn write_axis(svg: &mut String, axis: &Axis) {
    let [tx, ty] = axis.translate;
    let _ = writeln!(
        svg,
        r#"  <g class="{}" transform="translate({},{})">"#,
        axis.position.class_name(),
        tx,
        ty
    );

    let label_transform = axis
        .label_transform
        .as_deref()
        .map(|t| format!(r#" transform="{}""#, t))
        .unwrap_or_default();
    let size = axis.tick_size;

    for tick in &axis.ticks {
        let label = escape_xml(&tick.label);
        let _ = match axis.position {
            AxisPosition::Bottom => writeln!(
                svg,
                r#"    <g class="tick" transform="translate({},0)"><line y2="{}"/><text y="{}" dy=".71em"{} text-anchor="{}">{}</text></g>"#,
                tick.position,
                size,
                size + 3.0,
                label_transform,
                axis.label_anchor,
                label
            ),
            AxisPosition::Left => writeln!(
                svg,
                r#"    <g class="tick" transform="translate(0,{})"><line x2="{}"/><text x="{}" dy=".32em"{} text-anchor="{}">{}</text></g>"#,
                tick.position,
                -size,
                -(size + 3.0),
                label_transform,
                axis.label_anchor,
                label
            ),
        };
    }

    let _ = writeln!(
        svg,
        r#"    <path class="domain" d="{}" fill="none" stroke="black"/>"#,
        axis.domain_path()
    );

    if let Some(title) = &axis.title {
        let _ = writeln!(
            svg,
            r#"    <text transform="{}" x="{}" y="{}" dy="{}" text-anchor="{}">{}</text>"#,
            title.transform,
            title.x,
            title.y,
            title.dy,
            title.anchor,
            escape_xml(&title.text)
        );
    }

    svg.push_str("  </g>\n");
}

/// Escape text for use in XML content and attributes
fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Export the session to `path` in the configured format
pub fn export<S: ResultsSource>(
    session: &PlotSession<S>,
    config: &ExportConfig,
    path: &Path,
) -> ExportResult<ExportOutput> {
    let content = match config.format {
        ExportFormat::Svg => {
            let now = config.time.unwrap_or_else(|| session.clock());
            render_svg(session.scene(), config, now)?
        }
        ExportFormat::Json => statistics_json(session)?,
    };

    std::fs::write(path, &content).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(
        "Exported {} ({} bytes) to {}",
        config.format.extension(),
        content.len(),
        path.display()
    );

    Ok(ExportOutput {
        path: path.to_path_buf(),
        format: config.format,
        size: content.len(),
        metadata: metadata_for(session),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{BoxGroup, PathData, PrimitiveKind, Style};

    fn scene() -> Scene {
        let style = Style {
            fill: Some("#08519c".to_string()),
            stroke: "blue".to_string(),
            stroke_width: None,
        };
        let group = BoxGroup::new(
            "Tit & Tat",
            vec![
                Primitive::new(
                    PrimitiveKind::Quartiles,
                    Shape::Rect {
                        x: 10.0,
                        y: 20.0,
                        width: 30.0,
                        height: 40.0,
                    },
                    style.clone(),
                ),
                Primitive::new(
                    PrimitiveKind::Median,
                    Shape::Path(PathData::move_to(10.0, 30.0).line_to(40.0, 30.0)),
                    Style {
                        fill: None,
                        stroke: "red".to_string(),
                        stroke_width: Some(2.0),
                    },
                ),
            ],
        );
        let mut scene = Scene::new();
        scene.join(vec![group], 0.0, 1000.0);
        scene
    }

    #[test]
    fn test_export_format_extension() {
        assert_eq!(ExportFormat::Svg.extension(), "svg");
        assert_eq!(ExportFormat::Json.extension(), "json");
        assert_eq!(ExportFormat::Svg.mime_type(), "image/svg+xml");
    }

    #[test]
    fn test_export_config() {
        let config = ExportConfig::from_canvas(&CanvasConfig::default()).with_time(250.0);
        assert_eq!(config.width, 960.0);
        assert_eq!(config.time, Some(250.0));
        assert_eq!(config.suggested_filename("plot"), "plot.svg");
        assert_eq!(ExportConfig::json().suggested_filename("stats"), "stats.json");
    }

    #[test]
    fn test_render_svg_structure() {
        let svg = render_svg(&scene(), &ExportConfig::default(), 1000.0).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains(r#"class="box Tit &amp; Tat""#));
        assert!(svg.contains(r#"<rect class="quartiles" x="10" y="20" width="30" height="40""#));
        assert!(svg.contains(r#"d="M 10 30 L 40 30""#));
        assert!(svg.contains(r#"stroke-width="2""#));
        assert!(svg.contains(r#"transform="translate(0,0) scale(1,1)""#));
        assert_eq!(svg.matches(r#"opacity="1""#).count(), 2);
    }

    #[test]
    fn test_render_svg_samples_time() {
        let svg = render_svg(&scene(), &ExportConfig::default(), 0.0).unwrap();
        assert_eq!(svg.matches(r#"opacity="0""#).count(), 2);
    }

    #[test]
    fn test_render_svg_rejects_dimensions() {
        let err = render_svg(&scene(), &ExportConfig::svg(0.0, 600.0), 0.0);
        assert!(matches!(err, Err(ExportError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&apos;");
    }
}
