//! Configuration for scorebox-core
//!
//! Centralized configuration for canvas layout, band spacing, statistics,
//! transition timing, styling and data locations. Every section has
//! defaults, so a configuration file only needs the values it changes.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{validation, ConfigError, ConfigResult};
use scorebox_io::{LoadOptions, DEFAULT_CHEATERS_FILE, DEFAULT_TURNS};

/// Complete plot configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Canvas size and padding
    pub canvas: CanvasConfig,
    /// Band layout of the player axis
    pub bands: BandConfig,
    /// Statistics parameters
    pub stats: StatsConfig,
    /// Transition timing
    pub transition: TransitionConfig,
    /// Colours and stroke widths
    pub style: StyleConfig,
    /// Input locations
    pub data: DataConfig,
    /// Axis appearance
    pub axis: AxisStyle,
}

/// Canvas size in pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f64,
    pub height: f64,
    pub padding: Padding,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 600.0,
            padding: Padding::default(),
        }
    }
}

impl CanvasConfig {
    /// Horizontal extent available to the bands
    pub fn x_bounds(&self) -> [f64; 2] {
        [self.padding.left, self.width - self.padding.right]
    }

    /// Vertical extent of the value axis, bottom first
    pub fn y_bounds(&self) -> [f64; 2] {
        [self.height - self.padding.bottom, self.padding.top]
    }
}

/// Space around the plot area for axes and labels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Padding {
    fn default() -> Self {
        // Bottom leaves room for rotated player names
        Self {
            top: 40.0,
            right: 40.0,
            bottom: 170.0,
            left: 90.0,
        }
    }
}

/// Band layout of the categorical axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandConfig {
    /// Fraction of each step left empty between bands
    pub padding: f64,
    /// Fraction of a step left empty at both ends
    pub outer_padding: f64,
}

impl Default for BandConfig {
    fn default() -> Self {
        Self {
            padding: 0.5,
            outer_padding: 0.4,
        }
    }
}

/// Statistics parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// IQR multiplier bounding the whiskers
    pub whisker_multiplier: f64,
    /// Turns per match, part of the score normalisation
    pub turns: u32,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            whisker_multiplier: scorebox_stats::TUKEY_K,
            turns: DEFAULT_TURNS,
        }
    }
}

/// Transition timing in clock units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub duration: f64,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self { duration: 1000.0 }
    }
}

/// Colours and stroke widths of the plot primitives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Fill palette for regular players
    pub palette: String,
    /// Fill palette for cheaters
    pub cheater_palette: String,
    /// Number of colour buckets per palette
    pub palette_size: usize,
    pub box_stroke: String,
    pub cheater_box_stroke: String,
    pub median_stroke: String,
    pub median_width: f64,
    pub whisker_stroke: String,
    pub outlier_stroke: String,
    pub outlier_width: f64,
    pub outlier_radius: f64,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            palette: "Blues".to_string(),
            cheater_palette: "Greens".to_string(),
            palette_size: 9,
            box_stroke: "blue".to_string(),
            cheater_box_stroke: "green".to_string(),
            median_stroke: "red".to_string(),
            median_width: 2.0,
            whisker_stroke: "black".to_string(),
            outlier_stroke: "#aaa".to_string(),
            outlier_width: 0.5,
            outlier_radius: 2.0,
        }
    }
}

/// Input locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory holding the CSV files
    pub directory: PathBuf,
    /// Dataset shown at startup
    pub default_dataset: String,
    /// Cheater list file name inside `directory`
    pub cheaters_file: String,
    /// Fail a load on the first bad row
    pub strict: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            default_dataset: "all_results".to_string(),
            cheaters_file: DEFAULT_CHEATERS_FILE.to_string(),
            strict: false,
        }
    }
}

/// Axis appearance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisStyle {
    /// Title of the value axis
    pub y_label: String,
    /// Approximate number of value ticks
    pub tick_count: usize,
    /// Tick mark length in pixels
    pub tick_size: f64,
    /// Rotation of player names in degrees
    pub x_label_rotation: f64,
    /// Offset of player names before rotation
    pub x_label_offset: [f64; 2],
}

impl Default for AxisStyle {
    fn default() -> Self {
        Self {
            y_label: "Mean score per game over 200 rounds repeated 50 times".to_string(),
            tick_count: 10,
            tick_size: 6.0,
            x_label_rotation: -90.0,
            x_label_offset: [-15.0, 15.0],
        }
    }
}

impl PlotConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> ConfigResult<Self> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> ConfigResult<Self> {
        serde_json::from_str(json_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> ConfigResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load a configuration file, TOML or JSON by extension
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content)?,
            _ => Self::from_toml(&content)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Per-user configuration file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("scorebox").join("config.toml"))
    }

    /// Load `path` if given, else the per-user file if present, else defaults
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Options for reading results files
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            turns: self.stats.turns,
            strict: self.data.strict,
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        let canvas = &self.canvas;
        if !(canvas.width > 0.0 && canvas.height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "canvas must have a positive size, got {}x{}",
                canvas.width, canvas.height
            )));
        }

        let p = &canvas.padding;
        if [p.top, p.right, p.bottom, p.left].iter().any(|v| *v < 0.0) {
            return Err(ConfigError::Invalid(
                "padding must not be negative".to_string(),
            ));
        }
        if p.left + p.right >= canvas.width || p.top + p.bottom >= canvas.height {
            return Err(ConfigError::Invalid(
                "padding leaves no room for the plot".to_string(),
            ));
        }

        validation::validate_fraction("bands.padding", self.bands.padding)?;
        validation::validate_fraction("bands.outer_padding", self.bands.outer_padding)?;

        let k = self.stats.whisker_multiplier;
        if !k.is_finite() || k < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "whisker_multiplier must be finite and non-negative, got {}",
                k
            )));
        }

        if self.stats.turns == 0 {
            return Err(ConfigError::Invalid("turns must be positive".to_string()));
        }

        let duration = self.transition.duration;
        if !duration.is_finite() || duration < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "transition duration must be finite and non-negative, got {}",
                duration
            )));
        }

        for name in [&self.style.palette, &self.style.cheater_palette] {
            if crate::colormap::get_colormap(name).is_none() {
                return Err(ConfigError::UnknownPalette(name.clone()));
            }
        }
        if self.style.palette_size == 0 {
            return Err(ConfigError::Invalid(
                "palette_size must be positive".to_string(),
            ));
        }

        if self.axis.tick_count == 0 {
            return Err(ConfigError::Invalid(
                "tick_count must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
