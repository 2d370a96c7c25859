//! Box plot rendering
//!
//! Turns per-player statistics into scene primitives:
//! - a quartile rectangle filled by median colour
//! - a median line across the band
//! - upper and lower whiskers with a cap across the band
//! - one circle per outlier on the band centre line

use serde::{Deserialize, Serialize};

use crate::colormap::get_colormap;
use crate::config::{PlotConfig, StyleConfig};
use crate::error::{ConfigError, ConfigResult, DatasetError, DatasetResult};
use crate::scale::{BandScale, LinearScale, QuantileScale};
use crate::scene::{BoxGroup, PathData, Primitive, PrimitiveKind, Shape, Style};
use scorebox_io::{CheaterSet, PlayerRecord};
use scorebox_stats::{extent_of, BoxStats};

/// A player's sample together with its box statistics
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub identifier: String,
    pub sample: Vec<f64>,
    pub stats: BoxStats,
    /// Drawn with the alternate palette
    pub cheater: bool,
}

impl PlayerStats {
    /// Compute statistics for one record
    pub fn compute(record: &PlayerRecord, cheaters: &CheaterSet, k: f64) -> DatasetResult<Self> {
        let stats = BoxStats::from_sorted(&record.sample, k).map_err(|source| {
            DatasetError::Statistics {
                player: record.identifier.clone(),
                source,
            }
        })?;

        Ok(Self {
            identifier: record.identifier.clone(),
            sample: record.sample.clone(),
            stats,
            cheater: cheaters.contains(&record.identifier),
        })
    }

    /// Compute statistics for every record, failing on the first bad sample
    pub fn compute_all(
        records: &[PlayerRecord],
        cheaters: &CheaterSet,
        k: f64,
    ) -> DatasetResult<Vec<Self>> {
        records
            .iter()
            .map(|r| Self::compute(r, cheaters, k))
            .collect()
    }
}

/// The four scales of the plot
#[derive(Clone, Debug, PartialEq)]
pub struct PlotScales {
    /// Player to band, over the unzoomed padding bounds
    pub x: BandScale,
    /// Score to vertical position
    pub y: LinearScale,
    /// Median to fill colour for regular players
    pub colour: QuantileScale<String>,
    /// Median to fill colour for cheaters
    pub cheater_colour: QuantileScale<String>,
}

impl PlotScales {
    /// Build empty scales from configuration
    pub fn from_config(config: &PlotConfig) -> ConfigResult<Self> {
        let palette = |name: &str| -> ConfigResult<Vec<String>> {
            let cmap =
                get_colormap(name).ok_or_else(|| ConfigError::UnknownPalette(name.to_string()))?;
            Ok(cmap
                .classes(config.style.palette_size)
                .iter()
                .map(|c| c.to_hex())
                .collect())
        };

        let canvas = &config.canvas;
        Ok(Self {
            x: BandScale::new(
                canvas.x_bounds(),
                config.bands.padding,
                config.bands.outer_padding,
            ),
            y: LinearScale::new([0.0, 1.0], canvas.y_bounds()),
            colour: QuantileScale::new(palette(&config.style.palette)?),
            cheater_colour: QuantileScale::new(palette(&config.style.cheater_palette)?),
        })
    }

    /// Recompute every domain from the full dataset
    ///
    /// Both colour scales share the medians of all players, so a cheater
    /// and a regular player with equal medians sit in the same bucket.
    pub fn fit(&mut self, players: &[PlayerStats]) {
        if let Some(extent) = extent_of(players.iter().map(|p| p.sample.as_slice())) {
            self.y.set_extent(extent);
        }
        self.x.set_domain(players.iter().map(|p| p.identifier.as_str()));

        let medians: Vec<f64> = players.iter().map(|p| p.stats.median).collect();
        self.colour.set_domain(&medians);
        self.cheater_colour.set_domain(&medians);
    }

    /// Fill colour for a player's box
    pub fn fill_for(&self, player: &PlayerStats) -> Option<String> {
        let scale = if player.cheater {
            &self.cheater_colour
        } else {
            &self.colour
        };
        scale.map(player.stats.median)
    }
}

/// Builds box groups from statistics and scales
#[derive(Clone, Debug)]
pub struct BoxPlotRenderer {
    style: StyleConfig,
}

impl BoxPlotRenderer {
    pub fn new(style: StyleConfig) -> Self {
        Self { style }
    }

    /// Render one player, or `None` if the band scale does not know it
    pub fn render(&self, player: &PlayerStats, scales: &PlotScales) -> Option<BoxGroup> {
        let x = scales.x.position(&player.identifier)?;
        let bw = scales.x.bandwidth();
        let mid = x + bw / 2.0;
        let y = |v: f64| scales.y.map(v);
        let s = &player.stats;

        let box_stroke = if player.cheater {
            &self.style.cheater_box_stroke
        } else {
            &self.style.box_stroke
        };
        let whisker_style = Style {
            fill: None,
            stroke: self.style.whisker_stroke.clone(),
            stroke_width: None,
        };

        let mut primitives = vec![
            Primitive::new(
                PrimitiveKind::Quartiles,
                Shape::Rect {
                    x,
                    y: y(s.q3),
                    width: bw,
                    height: y(s.q1) - y(s.q3),
                },
                Style {
                    fill: scales.fill_for(player),
                    stroke: box_stroke.clone(),
                    stroke_width: None,
                },
            ),
            Primitive::new(
                PrimitiveKind::Median,
                Shape::Path(PathData::move_to(x, y(s.median)).line_to(x + bw, y(s.median))),
                Style {
                    fill: None,
                    stroke: self.style.median_stroke.clone(),
                    stroke_width: Some(self.style.median_width),
                },
            ),
            Primitive::new(
                PrimitiveKind::UpperWhisker,
                Shape::Path(whisker_path(x, bw, y(s.q3), y(s.whisker_high))),
                whisker_style.clone(),
            ),
            Primitive::new(
                PrimitiveKind::LowerWhisker,
                Shape::Path(whisker_path(x, bw, y(s.q1), y(s.whisker_low))),
                whisker_style,
            ),
        ];

        let outlier_style = Style {
            fill: None,
            stroke: self.style.outlier_stroke.clone(),
            stroke_width: Some(self.style.outlier_width),
        };
        primitives.extend(s.outliers().map(|v| {
            Primitive::new(
                PrimitiveKind::Outlier,
                Shape::Circle {
                    cx: mid,
                    cy: y(v),
                    r: self.style.outlier_radius,
                },
                outlier_style.clone(),
            )
        }));

        Some(BoxGroup::new(player.identifier.clone(), primitives))
    }

    /// Render every player the band scale knows, in order
    pub fn render_all(&self, players: &[PlayerStats], scales: &PlotScales) -> Vec<BoxGroup> {
        players
            .iter()
            .filter_map(|p| self.render(p, scales))
            .collect()
    }
}

/// Vertical stem from the box edge to the reach, then a cap across the band
fn whisker_path(x: f64, bw: f64, from: f64, to: f64) -> PathData {
    let mid = x + bw / 2.0;
    PathData::move_to(mid, from)
        .line_to(mid, to)
        .line_to(x + bw, to)
        .line_to(x, to)
}
