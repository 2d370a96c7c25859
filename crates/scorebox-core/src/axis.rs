//! Axis layout for the box plot
//!
//! Builds the tick marks, labels and title of the two plot axes from the
//! current scales. Axes are plain data; drawing them is left to export.

use serde::{Deserialize, Serialize};

use crate::config::{AxisStyle, CanvasConfig};
use crate::scale::{BandScale, LinearScale};
use crate::view::ViewTransform;

/// Axis orientation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisPosition {
    Left,
    Bottom,
}

impl AxisPosition {
    /// Check if this is a vertical axis
    pub fn is_vertical(&self) -> bool {
        matches!(self, AxisPosition::Left)
    }

    /// Class name of the axis group
    pub fn class_name(&self) -> &'static str {
        match self {
            AxisPosition::Left => "y axis",
            AxisPosition::Bottom => "x axis",
        }
    }
}

/// A tick mark on an axis
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TickMark {
    /// Data value for numeric ticks, `None` for categorical ones
    pub value: Option<f64>,
    /// Position along the axis in pixels
    pub position: f64,
    /// Label text
    pub label: String,
}

/// Rotated title text attached to an axis group
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisTitle {
    pub text: String,
    pub transform: String,
    pub x: f64,
    pub y: f64,
    pub dy: String,
    pub anchor: String,
}

/// A laid out axis
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub position: AxisPosition,
    /// Offset of the axis group
    pub translate: [f64; 2],
    /// Extent of the axis line along the axis
    pub range: [f64; 2],
    pub ticks: Vec<TickMark>,
    /// Tick mark length in pixels
    pub tick_size: f64,
    /// Transform applied to every tick label, if any
    pub label_transform: Option<String>,
    /// Text anchor of the tick labels
    pub label_anchor: String,
    pub title: Option<AxisTitle>,
}

impl Axis {
    /// Player axis along the bottom of the plot
    ///
    /// Ticks sit at band centres mapped through `view`, the same transform
    /// the box container uses, and labels are rotated to read upwards.
    pub fn band(
        scale: &BandScale,
        view: &ViewTransform,
        canvas: &CanvasConfig,
        style: &AxisStyle,
    ) -> Self {
        let half = scale.bandwidth() / 2.0;
        let ticks = scale
            .bands()
            .map(|(id, x)| TickMark {
                value: None,
                position: view.apply_x(x + half),
                label: id.to_string(),
            })
            .collect();

        let [dx, dy] = style.x_label_offset;
        Self {
            position: AxisPosition::Bottom,
            translate: [0.0, canvas.height - canvas.padding.bottom],
            range: view.apply_range(scale.range()),
            ticks,
            tick_size: style.tick_size,
            label_transform: Some(format!(
                "translate({},{})rotate({})",
                dx, dy, style.x_label_rotation
            )),
            label_anchor: "end".to_string(),
            title: None,
        }
    }

    /// Value axis along the left edge with a rotated title
    pub fn linear(scale: &LinearScale, canvas: &CanvasConfig, style: &AxisStyle) -> Self {
        let step = scale.tick_step(style.tick_count);
        let ticks = scale
            .ticks(style.tick_count)
            .into_iter()
            .map(|v| TickMark {
                value: Some(v),
                position: scale.map(v),
                label: format_tick(v, step),
            })
            .collect();

        Self {
            position: AxisPosition::Left,
            translate: [canvas.padding.left, 0.0],
            range: scale.range(),
            ticks,
            tick_size: style.tick_size,
            label_transform: None,
            label_anchor: "end".to_string(),
            title: Some(AxisTitle {
                text: style.y_label.clone(),
                transform: "rotate(-90)".to_string(),
                x: -(canvas.height / 2.0),
                y: 20.0 - canvas.padding.left,
                dy: "1em".to_string(),
                anchor: "middle".to_string(),
            }),
        }
    }

    /// Tick labels in order
    pub fn labels(&self) -> Vec<&str> {
        self.ticks.iter().map(|t| t.label.as_str()).collect()
    }

    /// SVG path of the axis line with outer ticks at both ends
    pub fn domain_path(&self) -> String {
        let [r0, r1] = self.range;
        let s = self.tick_size;
        match self.position {
            AxisPosition::Bottom => format!("M{},{}V0H{}V{}", r0, s, r1, s),
            AxisPosition::Left => format!("M{},{}H0V{}H{}", -s, r0, r1, -s),
        }
    }
}

/// Format a tick value with as many decimals as the tick step needs
///
/// The integer part is grouped in thousands with commas.
pub fn format_tick(value: f64, step: Option<f64>) -> String {
    let precision = step
        .filter(|s| *s > 0.0 && s.is_finite())
        .map(|s| (-(s.log10() + 0.01).floor()).max(0.0) as usize)
        .unwrap_or(0);

    // Avoid "-0.00"
    let value = if value == 0.0 { 0.0 } else { value };
    let text = format!("{:.prec$}", value, prec = precision);

    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = match digits.find('.') {
        Some(i) => digits.split_at(i),
        None => (digits, ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("{}{}{}", sign, grouped, frac_part)
}
