//! Sequential colour palettes for box fills
//!
//! Provides the nine-class ColorBrewer sequential palettes used to shade
//! boxes by median score:
//! - Blues, Greens, Oranges, Purples, Greys
//!
//! Palettes can be resampled to any number of classes and reversed.

use serde::{Deserialize, Serialize};

/// A color in RGBA format (0.0 to 1.0)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Create a new color
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from RGB (alpha = 1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color from a hex string ("#08519c", "08519c" or "#aaa")
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f32 / 255.0);

        match hex.len() {
            6 => Some(Self::rgb(
                channel(hex.get(0..2)?)?,
                channel(hex.get(2..4)?)?,
                channel(hex.get(4..6)?)?,
            )),
            3 => {
                // "#abc" is shorthand for "#aabbcc"
                let digit = |i: usize| -> Option<f32> {
                    let d = hex.get(i..i + 1)?;
                    channel(&format!("{d}{d}"))
                };
                Some(Self::rgb(digit(0)?, digit(1)?, digit(2)?))
            }
            _ => None,
        }
    }

    /// Convert to a lowercase hex string
    pub fn to_hex(&self) -> String {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
    }

    /// Linear interpolation between two colors
    pub fn lerp(a: &Color, b: &Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: a.r + (b.r - a.r) * t,
            g: a.g + (b.g - a.g) * t,
            b: a.b + (b.b - a.b) * t,
            a: a.a + (b.a - a.a) * t,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(0.5, 0.5, 0.5)
    }
}

/// An ordered list of colours, light to dark
#[derive(Clone, Debug, PartialEq)]
pub struct Colormap {
    /// Name of the palette
    pub name: String,
    colors: Vec<Color>,
    reversed: bool,
}

impl Colormap {
    /// Create a colormap from evenly spaced colours
    pub fn from_colors(name: impl Into<String>, colors: Vec<Color>) -> Self {
        Self {
            name: name.into(),
            colors,
            reversed: false,
        }
    }

    /// Build a colormap from hex strings, skipping any that fail to parse
    fn from_hex_list(name: &str, hex: &[&str]) -> Self {
        Self::from_colors(name, hex.iter().filter_map(|h| Color::from_hex(h)).collect())
    }

    /// Reverse the colormap
    pub fn reversed(mut self) -> Self {
        self.reversed = !self.reversed;
        self
    }

    /// Number of colours in the palette
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Check if the palette has no colours
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Sample the colormap at a position (0.0 to 1.0)
    pub fn sample(&self, t: f32) -> Color {
        let mut t = t.clamp(0.0, 1.0);
        if self.reversed {
            t = 1.0 - t;
        }

        match self.colors.len() {
            0 => Color::default(),
            1 => self.colors[0],
            n => {
                let pos = t * (n - 1) as f32;
                let i = (pos.floor() as usize).min(n - 2);
                Color::lerp(&self.colors[i], &self.colors[i + 1], pos - i as f32)
            }
        }
    }

    /// Split the palette into `n` discrete classes
    ///
    /// Asking for the palette's own size returns its colours unchanged;
    /// any other size is resampled evenly.
    pub fn classes(&self, n: usize) -> Vec<Color> {
        if n == self.colors.len() {
            let mut colors = self.colors.clone();
            if self.reversed {
                colors.reverse();
            }
            return colors;
        }
        (0..n)
            .map(|i| self.sample(i as f32 / (n - 1).max(1) as f32))
            .collect()
    }
}

// MARK: - Built-in Palettes

/// ColorBrewer Blues, nine classes
pub fn blues() -> Colormap {
    Colormap::from_hex_list(
        "Blues",
        &[
            "#f7fbff", "#deebf7", "#c6dbef", "#9ecae1", "#6baed6", "#4292c6", "#2171b5",
            "#08519c", "#08306b",
        ],
    )
}

/// ColorBrewer Greens, nine classes
pub fn greens() -> Colormap {
    Colormap::from_hex_list(
        "Greens",
        &[
            "#f7fcf5", "#e5f5e0", "#c7e9c0", "#a1d99b", "#74c476", "#41ab5d", "#238b45",
            "#006d2c", "#00441b",
        ],
    )
}

/// ColorBrewer Oranges, nine classes
pub fn oranges() -> Colormap {
    Colormap::from_hex_list(
        "Oranges",
        &[
            "#fff5eb", "#fee6ce", "#fdd0a2", "#fdae6b", "#fd8d3c", "#f16913", "#d94801",
            "#a63603", "#7f2704",
        ],
    )
}

/// ColorBrewer Purples, nine classes
pub fn purples() -> Colormap {
    Colormap::from_hex_list(
        "Purples",
        &[
            "#fcfbfd", "#efedf5", "#dadaeb", "#bcbddc", "#9e9ac8", "#807dba", "#6a51a3",
            "#54278f", "#3f007d",
        ],
    )
}

/// ColorBrewer Greys, nine classes
pub fn greys() -> Colormap {
    Colormap::from_hex_list(
        "Greys",
        &[
            "#ffffff", "#f0f0f0", "#d9d9d9", "#bdbdbd", "#969696", "#737373", "#525252",
            "#252525", "#000000",
        ],
    )
}

/// Get a list of all built-in palette names
pub fn builtin_colormap_names() -> Vec<&'static str> {
    vec!["Blues", "Greens", "Oranges", "Purples", "Greys"]
}

/// Get a built-in palette by name (case-insensitive)
pub fn get_colormap(name: &str) -> Option<Colormap> {
    match name.to_lowercase().as_str() {
        "blues" => Some(blues()),
        "greens" => Some(greens()),
        "oranges" => Some(oranges()),
        "purples" => Some(purples()),
        "greys" | "grays" => Some(greys()),
        _ => None,
    }
}
