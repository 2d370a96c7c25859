//! Pan/zoom view state
//!
//! A [`ViewTransform`] is the translate/scale pair produced by pointer
//! interaction. Only the horizontal component affects the plot: bands are
//! spread or shifted along the player axis while the value axis stays put.

use serde::{Deserialize, Serialize};

use crate::error::{SceneError, SceneResult};

/// Translate and uniform scale, applied as `x * scale + translate`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    /// Translation in pixels (x, y); y is accepted but ignored
    pub translate: [f64; 2],
    /// Zoom factor
    pub scale: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ViewTransform {
    /// No pan, no zoom
    pub fn identity() -> Self {
        Self {
            translate: [0.0, 0.0],
            scale: 1.0,
        }
    }

    pub fn new(translate: [f64; 2], scale: f64) -> Self {
        Self { translate, scale }
    }

    /// Check if this transform leaves coordinates unchanged
    pub fn is_identity(&self) -> bool {
        self.translate[0] == 0.0 && self.scale == 1.0
    }

    /// Reject non-finite components and non-positive zoom
    pub fn validate(&self) -> SceneResult<()> {
        if !self.translate.iter().all(|v| v.is_finite()) {
            return Err(SceneError::InvalidTransform {
                message: format!(
                    "translate must be finite, got ({}, {})",
                    self.translate[0], self.translate[1]
                ),
            });
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(SceneError::InvalidTransform {
                message: format!("scale must be positive, got {}", self.scale),
            });
        }
        Ok(())
    }

    /// Map a horizontal coordinate
    pub fn apply_x(&self, x: f64) -> f64 {
        x * self.scale + self.translate[0]
    }

    /// Map both ends of a horizontal range
    pub fn apply_range(&self, range: [f64; 2]) -> [f64; 2] {
        [self.apply_x(range[0]), self.apply_x(range[1])]
    }

    /// Shift by a pixel offset
    pub fn pan(&self, dx: f64, dy: f64) -> Self {
        Self {
            translate: [self.translate[0] + dx, self.translate[1] + dy],
            scale: self.scale,
        }
    }

    /// Multiply the zoom by `factor`, keeping `anchor_x` fixed on screen
    pub fn zoom_at(&self, factor: f64, anchor_x: f64) -> Self {
        let tx = anchor_x - (anchor_x - self.translate[0]) * factor;
        Self {
            translate: [tx, self.translate[1]],
            scale: self.scale * factor,
        }
    }

    /// Transform attribute for the primitive container
    pub fn container_attr(&self) -> String {
        format!("translate({},0) scale({},1)", self.translate[0], self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let t = ViewTransform::default();
        assert!(t.is_identity());
        assert_eq!(t.apply_x(90.0), 90.0);
        assert_eq!(t.container_attr(), "translate(0,0) scale(1,1)");
    }

    #[test]
    fn test_apply_range() {
        let t = ViewTransform::new([-50.0, 12.0], 2.0);
        assert_eq!(t.apply_range([90.0, 920.0]), [130.0, 1790.0]);
        assert_eq!(t.container_attr(), "translate(-50,0) scale(2,1)");
    }

    #[test]
    fn test_vertical_translate_ignored() {
        let t = ViewTransform::new([0.0, 300.0], 1.0);
        assert!(t.is_identity());
    }

    #[test]
    fn test_zoom_keeps_anchor() {
        let t = ViewTransform::identity().pan(10.0, 0.0).zoom_at(3.0, 400.0);
        let before = ViewTransform::identity().pan(10.0, 0.0);
        let x = (400.0 - before.translate[0]) / before.scale;
        assert!((t.apply_x(x) - 400.0).abs() < 1e-9);
        assert_eq!(t.scale, 3.0);
    }

    #[test]
    fn test_validate() {
        assert!(ViewTransform::identity().validate().is_ok());
        assert!(ViewTransform::new([0.0, 0.0], 0.0).validate().is_err());
        assert!(ViewTransform::new([f64::NAN, 0.0], 1.0).validate().is_err());
        assert!(ViewTransform::new([0.0, 0.0], f64::INFINITY).validate().is_err());
    }
}
