// File: crates/chart-engine/src/types.rs
// Summary: Shared types and constants (chart sizes, margins, drawable area).

use serde::{Deserialize, Serialize};

use crate::error::{InvalidData, Result};
use crate::geometry::Rect;

/// Default chart width in pixels.
pub const WIDTH: f64 = 1100.0;
/// Default chart height in pixels.
pub const HEIGHT: f64 = 360.0;
/// Default bubble chart height in pixels.
pub const BUBBLE_HEIGHT: f64 = 380.0;

/// Screen margins, in pixels.
/// Contract: all fields are non-negative.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self { top, right, bottom, left }
    }
    /// Total horizontal margin (left + right).
    pub fn hsum(&self) -> f64 { self.left + self.right }
    /// Total vertical margin (top + bottom).
    pub fn vsum(&self) -> f64 { self.top + self.bottom }

    /// Margins used by bubble charts, which need room for rotated labels.
    pub const fn bubble() -> Self {
        Self::new(20.0, 24.0, 64.0, 64.0)
    }
}

impl Default for Margin {
    fn default() -> Self {
        Self::new(20.0, 24.0, 36.0, 48.0)
    }
}

/// Outer chart size plus margins.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
}

impl Dimensions {
    pub const fn new(width: f64, height: f64, margin: Margin) -> Self {
        Self { width, height, margin }
    }

    pub const fn bubble() -> Self {
        Self::new(WIDTH, BUBBLE_HEIGHT, Margin::bubble())
    }

    pub fn inner_width(&self) -> f64 { self.width - self.margin.hsum() }
    pub fn inner_height(&self) -> f64 { self.height - self.margin.vsum() }

    /// Horizontal pixel range of the drawable area, left to right.
    pub fn x_range(&self) -> [f64; 2] {
        [self.margin.left, self.width - self.margin.right]
    }

    /// Vertical pixel range of the drawable area, bottom to top (y grows downwards).
    pub fn y_range(&self) -> [f64; 2] {
        [self.height - self.margin.bottom, self.margin.top]
    }

    pub fn plot_rect(&self) -> Rect {
        Rect::new(self.margin.left, self.margin.top, self.inner_width(), self.inner_height())
    }

    /// Reject negative sizes and an empty drawable area.
    pub fn validate(&self) -> Result<()> {
        let m = &self.margin;
        let all = [self.width, self.height, m.top, m.right, m.bottom, m.left];
        let sane = all.iter().all(|v| v.is_finite() && *v >= 0.0);
        if !sane || self.inner_width() <= 0.0 || self.inner_height() <= 0.0 {
            return Err(InvalidData::Dimensions {
                width: self.inner_width(),
                height: self.inner_height(),
            }
            .into());
        }
        Ok(())
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::new(WIDTH, HEIGHT, Margin::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_drawable_area() {
        let d = Dimensions::default();
        assert_eq!(d.inner_width(), 1100.0 - 72.0);
        assert_eq!(d.inner_height(), 360.0 - 56.0);
        assert_eq!(d.x_range(), [48.0, 1076.0]);
        assert_eq!(d.y_range(), [324.0, 20.0]);
        assert!(d.validate().is_ok());
    }

    #[test]
    fn margins_swallowing_the_chart_are_rejected() {
        let d = Dimensions::new(60.0, 300.0, Margin::new(0.0, 30.0, 0.0, 30.0));
        assert!(d.validate().is_err());
        let neg = Dimensions::new(400.0, 300.0, Margin::new(-1.0, 0.0, 0.0, 0.0));
        assert!(neg.validate().is_err());
    }
}
