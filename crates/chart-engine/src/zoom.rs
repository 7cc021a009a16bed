// File: crates/chart-engine/src/zoom.rs
// Summary: Pan/zoom view state: an x-only affine transform clamped to scale and translate extents.

use serde::{Deserialize, Serialize};

use crate::error::{contract_violation, Result};
use crate::geometry::clamp;
use crate::scale::{Pixel, Scale};
use crate::series::Timestamp;
use crate::types::Dimensions;

/// Wheel delta (pixels) to log2 zoom.
const WHEEL_DELTA_FACTOR: f64 = 0.002;

/// `screen = data_px * scale_factor + translate_x`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoomTransform {
    pub scale_factor: f64,
    pub translate_x: f64,
}

impl ZoomTransform {
    pub const IDENTITY: Self = Self { scale_factor: 1.0, translate_x: 0.0 };

    #[inline]
    pub fn apply_x(&self, x: Pixel) -> Pixel {
        x * self.scale_factor + self.translate_x
    }

    #[inline]
    pub fn invert_x(&self, x: Pixel) -> Pixel {
        (x - self.translate_x) / self.scale_factor
    }

    fn translate_by(self, dx: f64) -> Self {
        Self { translate_x: self.translate_x + self.scale_factor * dx, ..self }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Bounds for a [`ZoomController`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomConfig {
    /// `[min, max]` scale factor.
    pub scale_extent: [f64; 2],
    /// Viewport span in pixels.
    pub extent: [Pixel; 2],
    /// Content span the viewport may never leave.
    pub translate_extent: [Pixel; 2],
}

impl ZoomConfig {
    /// Viewport and translate extent both `[0, width]`.
    pub fn for_dimensions(dims: &Dimensions, scale_extent: [f64; 2]) -> Self {
        Self { scale_extent, extent: [0.0, dims.width], translate_extent: [0.0, dims.width] }
    }
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self::for_dimensions(&Dimensions::default(), [1.0, 8.0])
    }
}

/// Raw pan/zoom input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ZoomGesture {
    /// Mouse wheel; positive `delta_y` zooms out. Anchored at `anchor_x`.
    Wheel { delta_y: f64, anchor_x: Pixel },
    /// Drag by `dx` pixels.
    Pan { dx: f64 },
    /// Multiply the scale factor (pinch, buttons), anchored at `anchor_x`.
    Scale { factor: f64, anchor_x: Pixel },
    Reset,
}

/// Owns one chart's [`ZoomTransform`]; the only place it is mutated.
#[derive(Clone, Debug)]
pub struct ZoomController {
    config: ZoomConfig,
    transform: ZoomTransform,
}

impl ZoomController {
    pub fn new(config: ZoomConfig) -> Self {
        Self { config, transform: ZoomTransform::IDENTITY }
    }

    pub fn config(&self) -> &ZoomConfig { &self.config }
    pub fn transform(&self) -> ZoomTransform { self.transform }

    /// Resize the viewport; the current transform is re-clamped, or reset
    /// when the new bounds cannot hold it.
    pub fn set_config(&mut self, config: ZoomConfig) {
        self.config = config;
        self.transform = self.constrain(self.transform).unwrap_or(ZoomTransform::IDENTITY);
    }

    fn clamp_k(&self, k: f64) -> f64 {
        let [lo, hi] = self.config.scale_extent;
        if k.is_finite() { clamp(k, lo, hi) } else { self.transform.scale_factor }
    }

    /// Keep the viewport inside the translate extent; center it when the
    /// content is narrower than the viewport. `None` if the result is not finite.
    fn constrain(&self, t: ZoomTransform) -> Option<ZoomTransform> {
        let [e0, e1] = self.config.extent;
        let [te0, te1] = self.config.translate_extent;
        let dx0 = t.invert_x(e0) - te0;
        let dx1 = t.invert_x(e1) - te1;
        let shift = if dx1 > dx0 {
            (dx0 + dx1) / 2.0
        } else {
            let left = dx0.min(0.0);
            if left != 0.0 { left } else { dx1.max(0.0) }
        };
        let t = t.translate_by(shift);
        (t.scale_factor.is_finite() && t.scale_factor > 0.0 && t.translate_x.is_finite()).then_some(t)
    }

    /// Re-scale keeping the data under `anchor_x` fixed on screen.
    fn scale_to(&self, k: f64, anchor_x: Pixel) -> ZoomTransform {
        let t = self.transform;
        let k = self.clamp_k(k);
        let p0 = t.invert_x(anchor_x);
        ZoomTransform { scale_factor: k, translate_x: anchor_x - p0 * k }
    }

    pub fn apply_gesture(&mut self, gesture: ZoomGesture) -> ZoomTransform {
        let t = self.transform;
        let next = match gesture {
            ZoomGesture::Wheel { delta_y, anchor_x } if delta_y.is_finite() && anchor_x.is_finite() => {
                let k = t.scale_factor * 2f64.powf(-delta_y * WHEEL_DELTA_FACTOR);
                self.scale_to(k, anchor_x)
            }
            ZoomGesture::Scale { factor, anchor_x } if factor.is_finite() && anchor_x.is_finite() => {
                self.scale_to(t.scale_factor * factor, anchor_x)
            }
            ZoomGesture::Pan { dx } if dx.is_finite() => {
                ZoomTransform { translate_x: t.translate_x + dx, ..t }
            }
            ZoomGesture::Wheel { .. } | ZoomGesture::Scale { .. } | ZoomGesture::Pan { .. } => t,
            ZoomGesture::Reset => ZoomTransform::IDENTITY,
        };
        match self.constrain(next) {
            Some(next) => self.transform = next,
            None => tracing::warn!(?gesture, "non-finite view transform ignored"),
        }
        if self.transform != t {
            tracing::debug!(
                k = self.transform.scale_factor,
                tx = self.transform.translate_x,
                "view transform changed"
            );
        }
        self.transform
    }

    /// `base` with its domain narrowed to what the current transform shows
    /// across the same pixel range. Only continuous and temporal scales
    /// can be rescaled.
    pub fn rescale(&self, base: &Scale) -> Result<Scale> {
        let t = self.transform;
        match base {
            Scale::Continuous(s) => {
                let [r0, r1] = s.range();
                Ok(Scale::Continuous(s.with_domain([s.invert(t.invert_x(r0)), s.invert(t.invert_x(r1))])))
            }
            Scale::Temporal(s) => {
                let [r0, r1] = s.range();
                Ok(Scale::Temporal(s.with_domain_ms([s.invert_ms(t.invert_x(r0)), s.invert_ms(t.invert_x(r1))])))
            }
            other => Err(contract_violation(format!("rescale on a {:?} scale", other.kind()))),
        }
    }

    /// The time window currently in view for `base`.
    pub fn rescaled_domain(&self, base: &Scale) -> Result<[Timestamp; 2]> {
        match self.rescale(base)? {
            Scale::Temporal(s) => Ok(s.domain()),
            other => Err(contract_violation(format!("time domain requested from a {:?} scale", other.kind()))),
        }
    }
}

impl Default for ZoomController {
    fn default() -> Self {
        Self::new(ZoomConfig::default())
    }
}
