//! Overlay zoom state.
//!
//! The transform holds the user's zoom factor for the overlay and the rule
//! that turns it into a placement. The same [`OverlayTransform::resolve_geometry`]
//! is used for the live preview and for the captured photo, so what the user
//! lines up on screen is what ends up in the image.

use serde::{Deserialize, Serialize};

use crate::geometry::Placement;

/// Stored scale values are rounded to this resolution so decimal steps
/// (0.1, 0.05, ...) accumulate without binary drift.
const SCALE_RESOLUTION: f64 = 1e6;

/// Closed interval the scale is kept within.
///
/// Always satisfies `0 <= min <= max` with both ends finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawScaleBounds")]
pub struct ScaleBounds {
    min: f64,
    max: f64,
}

#[derive(Deserialize)]
struct RawScaleBounds {
    min: f64,
    max: f64,
}

impl From<RawScaleBounds> for ScaleBounds {
    fn from(raw: RawScaleBounds) -> Self {
        Self::new(raw.min, raw.max)
    }
}

impl ScaleBounds {
    /// Zoom range of the capture page.
    pub const DEFAULT: ScaleBounds = ScaleBounds { min: 0.5, max: 2.0 };

    /// Create bounds, swapping the ends if given in reverse order.
    /// Non-finite or negative ends fall back to [`ScaleBounds::DEFAULT`].
    pub fn new(min: f64, max: f64) -> Self {
        let usable = |v: f64| v.is_finite() && v >= 0.0;
        if !usable(min) || !usable(max) {
            tracing::warn!(min, max, "Unusable scale bounds, using defaults");
            return Self::DEFAULT;
        }
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn clamp(&self, scale: f64) -> f64 {
        scale.clamp(self.min, self.max)
    }

    pub fn contains(&self, scale: f64) -> bool {
        (self.min..=self.max).contains(&scale)
    }
}

impl Default for ScaleBounds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// User-adjustable overlay transform.
///
/// Invariant: `bounds.min() <= scale <= bounds.max()`. Every constructor,
/// mutation, and deserialization clamps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawOverlayTransform")]
pub struct OverlayTransform {
    scale: f64,
    bounds: ScaleBounds,
    base_width_fraction: f64,
}

#[derive(Deserialize)]
struct RawOverlayTransform {
    scale: f64,
    #[serde(default)]
    bounds: ScaleBounds,
    #[serde(default = "default_base_width_fraction")]
    base_width_fraction: f64,
}

impl From<RawOverlayTransform> for OverlayTransform {
    fn from(raw: RawOverlayTransform) -> Self {
        Self::new(raw.scale, raw.bounds, raw.base_width_fraction)
    }
}

fn default_base_width_fraction() -> f64 {
    OverlayTransform::DEFAULT_BASE_WIDTH_FRACTION
}

impl OverlayTransform {
    /// Overlay covers 70% of the frame width at scale 1.0.
    pub const DEFAULT_BASE_WIDTH_FRACTION: f64 = 0.7;

    /// A non-positive or non-finite `base_width_fraction` falls back to
    /// [`Self::DEFAULT_BASE_WIDTH_FRACTION`].
    pub fn new(scale: f64, bounds: ScaleBounds, base_width_fraction: f64) -> Self {
        let base_width_fraction = if base_width_fraction.is_finite() && base_width_fraction > 0.0 {
            base_width_fraction
        } else {
            Self::DEFAULT_BASE_WIDTH_FRACTION
        };
        Self {
            scale: clamp_scale(scale, &bounds),
            bounds,
            base_width_fraction,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn bounds(&self) -> ScaleBounds {
        self.bounds
    }

    pub fn base_width_fraction(&self) -> f64 {
        self.base_width_fraction
    }

    /// Same transform with a different scale, clamped to the bounds.
    pub fn with_scale(&self, scale: f64) -> Self {
        Self {
            scale: clamp_scale(scale, &self.bounds),
            ..*self
        }
    }

    /// Zoom in by `step`. Non-finite or negative steps leave the scale unchanged.
    pub fn increment(&self, step: f64) -> Self {
        if !valid_step(step) {
            tracing::debug!(step, "Ignoring invalid zoom step");
            return *self;
        }
        self.with_scale(self.scale + step)
    }

    /// Zoom out by `step`. Non-finite or negative steps leave the scale unchanged.
    pub fn decrement(&self, step: f64) -> Self {
        if !valid_step(step) {
            tracing::debug!(step, "Ignoring invalid zoom step");
            return *self;
        }
        self.with_scale(self.scale - step)
    }

    pub fn at_min(&self) -> bool {
        self.scale <= self.bounds.min()
    }

    pub fn at_max(&self) -> bool {
        self.scale >= self.bounds.max()
    }

    /// Overlay placement centered within a `frame_width x frame_height` surface.
    ///
    /// `width = frame_width * base_width_fraction * scale`, height follows the
    /// overlay's aspect ratio (width / height). A non-positive or non-finite
    /// aspect ratio is treated as square.
    pub fn resolve_geometry(
        &self,
        frame_width: f64,
        frame_height: f64,
        overlay_aspect_ratio: f64,
    ) -> Placement {
        let aspect = if overlay_aspect_ratio.is_finite() && overlay_aspect_ratio > 0.0 {
            overlay_aspect_ratio
        } else {
            1.0
        };
        let width = frame_width * self.base_width_fraction * self.scale;
        let height = width / aspect;
        Placement::centered(frame_width, frame_height, width, height)
    }
}

impl Default for OverlayTransform {
    fn default() -> Self {
        Self::new(1.0, ScaleBounds::DEFAULT, Self::DEFAULT_BASE_WIDTH_FRACTION)
    }
}

fn valid_step(step: f64) -> bool {
    step.is_finite() && step >= 0.0
}

fn clamp_scale(scale: f64, bounds: &ScaleBounds) -> f64 {
    let scale = if scale.is_finite() { scale } else { bounds.min() };
    let quantized = (scale * SCALE_RESOLUTION).round() / SCALE_RESOLUTION;
    bounds.clamp(quantized)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn three_increments_reach_one_point_three() {
        let t = OverlayTransform::default()
            .increment(0.1)
            .increment(0.1)
            .increment(0.1);
        assert_eq!(t.scale(), 1.3);
    }

    #[test]
    fn repeated_decrements_clamp_at_floor() {
        let mut t = OverlayTransform::default().with_scale(1.3);
        for _ in 0..10 {
            t = t.decrement(0.1);
        }
        assert_eq!(t.scale(), 0.5);
        assert!(t.at_min());
    }

    #[test]
    fn increments_clamp_at_ceiling() {
        let mut t = OverlayTransform::default();
        for _ in 0..30 {
            t = t.increment(0.1);
        }
        assert_eq!(t.scale(), 2.0);
        assert!(t.at_max());
    }

    #[test]
    fn invalid_steps_are_ignored() {
        let t = OverlayTransform::default();
        assert_eq!(t.increment(f64::NAN), t);
        assert_eq!(t.decrement(-0.1), t);
        assert_eq!(t.increment(f64::INFINITY), t);
    }

    #[test]
    fn construction_clamps_initial_scale() {
        let t = OverlayTransform::new(9.0, ScaleBounds::new(2.0, 0.5), 0.7);
        assert_eq!(t.bounds(), ScaleBounds::DEFAULT);
        assert_eq!(t.scale(), 2.0);
    }

    #[test]
    fn unusable_bounds_fall_back_to_defaults() {
        assert_eq!(ScaleBounds::new(f64::NAN, 1.0), ScaleBounds::DEFAULT);
        assert_eq!(ScaleBounds::new(0.5, f64::INFINITY), ScaleBounds::DEFAULT);
        assert_eq!(ScaleBounds::new(-1.0, 2.0), ScaleBounds::DEFAULT);
        assert_eq!(ScaleBounds::new(f64::NAN, 1.0).clamp(1.0), 1.0);

        let t = OverlayTransform::new(1.0, ScaleBounds::new(f64::NAN, f64::NAN), f64::NAN);
        assert_eq!(t.scale(), 1.0);
        assert_eq!(t.base_width_fraction(), 0.7);
    }

    #[test]
    fn deserialized_scale_is_clamped() {
        let t: OverlayTransform = serde_json::from_str(
            r#"{"scale":5.0,"bounds":{"min":0.5,"max":2.0},"base_width_fraction":0.7}"#,
        )
        .unwrap();
        assert_eq!(t.scale(), 2.0);
        assert!(t.bounds().contains(t.scale()));

        let t: OverlayTransform =
            serde_json::from_str(r#"{"scale":0.1,"bounds":{"min":2.0,"max":0.5}}"#).unwrap();
        assert_eq!(t.bounds(), ScaleBounds::DEFAULT);
        assert_eq!(t.scale(), 0.5);
        assert_eq!(t.base_width_fraction(), 0.7);
    }

    #[test]
    fn full_hd_square_overlay_placement() {
        let p = OverlayTransform::default().resolve_geometry(1920.0, 1080.0, 1.0);
        assert!((p.width - 1344.0).abs() < 1e-9);
        assert!((p.height - 1344.0).abs() < 1e-9);
        assert!((p.x - 288.0).abs() < 1e-9);
        assert!((p.y + 132.0).abs() < 1e-9);
    }

    #[test]
    fn wide_overlay_is_shorter() {
        let p = OverlayTransform::default().resolve_geometry(1000.0, 1000.0, 2.0);
        assert!((p.width - 700.0).abs() < 1e-9);
        assert!((p.height - 350.0).abs() < 1e-9);
        assert!((p.y - 325.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_aspect_falls_back_to_square() {
        let p = OverlayTransform::default().resolve_geometry(100.0, 100.0, 0.0);
        assert_eq!(p.width, p.height);
    }

    #[test]
    fn transform_serializes_with_bounds() {
        let t = OverlayTransform::default().increment(0.25);
        let json = serde_json::to_string(&t).unwrap();
        let back: OverlayTransform = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }

    proptest! {
        #[test]
        fn scale_stays_in_bounds(
            start in 0.0f64..4.0,
            steps in proptest::collection::vec((any::<bool>(), 0.0f64..1.0), 0..40),
        ) {
            let mut t = OverlayTransform::default().with_scale(start);
            for (up, step) in steps {
                let before = t.scale();
                t = if up { t.increment(step) } else { t.decrement(step) };
                prop_assert!(t.bounds().contains(t.scale()));
                if up {
                    prop_assert!(t.scale() >= before);
                } else {
                    prop_assert!(t.scale() <= before);
                }
            }
        }

        #[test]
        fn geometry_is_pure_and_centered(
            w in 1.0f64..8000.0,
            h in 1.0f64..8000.0,
            aspect in 0.1f64..10.0,
            scale in 0.5f64..2.0,
        ) {
            let t = OverlayTransform::default().with_scale(scale);
            let a = t.resolve_geometry(w, h, aspect);
            let b = t.resolve_geometry(w, h, aspect);
            prop_assert_eq!(a, b);
            let (cx, cy) = a.center();
            prop_assert!((cx - w / 2.0).abs() < 1e-6);
            prop_assert!((cy - h / 2.0).abs() < 1e-6);
        }
    }
}
