//! Live preview layout helpers.
//!
//! The video element fills the viewport with `object-fit: cover`, so the
//! frame is scaled uniformly and cropped. The overlay preview rectangle is
//! the capture-time placement pushed through that same mapping, which keeps
//! the on-screen overlay aligned with the pixels that will be captured.

use serde::{Deserialize, Serialize};

use crate::geometry::Placement;
use crate::transform::OverlayTransform;

/// Mapping from native frame pixels to viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreviewLayout {
    pub frame_width: f64,
    pub frame_height: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Uniform frame-to-viewport scale.
    pub scale: f64,
    /// Horizontal offset of the scaled frame (negative when cropped).
    pub offset_x: f64,
    /// Vertical offset of the scaled frame (negative when cropped).
    pub offset_y: f64,
}

impl PreviewLayout {
    /// `object-fit: cover` layout. Returns `None` while either surface has no area.
    pub fn cover(
        frame_width: f64,
        frame_height: f64,
        viewport_width: f64,
        viewport_height: f64,
    ) -> Option<Self> {
        if frame_width <= 0.0 || frame_height <= 0.0 {
            return None;
        }
        if viewport_width <= 0.0 || viewport_height <= 0.0 {
            return None;
        }

        let scale = (viewport_width / frame_width).max(viewport_height / frame_height);
        Some(Self {
            frame_width,
            frame_height,
            viewport_width,
            viewport_height,
            scale,
            offset_x: (viewport_width - frame_width * scale) / 2.0,
            offset_y: (viewport_height - frame_height * scale) / 2.0,
        })
    }

    /// Map a frame-space rectangle into viewport space.
    pub fn frame_to_viewport(&self, placement: &Placement) -> Placement {
        placement.scaled(self.scale, self.offset_x, self.offset_y)
    }

    /// Map a viewport point back into frame pixels.
    pub fn viewport_to_frame(&self, x: f64, y: f64) -> (f64, f64) {
        ((x - self.offset_x) / self.scale, (y - self.offset_y) / self.scale)
    }

    /// Where the overlay must be drawn on screen for the current transform.
    pub fn overlay_rect(&self, transform: &OverlayTransform, overlay_aspect_ratio: f64) -> Placement {
        let in_frame =
            transform.resolve_geometry(self.frame_width, self.frame_height, overlay_aspect_ratio);
        self.frame_to_viewport(&in_frame)
    }
}

/// Absolute-positioning style for the overlay preview element.
pub fn css_style(rect: &Placement) -> String {
    format!(
        "left: {:.2}px; top: {:.2}px; width: {:.2}px; height: {:.2}px",
        rect.x, rect.y, rect.width, rect.height
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landscape_frame_on_portrait_phone_is_cropped_horizontally() {
        let layout = PreviewLayout::cover(1920.0, 1080.0, 390.0, 844.0).unwrap();
        assert!((layout.scale - 844.0 / 1080.0).abs() < 1e-12);
        assert!(layout.offset_x < 0.0);
        assert!(layout.offset_y.abs() < 1e-9);
    }

    #[test]
    fn preview_overlay_maps_back_onto_capture_placement() {
        let transform = OverlayTransform::default().increment(0.3);
        let layout = PreviewLayout::cover(1920.0, 1080.0, 390.0, 844.0).unwrap();
        let on_screen = layout.overlay_rect(&transform, 1.5);
        let captured = transform.resolve_geometry(1920.0, 1080.0, 1.5);

        let (fx, fy) = layout.viewport_to_frame(on_screen.x, on_screen.y);
        assert!((fx - captured.x).abs() < 1e-6);
        assert!((fy - captured.y).abs() < 1e-6);
        assert!((on_screen.width / layout.scale - captured.width).abs() < 1e-6);
    }

    #[test]
    fn overlay_stays_centered_in_viewport() {
        let layout = PreviewLayout::cover(1280.0, 720.0, 400.0, 800.0).unwrap();
        let rect = layout.overlay_rect(&OverlayTransform::default(), 1.0);
        let (cx, cy) = rect.center();
        assert!((cx - 200.0).abs() < 1e-9);
        assert!((cy - 400.0).abs() < 1e-9);
    }

    #[test]
    fn zero_sized_surfaces_have_no_layout() {
        assert!(PreviewLayout::cover(0.0, 1080.0, 390.0, 844.0).is_none());
        assert!(PreviewLayout::cover(1920.0, 1080.0, 390.0, 0.0).is_none());
    }

    #[test]
    fn css_style_string_is_stable() {
        let css = css_style(&Placement {
            x: -12.346,
            y: 9.876,
            width: 100.0,
            height: 50.5,
        });
        assert_eq!(
            css,
            "left: -12.35px; top: 9.88px; width: 100.00px; height: 50.50px"
        );
    }
}
