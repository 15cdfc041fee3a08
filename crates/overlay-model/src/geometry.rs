//! Placement rectangles for the overlay layer.
//!
//! Coordinates are in pixels of whatever surface the placement was resolved
//! against: native frame pixels for capture, viewport pixels for preview.

use serde::{Deserialize, Serialize};

/// Overlay rectangle in surface pixels. May extend past the surface edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Integer rectangle used when drawing into a raster target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl Placement {
    /// Center `width x height` inside a `frame_width x frame_height` surface.
    pub fn centered(frame_width: f64, frame_height: f64, width: f64, height: f64) -> Self {
        Self {
            x: (frame_width - width) / 2.0,
            y: (frame_height - height) / 2.0,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// The center point of the placement.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether any part of the placement falls outside the surface.
    pub fn exceeds(&self, surface_width: f64, surface_height: f64) -> bool {
        self.x < 0.0 || self.y < 0.0 || self.right() > surface_width || self.bottom() > surface_height
    }

    /// Round to whole pixels. Size is at least 1x1 so a drawn overlay never
    /// disappears at tiny scales.
    pub fn to_pixel_rect(&self) -> PixelRect {
        PixelRect {
            x: self.x.round() as i64,
            y: self.y.round() as i64,
            width: self.width.round().max(1.0) as u32,
            height: self.height.round().max(1.0) as u32,
        }
    }

    /// Map through a uniform scale followed by a translation.
    pub fn scaled(&self, scale: f64, offset_x: f64, offset_y: f64) -> Self {
        Self {
            x: self.x * scale + offset_x,
            y: self.y * scale + offset_y,
            width: self.width * scale,
            height: self.height * scale,
        }
    }
}

impl PixelRect {
    /// Part of the rectangle that lies inside a `width x height` surface.
    pub fn clip_to(&self, width: u32, height: u32) -> Option<PixelRect> {
        let left = self.x.max(0);
        let top = self.y.max(0);
        let right = (self.x + self.width as i64).min(width as i64);
        let bottom = (self.y + self.height as i64).min(height as i64);
        if right <= left || bottom <= top {
            return None;
        }
        Some(PixelRect {
            x: left,
            y: top,
            width: (right - left) as u32,
            height: (bottom - top) as u32,
        })
    }
}
