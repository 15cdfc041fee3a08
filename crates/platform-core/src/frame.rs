//! Video frames delivered by a live stream.

use image::RgbaImage;

/// A single decoded video frame at the sensor's native pixel size.
///
/// Native size is what the stream delivers (`videoWidth`/`videoHeight` in a
/// browser), not the size of the element displaying it.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFrame {
    pixels: RgbaImage,
}

impl VideoFrame {
    pub fn new(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    /// Frame of the given size filled with one color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, image::Rgba(rgba)),
        }
    }

    /// Placeholder for a stream that has not delivered its first frame yet.
    pub fn empty() -> Self {
        Self {
            pixels: RgbaImage::new(0, 0),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// `(width, height)` in native pixels.
    pub fn native_size(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// True when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_pixels(self) -> RgbaImage {
        self.pixels
    }
}
