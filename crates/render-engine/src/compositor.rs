//! Frame compositor: flattens the camera frame and the overlay into one photo.
//!
//! The raster target always has the frame's native pixel size. The overlay
//! placement comes from [`OverlayTransform::resolve_geometry`] evaluated on
//! that size, the same call the live preview makes.

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbaImage};
use overlaycam_common::config::{ExportConfig, ExportFormat};
use overlaycam_common::error::CameraError;
use overlaycam_overlay_model::{OverlayTransform, PixelRect, Placement};
use overlaycam_platform_core::VideoFrame;

use crate::overlay_asset::OverlayAsset;

/// A captured, encoded photo. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeResult {
    image_data: Vec<u8>,
    format: ExportFormat,
    width: u32,
    height: u32,
    placement: Placement,
    created_at: DateTime<Utc>,
}

impl CompositeResult {
    /// Encoded image bytes.
    pub fn image_data(&self) -> &[u8] {
        &self.image_data
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Overlay rectangle used for this capture, in frame pixels.
    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// `data:` URL for handing the photo to an `<img>` element.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime_type(),
            BASE64_STANDARD.encode(&self.image_data)
        )
    }
}

/// Composites frames with an overlay and encodes the result.
#[derive(Debug, Clone)]
pub struct Compositor {
    format: ExportFormat,
    jpeg_quality: u8,
}

impl Default for Compositor {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            jpeg_quality: 90,
        }
    }
}

impl Compositor {
    pub fn new(format: ExportFormat, jpeg_quality: u8) -> Self {
        Self {
            format,
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(config.format, config.jpeg_quality)
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    /// Capture a photo.
    ///
    /// Fails with [`CameraError::Other`] and produces nothing when the frame
    /// has no pixels yet or the overlay has not loaded. The caller can simply
    /// try again later.
    pub fn capture(
        &self,
        frame: &VideoFrame,
        overlay: &OverlayAsset,
        transform: &OverlayTransform,
    ) -> Result<CompositeResult, CameraError> {
        if frame.is_empty() {
            return Err(CameraError::other("Camera has not delivered a frame yet"));
        }
        let overlay_image = overlay
            .image()
            .ok_or_else(|| CameraError::other("Overlay image has not finished loading"))?;

        let (raster, placement) = self.compose(frame, overlay_image, transform);
        let image_data = self.encode(&raster)?;

        tracing::debug!(
            width = raster.width(),
            height = raster.height(),
            scale = transform.scale(),
            bytes = image_data.len(),
            "Photo composited"
        );

        Ok(CompositeResult {
            image_data,
            format: self.format,
            width: raster.width(),
            height: raster.height(),
            placement,
            created_at: Utc::now(),
        })
    }

    /// Draw the frame and the overlay into a new raster of the frame's native size.
    pub fn compose(
        &self,
        frame: &VideoFrame,
        overlay: &RgbaImage,
        transform: &OverlayTransform,
    ) -> (RgbaImage, Placement) {
        let (width, height) = frame.native_size();
        let mut target = RgbaImage::new(width, height);
        imageops::replace(&mut target, frame.pixels(), 0, 0);

        let aspect = overlay.width() as f64 / overlay.height().max(1) as f64;
        let placement = transform.resolve_geometry(width as f64, height as f64, aspect);
        let rect = placement.to_pixel_rect();

        if let Some((scaled, x, y)) = visible_overlay(overlay, rect, width, height) {
            imageops::overlay(&mut target, &scaled, x, y);
        }

        (target, placement)
    }

    fn encode(&self, raster: &RgbaImage) -> Result<Vec<u8>, CameraError> {
        let mut bytes = Vec::new();
        match self.format {
            ExportFormat::Png => raster
                .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
                .map_err(|e| CameraError::other(format!("Failed to encode PNG: {e}")))?,
            ExportFormat::Jpeg => {
                let rgb = image::DynamicImage::ImageRgba8(raster.clone()).to_rgb8();
                JpegEncoder::new_with_quality(&mut bytes, self.jpeg_quality)
                    .encode_image(&rgb)
                    .map_err(|e| CameraError::other(format!("Failed to encode JPEG: {e}")))?
            }
        }
        Ok(bytes)
    }
}

const OVERLAY_FILTER: FilterType = FilterType::Triangle;

/// Resample only the source pixels that land inside the target.
///
/// Returns the scaled patch and its origin in target coordinates. The patch
/// may overhang the target by up to one source pixel on each side.
fn visible_overlay(
    overlay: &RgbaImage,
    rect: PixelRect,
    target_width: u32,
    target_height: u32,
) -> Option<(RgbaImage, i64, i64)> {
    let (src_width, src_height) = overlay.dimensions();
    if src_width == 0 || src_height == 0 {
        return None;
    }
    let visible = rect.clip_to(target_width, target_height)?;

    let sx = rect.width as f64 / src_width as f64;
    let sy = rect.height as f64 / src_height as f64;
    let (c0, c1) = source_span(visible.x - rect.x, visible.width, sx, src_width);
    let (r0, r1) = source_span(visible.y - rect.y, visible.height, sy, src_height);

    let patch = imageops::crop_imm(overlay, c0, r0, c1 - c0, r1 - r0).to_image();
    let out_width = ((c1 - c0) as f64 * sx).round().max(1.0) as u32;
    let out_height = ((r1 - r0) as f64 * sy).round().max(1.0) as u32;
    let scaled = imageops::resize(&patch, out_width, out_height, OVERLAY_FILTER);

    let x = rect.x + (c0 as f64 * sx).round() as i64;
    let y = rect.y + (r0 as f64 * sy).round() as i64;
    Some((scaled, x, y))
}

/// Source pixel range `[start, end)` covering `len` destination pixels
/// starting `offset` pixels into the scaled overlay.
fn source_span(offset: i64, len: u32, scale: f64, size: u32) -> (u32, u32) {
    let start = ((offset as f64 / scale).floor().max(0.0) as u32).min(size - 1);
    let end = (((offset + len as i64) as f64 / scale).ceil() as u32).clamp(start + 1, size);
    (start, end)
}

/// Capture with the default PNG compositor.
pub fn capture(
    frame: &VideoFrame,
    overlay: &OverlayAsset,
    transform: &OverlayTransform,
) -> Result<CompositeResult, CameraError> {
    Compositor::default().capture(frame, overlay, transform)
}
