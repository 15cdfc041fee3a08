//! Export sinks for captured photos.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use overlaycam_common::config::{ExportConfig, ExportFormat};
use overlaycam_common::error::{OverlayCamError, OverlayCamResult};
use serde::Serialize;

use crate::compositor::CompositeResult;

/// Where a delivered photo ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportReceipt {
    /// Sink that accepted the photo.
    pub sink: String,

    /// File written, for sinks backed by the filesystem.
    pub path: Option<PathBuf>,

    /// Number of encoded bytes delivered.
    pub bytes: usize,

    pub format: ExportFormat,
}

/// Receives finished photos.
pub trait ExportSink {
    /// Hand a photo to the sink.
    fn deliver(&mut self, result: &CompositeResult) -> OverlayCamResult<ExportReceipt>;

    /// Sink name.
    fn name(&self) -> &str;
}

/// Writes each photo to `<dir>/photo-<timestamp>.<ext>`.
#[derive(Debug, Clone)]
pub struct FileExportSink {
    dir: PathBuf,
}

impl FileExportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(config.output_dir.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// First free path for a photo taken at `taken_at`.
    fn target_path(&self, taken_at: DateTime<Utc>, format: ExportFormat) -> PathBuf {
        let stem = photo_file_stem(taken_at);
        let ext = format.extension();
        let mut path = self.dir.join(format!("{stem}.{ext}"));
        let mut n = 1;
        while path.exists() {
            path = self.dir.join(format!("{stem}-{n}.{ext}"));
            n += 1;
        }
        path
    }
}

impl ExportSink for FileExportSink {
    fn deliver(&mut self, result: &CompositeResult) -> OverlayCamResult<ExportReceipt> {
        if result.image_data().is_empty() {
            return Err(OverlayCamError::export("Refusing to write an empty photo"));
        }
        std::fs::create_dir_all(&self.dir)?;

        let path = self.target_path(result.created_at(), result.format());
        std::fs::write(&path, result.image_data())?;
        tracing::info!(path = %path.display(), bytes = result.image_data().len(), "Photo exported");

        Ok(ExportReceipt {
            sink: self.name().to_string(),
            path: Some(path),
            bytes: result.image_data().len(),
            format: result.format(),
        })
    }

    fn name(&self) -> &str {
        "file"
    }
}

/// Keeps delivered photos in memory.
#[derive(Debug, Default)]
pub struct MemoryExportSink {
    delivered: Vec<CompositeResult>,
}

impl MemoryExportSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delivered(&self) -> &[CompositeResult] {
        &self.delivered
    }

    pub fn last(&self) -> Option<&CompositeResult> {
        self.delivered.last()
    }
}

impl ExportSink for MemoryExportSink {
    fn deliver(&mut self, result: &CompositeResult) -> OverlayCamResult<ExportReceipt> {
        self.delivered.push(result.clone());
        Ok(ExportReceipt {
            sink: self.name().to_string(),
            path: None,
            bytes: result.image_data().len(),
            format: result.format(),
        })
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// `photo-20240102T030405123Z` style file stem.
pub fn photo_file_stem(taken_at: DateTime<Utc>) -> String {
    format!("photo-{}", taken_at.format("%Y%m%dT%H%M%S%3fZ"))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use image::{Rgba, RgbaImage};
    use overlaycam_overlay_model::OverlayTransform;
    use overlaycam_platform_core::VideoFrame;

    use super::*;
    use crate::compositor::{capture, Compositor};
    use crate::overlay_asset::OverlayAsset;

    fn overlay() -> OverlayAsset {
        OverlayAsset::from_image(RgbaImage::from_pixel(4, 4, Rgba([0, 255, 0, 255])))
    }

    fn photo() -> CompositeResult {
        let frame = VideoFrame::solid(32, 24, [0, 0, 0, 255]);
        capture(&frame, &overlay(), &OverlayTransform::default()).unwrap()
    }

    #[test]
    fn file_stem_uses_utc_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(photo_file_stem(at), "photo-20240102T030405000Z");
    }

    #[test]
    fn file_sink_writes_decodable_photo() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FileExportSink::new(dir.path().join("out"));

        let receipt = sink.deliver(&photo()).unwrap();
        let path = receipt.path.unwrap();
        assert_eq!(path.extension().unwrap(), "png");
        assert!(path.starts_with(dir.path().join("out")));

        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (32, 24));
    }

    #[test]
    fn repeated_delivery_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FileExportSink::new(dir.path());
        let result = photo();

        let first = sink.deliver(&result).unwrap().path.unwrap();
        let second = sink.deliver(&result).unwrap().path.unwrap();
        assert_ne!(first, second);
        assert!(first.exists() && second.exists());
    }

    #[test]
    fn jpeg_photos_get_jpg_extension() {
        let dir = tempfile::tempdir().unwrap();
        let frame = VideoFrame::solid(16, 16, [10, 20, 30, 255]);
        let result = Compositor::new(ExportFormat::Jpeg, 75)
            .capture(&frame, &overlay(), &OverlayTransform::default())
            .unwrap();

        let receipt = FileExportSink::new(dir.path()).deliver(&result).unwrap();
        assert_eq!(receipt.format, ExportFormat::Jpeg);
        assert_eq!(receipt.path.unwrap().extension().unwrap(), "jpg");
    }

    #[test]
    fn memory_sink_keeps_results_in_order() {
        let mut sink = MemoryExportSink::new();
        let receipt = sink.deliver(&photo()).unwrap();
        sink.deliver(&photo()).unwrap();

        assert_eq!(receipt.sink, "memory");
        assert!(receipt.path.is_none());
        assert_eq!(sink.delivered().len(), 2);
        assert_eq!(sink.last().unwrap().width(), 32);
    }
}
