//! The static overlay image.

use std::path::{Path, PathBuf};

use image::RgbaImage;

/// Load state of the overlay image.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetState {
    /// Not loaded yet.
    Pending,
    Loaded(RgbaImage),
    /// Loading failed; the message says why.
    Failed(String),
}

/// Overlay image plus where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayAsset {
    source: Option<PathBuf>,
    state: AssetState,
}

impl OverlayAsset {
    /// Asset whose image has not arrived yet.
    pub fn pending() -> Self {
        Self {
            source: None,
            state: AssetState::Pending,
        }
    }

    /// Asset from an already decoded image. A zero-sized image counts as failed,
    /// matching a browser image with no natural size.
    pub fn from_image(image: RgbaImage) -> Self {
        Self {
            source: None,
            state: loaded_or_failed(image),
        }
    }

    /// Decode an overlay from encoded bytes (PNG, JPEG).
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let state = match image::load_from_memory(bytes) {
            Ok(img) => loaded_or_failed(img.to_rgba8()),
            Err(e) => AssetState::Failed(format!("Failed to decode overlay: {e}")),
        };
        Self {
            source: None,
            state,
        }
    }

    /// Load an overlay from disk. Failures are recorded in the state rather
    /// than returned, so a missing asset only disables capture.
    pub fn load(path: &Path) -> Self {
        let state = match image::open(path) {
            Ok(img) => loaded_or_failed(img.to_rgba8()),
            Err(e) => AssetState::Failed(format!("Failed to load overlay {path:?}: {e}")),
        };
        match &state {
            AssetState::Loaded(img) => {
                tracing::info!(path = %path.display(), width = img.width(), height = img.height(), "Overlay loaded");
            }
            AssetState::Failed(reason) => tracing::warn!(%reason, "Overlay unavailable"),
            AssetState::Pending => {}
        }
        Self {
            source: Some(path.to_path_buf()),
            state,
        }
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn state(&self) -> &AssetState {
        &self.state
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, AssetState::Loaded(_))
    }

    pub fn image(&self) -> Option<&RgbaImage> {
        match &self.state {
            AssetState::Loaded(img) => Some(img),
            _ => None,
        }
    }

    /// Natural `(width, height)` once loaded.
    pub fn natural_size(&self) -> Option<(u32, u32)> {
        self.image().map(RgbaImage::dimensions)
    }

    /// Natural width divided by natural height.
    pub fn aspect_ratio(&self) -> Option<f64> {
        self.natural_size().map(|(w, h)| w as f64 / h as f64)
    }
}

fn loaded_or_failed(image: RgbaImage) -> AssetState {
    if image.width() == 0 || image.height() == 0 {
        AssetState::Failed("Overlay image has no pixels".to_string())
    } else {
        AssetState::Loaded(image)
    }
}
