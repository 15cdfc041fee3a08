//! Application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{OverlayCamError, OverlayCamResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Overlay placement and zoom settings.
    pub overlay: OverlayConfig,

    /// Camera activation settings.
    pub camera: CameraConfig,

    /// Export settings for captured photos.
    pub export: ExportConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Overlay layer parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Path of the static overlay image.
    pub asset_path: PathBuf,

    /// Lower zoom bound (inclusive).
    pub min_scale: f64,

    /// Upper zoom bound (inclusive).
    pub max_scale: f64,

    /// Scale applied when a view is created.
    pub initial_scale: f64,

    /// Amount added or removed by one zoom button press.
    pub step: f64,

    /// Fraction of the frame width covered by the overlay at scale 1.0.
    pub base_width_fraction: f64,
}

/// Camera activation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Start the camera as soon as the device is classified as eligible.
    pub auto_start: bool,

    /// Frame width delivered by the synthetic camera backend.
    pub synthetic_width: u32,

    /// Frame height delivered by the synthetic camera backend.
    pub synthetic_height: u32,
}

/// Encoded format of captured photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
}

impl ExportFormat {
    /// MIME type of the encoded blob.
    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
        }
    }

    /// File extension used by file sinks.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
        }
    }
}

/// Export parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Encoded format of captured photos.
    pub format: ExportFormat,

    /// JPEG quality (1-100), ignored for PNG.
    pub jpeg_quality: u8,

    /// Directory used by the file export sink.
    pub output_dir: PathBuf,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "overlaycam=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            asset_path: PathBuf::from("test.jpg"),
            min_scale: 0.5,
            max_scale: 2.0,
            initial_scale: 1.0,
            step: 0.1,
            base_width_fraction: 0.7,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            auto_start: true,
            synthetic_width: 1920,
            synthetic_height: 1080,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            jpeg_quality: 90,
            output_dir: PathBuf::from("."),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl OverlayConfig {
    /// Check the zoom bounds and placement parameters.
    pub fn validate(&self) -> OverlayCamResult<()> {
        let finite = [
            self.min_scale,
            self.max_scale,
            self.initial_scale,
            self.step,
            self.base_width_fraction,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(OverlayCamError::config("overlay values must be finite"));
        }
        if self.min_scale <= 0.0 {
            return Err(OverlayCamError::config(format!(
                "min_scale must be positive, got {}",
                self.min_scale
            )));
        }
        if self.min_scale > self.max_scale {
            return Err(OverlayCamError::config(format!(
                "min_scale {} exceeds max_scale {}",
                self.min_scale, self.max_scale
            )));
        }
        if !(self.min_scale..=self.max_scale).contains(&self.initial_scale) {
            return Err(OverlayCamError::config(format!(
                "initial_scale {} outside [{}, {}]",
                self.initial_scale, self.min_scale, self.max_scale
            )));
        }
        if self.step <= 0.0 {
            return Err(OverlayCamError::config("step must be positive"));
        }
        if self.base_width_fraction <= 0.0 {
            return Err(OverlayCamError::config(
                "base_width_fraction must be positive",
            ));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load and validate config from an explicit path.
    pub fn load_from(path: &Path) -> OverlayCamResult<Self> {
        if !path.exists() {
            return Err(OverlayCamError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> OverlayCamResult<()> {
        self.save_to(&config_file_path())
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, path: &Path) -> OverlayCamResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> OverlayCamResult<()> {
        self.overlay.validate()?;
        if self.camera.synthetic_width == 0 || self.camera.synthetic_height == 0 {
            return Err(OverlayCamError::config(
                "synthetic camera resolution must be non-zero",
            ));
        }
        if !(1..=100).contains(&self.export.jpeg_quality) {
            return Err(OverlayCamError::config(format!(
                "jpeg_quality must be within 1..=100, got {}",
                self.export.jpeg_quality
            )));
        }
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("overlaycam").join("config.json")
}
