//! Error types shared across OverlayCam crates.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level error type for OverlayCam operations outside the camera
/// error taxonomy (configuration, assets, encoding, export).
#[derive(Debug, thiserror::Error)]
pub enum OverlayCamError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Asset error: {message}")]
    Asset { message: String },

    #[error("Encoding error: {message}")]
    Encode { message: String },

    #[error("Export error: {message}")]
    Export { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using OverlayCamError.
pub type OverlayCamResult<T> = Result<T, OverlayCamError>;

impl OverlayCamError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset {
            message: msg.into(),
        }
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode {
            message: msg.into(),
        }
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export {
            message: msg.into(),
        }
    }
}

/// Which of the three camera failure classes an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraErrorKind {
    PermissionDenied,
    DeviceUnavailable,
    Other,
}

/// Error surfaced by stream acquisition and compositing.
///
/// Both return this as a value; presentation is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CameraError {
    /// The user declined camera access. Only a settings change fixes it.
    #[error("Camera access denied: {message}")]
    PermissionDenied { message: String },

    /// No suitable camera, or the camera is busy.
    #[error("Camera unavailable: {message}")]
    DeviceUnavailable { message: String },

    #[error("Camera error: {message}")]
    Other { message: String },
}

impl CameraError {
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: msg.into(),
        }
    }

    pub fn device_unavailable(msg: impl Into<String>) -> Self {
        Self::DeviceUnavailable {
            message: msg.into(),
        }
    }

    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other {
            message: msg.into(),
        }
    }

    pub fn kind(&self) -> CameraErrorKind {
        match self {
            Self::PermissionDenied { .. } => CameraErrorKind::PermissionDenied,
            Self::DeviceUnavailable { .. } => CameraErrorKind::DeviceUnavailable,
            Self::Other { .. } => CameraErrorKind::Other,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::PermissionDenied { message }
            | Self::DeviceUnavailable { message }
            | Self::Other { message } => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_error_kind_matches_variant() {
        assert_eq!(
            CameraError::permission_denied("no").kind(),
            CameraErrorKind::PermissionDenied
        );
        assert_eq!(
            CameraError::device_unavailable("busy").kind(),
            CameraErrorKind::DeviceUnavailable
        );
        assert_eq!(CameraError::other("x").message(), "x");
    }

    #[test]
    fn camera_error_serializes_tagged() {
        let json = serde_json::to_string(&CameraError::permission_denied("denied")).unwrap();
        assert_eq!(json, r#"{"kind":"permission_denied","message":"denied"}"#);
    }

    #[test]
    fn helpers_build_messages() {
        let err = OverlayCamError::config("bad bounds");
        assert_eq!(err.to_string(), "Configuration error: bad bounds");
    }
}
