//! Camera stream contracts shared by backends and the acquirer.

use serde::{Deserialize, Serialize};

use crate::frame::VideoFrame;

/// Camera-facing direction requested from the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FacingMode {
    /// Rear-facing sensor.
    #[default]
    Environment,
    /// Front-facing sensor.
    User,
}

impl FacingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            FacingMode::Environment => "environment",
            FacingMode::User => "user",
        }
    }
}

/// Constraints passed with a stream request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamConstraints {
    pub facing: FacingMode,
    pub audio: bool,
}

impl StreamConstraints {
    /// Rear camera, no audio track.
    pub const REAR_VIDEO_ONLY: StreamConstraints = StreamConstraints {
        facing: FacingMode::Environment,
        audio: false,
    };
}

impl Default for StreamConstraints {
    fn default() -> Self {
        Self::REAR_VIDEO_ONLY
    }
}

/// A stream request rejected by the platform.
///
/// `name` carries the platform's error identifier (the DOMException name in
/// a browser, e.g. `NotAllowedError`).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{name}: {message}")]
pub struct PlatformRejection {
    pub name: String,
    pub message: String,
}

impl PlatformRejection {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn not_allowed(message: impl Into<String>) -> Self {
        Self::new("NotAllowedError", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NotFoundError", message)
    }

    pub fn not_readable(message: impl Into<String>) -> Self {
        Self::new("NotReadableError", message)
    }
}

/// A live media stream owned by the caller.
///
/// Implementations release the underlying hardware in `stop_all_tracks`;
/// calling it more than once must be harmless.
pub trait StreamHandle: Send + Sync {
    /// Stop every track of the stream.
    fn stop_all_tracks(&mut self);

    /// Whether any track is still delivering frames.
    fn is_live(&self) -> bool;

    /// Most recent frame, or `None` once the tracks are stopped.
    ///
    /// A live stream that has not decoded its first frame yet returns an
    /// empty frame.
    fn current_frame(&self) -> Option<VideoFrame>;

    /// Short label for logs (device name or backend id).
    fn label(&self) -> &str;
}
