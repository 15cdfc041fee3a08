//! Stream session ownership.

use chrono::{DateTime, Utc};
use overlaycam_platform_core::{StreamHandle, VideoFrame};

/// An acquired camera stream.
///
/// The session owns the platform handle. Its tracks are stopped exactly once,
/// either by [`StreamSession::stop`] or when the session is dropped, so every
/// exit path (supersession, error, teardown, a cancelled caller) releases
/// the camera.
pub struct StreamSession {
    id: u64,
    handle: Box<dyn StreamHandle>,
    acquired_at: DateTime<Utc>,
    active: bool,
}

impl StreamSession {
    pub fn new(id: u64, handle: Box<dyn StreamHandle>) -> Self {
        Self {
            id,
            handle,
            acquired_at: Utc::now(),
            active: true,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn acquired_at(&self) -> DateTime<Utc> {
        self.acquired_at
    }

    pub fn label(&self) -> &str {
        self.handle.label()
    }

    /// Not stopped, and the platform still reports a live track.
    pub fn is_active(&self) -> bool {
        self.active && self.handle.is_live()
    }

    /// Latest frame at native resolution. `None` after the session stopped.
    pub fn current_frame(&self) -> Option<VideoFrame> {
        if !self.active {
            return None;
        }
        self.handle.current_frame()
    }

    /// Stop all tracks. Idempotent.
    pub fn stop(&mut self) {
        if !self.active {
            return;
        }
        self.handle.stop_all_tracks();
        self.active = false;
        tracing::info!(session = self.id, label = %self.handle.label(), "Camera tracks stopped");
    }
}

impl Drop for StreamSession {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for StreamSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamSession")
            .field("id", &self.id)
            .field("label", &self.handle.label())
            .field("acquired_at", &self.acquired_at)
            .field("active", &self.active)
            .finish()
    }
}
