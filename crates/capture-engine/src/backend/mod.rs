use std::sync::Arc;

use overlaycam_platform_core::{PlatformRejection, StreamConstraints, StreamHandle};

/// Abstract interface to the host's camera API.
///
/// In a browser this is `navigator.mediaDevices.getUserMedia`; the
/// [`StreamAcquirer`](crate::StreamAcquirer) is its only caller.
#[async_trait::async_trait]
pub trait CameraBackend: Send + Sync {
    /// Ask the platform for a stream matching `constraints`.
    ///
    /// Suspends until the platform answers (the permission prompt may be
    /// showing). Rejections carry the platform's error name.
    async fn request_stream(
        &self,
        constraints: &StreamConstraints,
    ) -> Result<Box<dyn StreamHandle>, PlatformRejection>;

    /// Backend identifier for logs.
    fn name(&self) -> &str;
}

#[async_trait::async_trait]
impl<T: CameraBackend + ?Sized> CameraBackend for Arc<T> {
    async fn request_stream(
        &self,
        constraints: &StreamConstraints,
    ) -> Result<Box<dyn StreamHandle>, PlatformRejection> {
        (**self).request_stream(constraints).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[async_trait::async_trait]
impl<T: CameraBackend + ?Sized> CameraBackend for Box<T> {
    async fn request_stream(
        &self,
        constraints: &StreamConstraints,
    ) -> Result<Box<dyn StreamHandle>, PlatformRejection> {
        (**self).request_stream(constraints).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

pub mod synthetic;

pub use synthetic::{ScriptedOutcome, SyntheticBackend, TrackProbe};
