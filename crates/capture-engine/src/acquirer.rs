//! Camera stream acquisition state machine.
//!
//! ```text
//!          start()/retry()
//!   Idle ───────────────▶ Requesting ──grant──▶ Active
//!    ▲                      │    │
//!    │ stop()        denied │    │ other failure
//!    │                      ▼    ▼
//!    └──────────────── Denied   Failed ──retry()──▶ Requesting
//! ```
//!
//! The acquirer owns at most one [`StreamSession`]. A new `start()` releases
//! the previous session before asking the platform again, so only one camera
//! track is ever open per acquirer.

use overlaycam_common::error::CameraError;
use overlaycam_platform_core::{StreamConstraints, VideoFrame};
use serde::{Deserialize, Serialize};

use crate::backend::CameraBackend;
use crate::error::classify_rejection;
use crate::session::StreamSession;

/// State of the acquisition state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquirerState {
    /// Nothing requested, or stopped.
    Idle,
    /// Waiting for the platform to answer.
    Requesting,
    /// A stream is held.
    Active,
    /// The user refused camera access.
    Denied,
    /// Acquisition failed for another reason.
    Failed,
}

/// What the platform has said about camera permission so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionState {
    Unrequested,
    Granted,
    /// Sticky until a later request is granted.
    Denied,
}

/// Acquires and owns the camera stream for one view.
pub struct StreamAcquirer<B: CameraBackend> {
    backend: B,
    constraints: StreamConstraints,
    state: AcquirerState,
    permission: PermissionState,
    last_error: Option<CameraError>,
    session: Option<StreamSession>,
    next_session_id: u64,
}

impl<B: CameraBackend> StreamAcquirer<B> {
    /// Acquirer requesting the rear camera without audio.
    pub fn new(backend: B) -> Self {
        Self::with_constraints(backend, StreamConstraints::REAR_VIDEO_ONLY)
    }

    pub fn with_constraints(backend: B, constraints: StreamConstraints) -> Self {
        Self {
            backend,
            constraints,
            state: AcquirerState::Idle,
            permission: PermissionState::Unrequested,
            last_error: None,
            session: None,
            next_session_id: 1,
        }
    }

    pub fn state(&self) -> AcquirerState {
        self.state
    }

    pub fn permission_state(&self) -> PermissionState {
        self.permission
    }

    pub fn last_error(&self) -> Option<&CameraError> {
        self.last_error.as_ref()
    }

    pub fn session(&self) -> Option<&StreamSession> {
        self.session.as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Whether an active session is held.
    pub fn is_active(&self) -> bool {
        self.session.as_ref().is_some_and(StreamSession::is_active)
    }

    /// Latest frame of the active session.
    pub fn current_frame(&self) -> Option<VideoFrame> {
        self.session.as_ref().and_then(StreamSession::current_frame)
    }

    /// Request a stream from the platform.
    ///
    /// Any session already held is stopped first. Suspends only while the
    /// platform answers. If the returned future is dropped before it
    /// completes, a stream that was already handed over is released by its
    /// session guard and the state stays `Requesting` until `stop()`.
    pub async fn start(&mut self) -> Result<&StreamSession, CameraError> {
        self.release_session("superseded");
        self.state = AcquirerState::Requesting;
        self.last_error = None;

        tracing::info!(
            backend = self.backend.name(),
            facing = self.constraints.facing.as_str(),
            audio = self.constraints.audio,
            "Requesting camera stream"
        );

        match self.backend.request_stream(&self.constraints).await {
            Ok(handle) => {
                let id = self.next_session_id;
                self.next_session_id += 1;
                let session = StreamSession::new(id, handle);

                self.state = AcquirerState::Active;
                self.permission = PermissionState::Granted;
                tracing::info!(session = id, label = %session.label(), "Camera stream active");
                Ok(&*self.session.insert(session))
            }
            Err(rejection) => {
                let error = classify_rejection(&rejection);
                if matches!(error, CameraError::PermissionDenied { .. }) {
                    self.state = AcquirerState::Denied;
                    self.permission = PermissionState::Denied;
                    tracing::warn!(rejection = %rejection, "Camera permission denied");
                } else {
                    self.state = AcquirerState::Failed;
                    tracing::warn!(rejection = %rejection, kind = ?error.kind(), "Camera acquisition failed");
                }
                self.last_error = Some(error.clone());
                Err(error)
            }
        }
    }

    /// User-triggered retry after `Denied` or `Failed`. Re-enters `Requesting`.
    pub async fn retry(&mut self) -> Result<&StreamSession, CameraError> {
        tracing::info!(from = ?self.state, "Retrying camera acquisition");
        self.start().await
    }

    /// Release the camera and return to `Idle`. Safe in any state.
    pub fn stop(&mut self) {
        self.release_session("stopped");
        self.state = AcquirerState::Idle;
        self.last_error = None;
    }

    fn release_session(&mut self, reason: &str) {
        if let Some(mut session) = self.session.take() {
            tracing::debug!(session = session.id(), reason, "Releasing camera session");
            session.stop();
        }
    }
}

impl<B: CameraBackend> std::fmt::Debug for StreamAcquirer<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamAcquirer")
            .field("backend", &self.backend.name())
            .field("state", &self.state)
            .field("permission", &self.permission)
            .field("last_error", &self.last_error)
            .field("session", &self.session)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use overlaycam_common::error::CameraErrorKind;
    use overlaycam_platform_core::PlatformRejection;

    use super::*;
    use crate::backend::{ScriptedOutcome, SyntheticBackend};

    fn acquirer() -> (Arc<SyntheticBackend>, StreamAcquirer<Arc<SyntheticBackend>>) {
        let backend = Arc::new(SyntheticBackend::new(640, 480));
        (backend.clone(), StreamAcquirer::new(backend))
    }

    #[tokio::test]
    async fn grant_moves_to_active() {
        let (_backend, mut acq) = acquirer();
        assert_eq!(acq.state(), AcquirerState::Idle);
        assert_eq!(acq.permission_state(), PermissionState::Unrequested);

        let session = acq.start().await.unwrap();
        assert!(session.is_active());
        assert_eq!(acq.state(), AcquirerState::Active);
        assert_eq!(acq.permission_state(), PermissionState::Granted);
        assert_eq!(acq.current_frame().unwrap().native_size(), (640, 480));
    }

    #[tokio::test]
    async fn restart_keeps_exactly_one_live_track() {
        let (backend, mut acq) = acquirer();
        acq.start().await.unwrap();
        acq.start().await.unwrap();

        let tracks = backend.issued_tracks();
        assert_eq!(tracks.len(), 2);
        assert!(!tracks[0].is_live());
        assert!(tracks[1].is_live());
        assert_eq!(backend.live_track_count(), 1);
        assert_eq!(acq.session().unwrap().id(), 2);
    }

    #[tokio::test]
    async fn denial_is_sticky_until_retry_succeeds() {
        let (backend, mut acq) = acquirer();
        backend.deny_next();

        let err = acq.start().await.unwrap_err();
        assert_eq!(err.kind(), CameraErrorKind::PermissionDenied);
        assert_eq!(acq.state(), AcquirerState::Denied);
        assert_eq!(acq.permission_state(), PermissionState::Denied);
        assert_eq!(acq.last_error(), Some(&err));

        backend.deny_next();
        acq.retry().await.unwrap_err();
        assert_eq!(acq.permission_state(), PermissionState::Denied);

        acq.retry().await.unwrap();
        assert_eq!(acq.state(), AcquirerState::Active);
        assert_eq!(acq.permission_state(), PermissionState::Granted);
        assert!(acq.last_error().is_none());
    }

    #[tokio::test]
    async fn retry_reenters_requesting() {
        let backend = Arc::new(SyntheticBackend::new(64, 64).with_latency(Duration::from_millis(50)));
        let mut acq = StreamAcquirer::new(backend.clone());
        backend.deny_next();
        acq.start().await.unwrap_err();
        assert_eq!(acq.state(), AcquirerState::Denied);

        {
            let retry = acq.retry();
            tokio::pin!(retry);
            let pending = tokio::time::timeout(Duration::from_millis(5), &mut retry)
                .await
                .is_err();
            assert!(pending, "platform answer should still be pending");
        }
        assert_eq!(acq.state(), AcquirerState::Requesting);
    }

    #[tokio::test]
    async fn device_failure_moves_to_failed() {
        let (backend, mut acq) = acquirer();
        backend.push_outcome(ScriptedOutcome::Reject(PlatformRejection::not_found(
            "no video input",
        )));

        let err = acq.start().await.unwrap_err();
        assert_eq!(err.kind(), CameraErrorKind::DeviceUnavailable);
        assert_eq!(acq.state(), AcquirerState::Failed);
        assert_eq!(acq.permission_state(), PermissionState::Unrequested);
        assert!(acq.session().is_none());
    }

    #[tokio::test]
    async fn failed_restart_still_releases_previous_track() {
        let (backend, mut acq) = acquirer();
        acq.start().await.unwrap();
        backend.push_outcome(ScriptedOutcome::Reject(PlatformRejection::not_readable(
            "busy",
        )));

        acq.start().await.unwrap_err();
        assert_eq!(backend.live_track_count(), 0);
        assert!(!acq.is_active());
    }

    #[tokio::test]
    async fn stop_releases_and_returns_to_idle() {
        let (backend, mut acq) = acquirer();
        acq.start().await.unwrap();
        acq.stop();
        acq.stop();

        assert_eq!(acq.state(), AcquirerState::Idle);
        assert!(acq.current_frame().is_none());
        assert_eq!(backend.live_track_count(), 0);
    }

    #[tokio::test]
    async fn cancelled_start_leaks_nothing() {
        let backend = Arc::new(SyntheticBackend::new(64, 64).with_latency(Duration::from_millis(50)));
        let mut acq = StreamAcquirer::new(backend.clone());

        let timed_out = tokio::time::timeout(Duration::from_millis(5), acq.start())
            .await
            .is_err();
        assert!(timed_out);
        assert_eq!(acq.state(), AcquirerState::Requesting);

        acq.stop();
        assert_eq!(acq.state(), AcquirerState::Idle);
        assert_eq!(backend.live_track_count(), 0);
    }

    #[tokio::test]
    async fn dropping_acquirer_releases_camera() {
        let (backend, mut acq) = acquirer();
        acq.start().await.unwrap();
        drop(acq);
        assert_eq!(backend.live_track_count(), 0);
    }
}
