//! What the capture page shows.

use overlaycam_capture_engine::error::{ACCESS_FAILED_MESSAGE, PERMISSION_DENIED_MESSAGE};
use overlaycam_capture_engine::permissions::{permission_guidance, MOBILE_ONLY_NOTICE};
use overlaycam_capture_engine::AcquirerState;
use overlaycam_common::error::CameraError;
use serde::{Deserialize, Serialize};

/// Screen the capture page is on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ViewStatus {
    /// Client failed the mobile check; only a notice is shown.
    Unsupported,
    /// Waiting for the camera.
    Starting,
    /// Live camera with overlay and controls.
    Live,
    /// Error screen with remediation steps and a retry button.
    PermissionDenied { guidance: String },
    /// Error screen with the failure message and a retry button.
    Unavailable { message: String },
}

impl ViewStatus {
    pub(crate) fn resolve(
        eligible: bool,
        state: AcquirerState,
        last_error: Option<&CameraError>,
    ) -> Self {
        if !eligible {
            return ViewStatus::Unsupported;
        }
        match state {
            AcquirerState::Idle | AcquirerState::Requesting => ViewStatus::Starting,
            AcquirerState::Active => ViewStatus::Live,
            AcquirerState::Denied => ViewStatus::PermissionDenied {
                guidance: permission_guidance(),
            },
            AcquirerState::Failed => ViewStatus::Unavailable {
                message: last_error
                    .map(|e| e.message().to_string())
                    .unwrap_or_else(|| ACCESS_FAILED_MESSAGE.to_string()),
            },
        }
    }

    /// Whether the retry button is offered.
    pub fn can_retry(&self) -> bool {
        matches!(
            self,
            ViewStatus::PermissionDenied { .. } | ViewStatus::Unavailable { .. }
        )
    }

    /// Headline text for the screen.
    pub fn headline(&self) -> &str {
        match self {
            ViewStatus::Unsupported => MOBILE_ONLY_NOTICE,
            ViewStatus::Starting => "Starting camera...",
            ViewStatus::Live => "Camera ready",
            ViewStatus::PermissionDenied { .. } => PERMISSION_DENIED_MESSAGE,
            ViewStatus::Unavailable { .. } => ACCESS_FAILED_MESSAGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ineligible_wins_over_camera_state() {
        let status = ViewStatus::resolve(false, AcquirerState::Active, None);
        assert_eq!(status, ViewStatus::Unsupported);
        assert_eq!(status.headline(), "Available on mobile devices only");
        assert!(!status.can_retry());
    }

    #[test]
    fn denial_shows_guidance() {
        let status = ViewStatus::resolve(true, AcquirerState::Denied, None);
        match &status {
            ViewStatus::PermissionDenied { guidance } => {
                assert!(guidance.contains("Reload the page."))
            }
            other => panic!("unexpected status {other:?}"),
        }
        assert!(status.can_retry());
    }

    #[test]
    fn failure_carries_error_message() {
        let err = CameraError::device_unavailable("Could not start video source");
        let status = ViewStatus::resolve(true, AcquirerState::Failed, Some(&err));
        assert_eq!(
            status,
            ViewStatus::Unavailable {
                message: "Could not start video source".to_string()
            }
        );
    }

    #[test]
    fn serializes_with_status_tag() {
        let json = serde_json::to_value(ViewStatus::Live).unwrap();
        assert_eq!(json["status"], "live");
    }
}
