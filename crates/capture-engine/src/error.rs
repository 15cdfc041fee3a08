//! Mapping of platform rejections onto the camera error taxonomy.

use overlaycam_common::error::CameraError;
use overlaycam_platform_core::PlatformRejection;

/// Platform error names meaning the user (or a policy) refused access.
const PERMISSION_NAMES: &[&str] = &["NotAllowedError", "PermissionDeniedError", "SecurityError"];

/// Platform error names meaning no usable camera right now.
const UNAVAILABLE_NAMES: &[&str] = &[
    "NotFoundError",
    "DevicesNotFoundError",
    "NotReadableError",
    "TrackStartError",
    "OverconstrainedError",
    "ConstraintNotSatisfiedError",
    "AbortError",
];

pub const PERMISSION_DENIED_MESSAGE: &str = "Camera access denied.";
pub const ACCESS_FAILED_MESSAGE: &str = "Could not access the camera";

/// Classify a rejected stream request.
pub fn classify_rejection(rejection: &PlatformRejection) -> CameraError {
    let name = rejection.name.as_str();
    if PERMISSION_NAMES.contains(&name) {
        CameraError::permission_denied(PERMISSION_DENIED_MESSAGE)
    } else if UNAVAILABLE_NAMES.contains(&name) {
        CameraError::device_unavailable(format!("{ACCESS_FAILED_MESSAGE} ({rejection})"))
    } else {
        CameraError::other(format!("{ACCESS_FAILED_MESSAGE} ({rejection})"))
    }
}
