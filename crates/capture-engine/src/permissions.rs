//! Capability checks and remediation guidance.
//!
//! The capture page needs a mobile client and camera permission. When
//! permission is refused only the user can fix it, out of band, so the
//! error screen shows these steps next to the retry button.

use overlaycam_common::error::CameraError;
use overlaycam_platform_core::DevicePlatform;

use crate::acquirer::PermissionState;

/// Steps for re-enabling camera access after a denial.
pub const PERMISSION_GUIDANCE: &[&str] = &[
    "Open the browser settings (or tap the lock icon in the address bar).",
    "Find the \"Permissions\" or \"Camera\" section.",
    "Allow camera access for this site.",
    "Reload the page.",
];

/// Explanation shown above [`PERMISSION_GUIDANCE`].
pub const PERMISSION_SUMMARY: &str = "You have blocked camera access. To use this feature, allow camera access in your browser or device settings.";

/// Shown to clients that fail the device check.
pub const MOBILE_ONLY_NOTICE: &str = "Available on mobile devices only";

/// A capability the capture flow may need.
#[derive(Debug, Clone)]
pub struct Capability {
    pub name: String,
    pub description: String,
    pub available: bool,
    pub required: bool,
    pub fix_instructions: Option<String>,
}

/// Numbered remediation text for a permission denial.
pub fn permission_guidance() -> String {
    let steps = PERMISSION_GUIDANCE
        .iter()
        .enumerate()
        .map(|(i, step)| format!("{}. {step}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{PERMISSION_SUMMARY}\n\n{steps}")
}

/// Check what the capture flow needs and report status.
pub fn check_capabilities(
    platform: DevicePlatform,
    permission: PermissionState,
    last_error: Option<&CameraError>,
) -> Vec<Capability> {
    vec![
        check_mobile_device(platform),
        check_camera_permission(permission),
        check_camera_device(last_error),
    ]
}

fn check_mobile_device(platform: DevicePlatform) -> Capability {
    let available = platform.is_mobile();
    Capability {
        name: "Mobile Device".to_string(),
        description: format!("Client platform: {platform:?}"),
        available,
        required: true,
        fix_instructions: if available {
            None
        } else {
            Some("Open this page on a phone or tablet".to_string())
        },
    }
}

fn check_camera_permission(permission: PermissionState) -> Capability {
    let available = permission != PermissionState::Denied;
    Capability {
        name: "Camera Permission".to_string(),
        description: match permission {
            PermissionState::Unrequested => "Not requested yet".to_string(),
            PermissionState::Granted => "Granted".to_string(),
            PermissionState::Denied => "Denied by the user".to_string(),
        },
        available,
        required: true,
        fix_instructions: if available {
            None
        } else {
            Some(PERMISSION_GUIDANCE.join(" "))
        },
    }
}

fn check_camera_device(last_error: Option<&CameraError>) -> Capability {
    let unavailable = matches!(last_error, Some(CameraError::DeviceUnavailable { .. }));
    Capability {
        name: "Rear Camera".to_string(),
        description: "Environment-facing video input".to_string(),
        available: !unavailable,
        required: true,
        fix_instructions: if unavailable {
            Some("Close other apps using the camera, then retry".to_string())
        } else {
            None
        },
    }
}

impl Capability {
    /// Status column for [`capability_report`].
    pub fn status_label(&self) -> &'static str {
        match (self.available, self.required) {
            (true, _) => "ok",
            (false, true) => "missing (required)",
            (false, false) => "missing (optional)",
        }
    }
}

/// Plain-text table of `capabilities`, one row each, with the fix on an
/// indented line below any missing entry.
pub fn capability_report(capabilities: &[Capability]) -> String {
    let name_width = capabilities.iter().map(|c| c.name.len()).max().unwrap_or(0);
    let ready = capabilities.iter().filter(|c| c.available).count();

    let mut lines = vec![format!(
        "Capabilities ({ready}/{} available)",
        capabilities.len()
    )];
    for cap in capabilities {
        lines.push(format!(
            "  {:<name_width$}  {:<18}  {}",
            cap.name,
            cap.status_label(),
            cap.description
        ));
        if let Some(fix) = &cap.fix_instructions {
            lines.push(format!("  {:<name_width$}  fix: {fix}", ""));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guidance_is_numbered() {
        let text = permission_guidance();
        assert!(text.starts_with(PERMISSION_SUMMARY));
        assert!(text.contains("1. Open the browser settings"));
        assert!(text.contains("4. Reload the page."));
    }

    #[test]
    fn desktop_client_is_missing_required_capability() {
        let caps = check_capabilities(DevicePlatform::Desktop, PermissionState::Unrequested, None);
        let mobile = &caps[0];
        assert!(!mobile.available);
        assert!(mobile.required);
        assert!(mobile.fix_instructions.is_some());
    }

    #[test]
    fn denial_carries_guidance() {
        let caps = check_capabilities(DevicePlatform::Ios, PermissionState::Denied, None);
        let permission = &caps[1];
        assert!(!permission.available);
        assert!(permission
            .fix_instructions
            .as_deref()
            .unwrap()
            .contains("Allow camera access"));
    }

    #[test]
    fn busy_camera_is_reported() {
        let err = CameraError::device_unavailable("busy");
        let caps = check_capabilities(DevicePlatform::Android, PermissionState::Granted, Some(&err));
        assert!(caps[0].available);
        assert!(caps[1].available);
        assert!(!caps[2].available);
    }

    #[test]
    fn report_lists_each_capability_with_fix() {
        let caps = check_capabilities(DevicePlatform::Desktop, PermissionState::Denied, None);
        let report = capability_report(&caps);
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines[0], "Capabilities (1/3 available)");
        assert!(lines[1].contains("Mobile Device") && lines[1].contains("missing (required)"));
        assert!(lines[2].trim_start().starts_with("fix: Open this page on a phone"));
        assert!(report.contains("Rear Camera"));
        assert!(lines.last().unwrap().contains("ok"));
    }

    #[test]
    fn optional_capability_is_labelled() {
        let cap = Capability {
            name: "Flash".to_string(),
            description: "Torch".to_string(),
            available: false,
            required: false,
            fix_instructions: None,
        };
        assert_eq!(cap.status_label(), "missing (optional)");
        assert_eq!(capability_report(&[cap]).lines().count(), 2);
    }
}
