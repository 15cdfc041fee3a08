//! Device classification from the client's user-agent string.

use serde::{Deserialize, Serialize};

/// Platform family inferred from a user-agent string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DevicePlatform {
    Android,
    Ios,
    WindowsMobile,
    OperaMini,
    Desktop,
    #[default]
    Unknown,
}

impl DevicePlatform {
    /// Whether this platform may use the camera capture flow.
    pub fn is_mobile(self) -> bool {
        matches!(
            self,
            DevicePlatform::Android
                | DevicePlatform::Ios
                | DevicePlatform::WindowsMobile
                | DevicePlatform::OperaMini
        )
    }
}

// Checked in order: Windows Phone and Opera Mini agents also carry "Android".
const SIGNATURES: &[(&str, DevicePlatform)] = &[
    ("opera mini", DevicePlatform::OperaMini),
    ("iemobile", DevicePlatform::WindowsMobile),
    ("wpdesktop", DevicePlatform::WindowsMobile),
    ("iphone", DevicePlatform::Ios),
    ("ipad", DevicePlatform::Ios),
    ("ipod", DevicePlatform::Ios),
    ("android", DevicePlatform::Android),
];

/// Classify a user-agent string.
///
/// An absent or blank identity (no browser context) yields
/// [`DevicePlatform::Unknown`] instead of an error.
pub fn classify_user_agent(user_agent: Option<&str>) -> DevicePlatform {
    let Some(ua) = user_agent.map(str::trim).filter(|ua| !ua.is_empty()) else {
        return DevicePlatform::Unknown;
    };
    let ua = ua.to_ascii_lowercase();

    SIGNATURES
        .iter()
        .find(|(needle, _)| ua.contains(needle))
        .map(|(_, platform)| *platform)
        .unwrap_or(DevicePlatform::Desktop)
}

/// Whether the client identified by `user_agent` is an eligible capture device.
pub fn is_eligible_device(user_agent: &str) -> bool {
    classify_user_agent(Some(user_agent)).is_mobile()
}
