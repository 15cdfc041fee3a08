//! Classify a client and report camera capabilities.

use overlaycam_capture_engine::permissions::{
    capability_report, check_capabilities, MOBILE_ONLY_NOTICE,
};
use overlaycam_capture_engine::PermissionState;
use overlaycam_common::config::AppConfig;
use overlaycam_platform_core::classify_user_agent;

pub fn run(config: &AppConfig, user_agent: &str) -> anyhow::Result<()> {
    println!("OverlayCam Device Check");
    println!("{}", "=".repeat(50));

    let platform = classify_user_agent(Some(user_agent));
    println!("User agent: {user_agent}");
    println!("Platform:   {platform:?}");
    if platform.is_mobile() {
        println!("[OK] Eligible for camera capture");
    } else {
        println!("[WARN] {MOBILE_ONLY_NOTICE}");
    }

    println!();
    let capabilities = check_capabilities(platform, PermissionState::Unrequested, None);
    println!("{}", capability_report(&capabilities));

    println!();
    println!(
        "Overlay asset: {} (auto start: {})",
        config.overlay.asset_path.display(),
        config.camera.auto_start
    );

    let all_required_ok = capabilities
        .iter()
        .filter(|c| c.required)
        .all(|c| c.available);
    if all_required_ok {
        println!("All required capabilities are available.");
    } else {
        println!("Some required capabilities are missing. See above for fixes.");
    }

    Ok(())
}
