//! Composite a frame with the overlay and save the photo.

use std::path::PathBuf;
use std::sync::Arc;

use overlaycam_camera_view::{CameraView, ViewStatus};
use overlaycam_capture_engine::{CameraBackend, SyntheticBackend};
use overlaycam_common::config::AppConfig;
use overlaycam_render_engine::FileExportSink;

/// Simulated client used when no user agent is given.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Mobile Safari/537.36";

pub async fn run(
    config: &AppConfig,
    frame: Option<PathBuf>,
    zoom_in: u32,
    zoom_out: u32,
    user_agent: &str,
) -> anyhow::Result<()> {
    let backend = match &frame {
        Some(path) => SyntheticBackend::from_image_file(path)
            .map_err(|e| anyhow::anyhow!("Failed to load frame: {e}"))?,
        None => SyntheticBackend::new(config.camera.synthetic_width, config.camera.synthetic_height),
    };
    let backend = Arc::new(backend);
    println!("Camera:  {}", backend.name());
    println!("Overlay: {}", config.overlay.asset_path.display());

    let mut view = CameraView::new(config, Some(user_agent), backend);
    if !view.overlay().is_loaded() {
        anyhow::bail!(
            "Overlay {} could not be loaded",
            config.overlay.asset_path.display()
        );
    }

    if let Err(e) = view.activate().await {
        anyhow::bail!("{}", status_text(&view.status(), &e.to_string()));
    }
    if view.status() != ViewStatus::Live {
        anyhow::bail!("{}", view.status().headline());
    }

    for _ in 0..zoom_in {
        view.zoom_in();
    }
    for _ in 0..zoom_out {
        view.zoom_out();
    }
    println!("Scale:   {:.2}", view.scale());

    let photo = view
        .take_photo()
        .map_err(|e| anyhow::anyhow!("Capture failed: {e}"))?;
    println!(
        "Photo:   {}x{} {}",
        photo.width(),
        photo.height(),
        photo.format().mime_type()
    );

    let mut sink = FileExportSink::from_config(&config.export);
    let receipt = view
        .export_photo(&mut sink)
        .map_err(|e| anyhow::anyhow!("Export failed: {e}"))?;
    match receipt.and_then(|r| r.path) {
        Some(path) => println!("Saved:   {}", path.display()),
        None => println!("Nothing to save"),
    }

    view.teardown();
    Ok(())
}

fn status_text(status: &ViewStatus, error: &str) -> String {
    match status {
        ViewStatus::PermissionDenied { guidance } => guidance.clone(),
        ViewStatus::Unavailable { message } => message.clone(),
        _ => error.to_string(),
    }
}
