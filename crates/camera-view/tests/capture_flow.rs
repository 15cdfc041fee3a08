use std::sync::Arc;

use image::{GenericImageView, Rgba, RgbaImage};
use overlaycam_camera_view::{CameraView, ViewStatus};
use overlaycam_capture_engine::{PermissionState, ScriptedOutcome, SyntheticBackend};
use overlaycam_common::config::AppConfig;
use overlaycam_common::error::CameraErrorKind;
use overlaycam_overlay_model::PixelRect;
use overlaycam_platform_core::{PlatformRejection, VideoFrame};
use overlaycam_render_engine::{ExportSink, FileExportSink, OverlayAsset};

const ANDROID_UA: &str =
    "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Mobile Safari/537.36";

fn square_overlay() -> OverlayAsset {
    OverlayAsset::from_image(RgbaImage::from_pixel(10, 10, Rgba([255, 255, 0, 255])))
}

fn phone_view() -> (Arc<SyntheticBackend>, CameraView<Arc<SyntheticBackend>>) {
    let frame = VideoFrame::solid(1920, 1080, [0, 0, 0, 255]);
    let backend = Arc::new(SyntheticBackend::with_frame(frame));
    let view = CameraView::with_overlay(
        &AppConfig::default(),
        Some(ANDROID_UA),
        backend.clone(),
        square_overlay(),
    );
    (backend, view)
}

#[tokio::test]
async fn denied_then_granted_on_retry() {
    let (backend, mut view) = phone_view();
    backend.deny_next();

    let err = view.mount().await.unwrap_err();
    assert_eq!(err.kind(), CameraErrorKind::PermissionDenied);
    let status = view.status();
    assert!(matches!(status, ViewStatus::PermissionDenied { .. }));
    assert!(status.can_retry());
    assert_eq!(view.acquirer().permission_state(), PermissionState::Denied);
    assert!(view.take_photo().is_err());

    view.retry().await.unwrap();
    assert_eq!(view.status(), ViewStatus::Live);
    assert_eq!(view.acquirer().permission_state(), PermissionState::Granted);
}

#[tokio::test]
async fn busy_camera_shows_unavailable_screen() {
    let (backend, mut view) = phone_view();
    backend.push_outcome(ScriptedOutcome::Reject(PlatformRejection::not_readable(
        "Could not start video source",
    )));

    view.activate().await.unwrap_err();
    match view.status() {
        ViewStatus::Unavailable { message } => {
            assert!(message.contains("Could not start video source"))
        }
        other => panic!("unexpected status {other:?}"),
    }
    let caps = view.capabilities();
    assert!(caps.iter().any(|c| c.name == "Rear Camera" && !c.available));
}

#[tokio::test]
async fn full_hd_photo_places_overlay_at_reference_rect() {
    let (_backend, mut view) = phone_view();
    view.activate().await.unwrap();

    let photo = view.take_photo().unwrap();
    assert_eq!((photo.width(), photo.height()), (1920, 1080));
    assert_eq!(
        photo.placement().to_pixel_rect(),
        PixelRect {
            x: 288,
            y: -132,
            width: 1344,
            height: 1344
        }
    );

    let decoded = image::load_from_memory(photo.image_data()).unwrap();
    assert_eq!(decoded.get_pixel(287, 540).0, [0, 0, 0, 255]);
    assert_eq!(decoded.get_pixel(288, 540).0, [255, 255, 0, 255]);
    assert_eq!(decoded.get_pixel(1631, 540).0, [255, 255, 0, 255]);
    assert_eq!(decoded.get_pixel(1632, 540).0, [0, 0, 0, 255]);
}

#[tokio::test]
async fn restarting_keeps_one_track_and_photo_exports_to_disk() {
    let (backend, mut view) = phone_view();
    view.activate().await.unwrap();
    view.activate().await.unwrap();
    assert_eq!(backend.issued_tracks().len(), 2);
    assert_eq!(backend.live_track_count(), 1);

    view.take_photo().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let mut sink = FileExportSink::new(dir.path());
    let receipt = view.export_photo(&mut sink).unwrap().unwrap();
    assert_eq!(receipt.sink, sink.name());
    assert!(receipt.path.unwrap().exists());
}
