//! Owned state of one capture view.

use overlaycam_capture_engine::permissions::{check_capabilities, Capability};
use overlaycam_capture_engine::{CameraBackend, StreamAcquirer};
use overlaycam_common::config::AppConfig;
use overlaycam_common::error::{CameraError, OverlayCamResult};
use overlaycam_overlay_model::{OverlayTransform, Placement, PreviewLayout, ScaleBounds};
use overlaycam_platform_core::{classify_user_agent, DevicePlatform};
use overlaycam_render_engine::{
    CaptureResultViewer, CompositeResult, Compositor, ExportReceipt, ExportSink, OverlayAsset,
};

use crate::status::ViewStatus;

/// One capture page: device gate, camera, overlay zoom and photo review.
///
/// Everything the page needs lives here; nothing is global. Dropping the view
/// releases the camera.
pub struct CameraView<B: CameraBackend> {
    platform: DevicePlatform,
    auto_start: bool,
    acquirer: StreamAcquirer<B>,
    transform: OverlayTransform,
    step: f64,
    overlay: OverlayAsset,
    compositor: Compositor,
    viewer: CaptureResultViewer,
}

impl<B: CameraBackend> CameraView<B> {
    /// Build a view for a client. The device is classified once, here.
    ///
    /// The overlay is loaded from `config.overlay.asset_path`; a missing file
    /// leaves capture disabled rather than failing construction.
    pub fn new(config: &AppConfig, user_agent: Option<&str>, backend: B) -> Self {
        let overlay = OverlayAsset::load(&config.overlay.asset_path);
        Self::with_overlay(config, user_agent, backend, overlay)
    }

    /// Build a view around an already loaded overlay.
    ///
    /// `config` is expected to have passed [`AppConfig::validate`]. Zoom
    /// values that would not pass are normalized by [`ScaleBounds::new`] and
    /// [`OverlayTransform::new`] instead of failing here.
    pub fn with_overlay(
        config: &AppConfig,
        user_agent: Option<&str>,
        backend: B,
        overlay: OverlayAsset,
    ) -> Self {
        let platform = classify_user_agent(user_agent);
        let bounds = ScaleBounds::new(config.overlay.min_scale, config.overlay.max_scale);
        let transform = OverlayTransform::new(
            config.overlay.initial_scale,
            bounds,
            config.overlay.base_width_fraction,
        );
        tracing::debug!(?platform, eligible = platform.is_mobile(), "Capture view created");

        Self {
            platform,
            auto_start: config.camera.auto_start,
            acquirer: StreamAcquirer::new(backend),
            transform,
            step: config.overlay.step,
            overlay,
            compositor: Compositor::from_config(&config.export),
            viewer: CaptureResultViewer::new(),
        }
    }

    pub fn platform(&self) -> DevicePlatform {
        self.platform
    }

    /// Whether the client passed the mobile check.
    pub fn is_eligible(&self) -> bool {
        self.platform.is_mobile()
    }

    pub fn acquirer(&self) -> &StreamAcquirer<B> {
        &self.acquirer
    }

    pub fn transform(&self) -> &OverlayTransform {
        &self.transform
    }

    pub fn scale(&self) -> f64 {
        self.transform.scale()
    }

    pub fn overlay(&self) -> &OverlayAsset {
        &self.overlay
    }

    pub fn viewer(&self) -> &CaptureResultViewer {
        &self.viewer
    }

    /// Page mount: starts the camera when the device is eligible and
    /// `camera.auto_start` is on.
    pub async fn mount(&mut self) -> Result<(), CameraError> {
        if !self.auto_start {
            tracing::debug!("Auto start disabled; waiting for activate()");
            return Ok(());
        }
        self.activate().await
    }

    /// Start the camera. Does nothing for ineligible devices.
    pub async fn activate(&mut self) -> Result<(), CameraError> {
        if !self.is_eligible() {
            tracing::debug!(platform = ?self.platform, "Not activating camera on ineligible device");
            return Ok(());
        }
        self.acquirer.start().await.map(|_| ())
    }

    /// Retry button on the error screen.
    pub async fn retry(&mut self) -> Result<(), CameraError> {
        if !self.is_eligible() {
            return Ok(());
        }
        self.acquirer.retry().await.map(|_| ())
    }

    /// Zoom the overlay in by one step and return the new scale.
    pub fn zoom_in(&mut self) -> f64 {
        self.transform = self.transform.increment(self.step);
        tracing::debug!(scale = self.transform.scale(), "Overlay zoomed in");
        self.transform.scale()
    }

    /// Zoom the overlay out by one step and return the new scale.
    pub fn zoom_out(&mut self) -> f64 {
        self.transform = self.transform.decrement(self.step);
        tracing::debug!(scale = self.transform.scale(), "Overlay zoomed out");
        self.transform.scale()
    }

    /// Cover layout of the live frame in a viewport of the given size.
    pub fn preview_layout(&self, viewport_width: f64, viewport_height: f64) -> Option<PreviewLayout> {
        let frame = self.acquirer.current_frame()?;
        let (width, height) = frame.native_size();
        PreviewLayout::cover(width as f64, height as f64, viewport_width, viewport_height)
    }

    /// On-screen overlay rectangle for the given viewport.
    pub fn overlay_preview_rect(&self, viewport_width: f64, viewport_height: f64) -> Option<Placement> {
        let aspect = self.overlay.aspect_ratio()?;
        let layout = self.preview_layout(viewport_width, viewport_height)?;
        Some(layout.overlay_rect(&self.transform, aspect))
    }

    /// Capture button: composite the current frame and show the result.
    ///
    /// Fails with `Other` when no frame is available or the overlay has not
    /// loaded; nothing is shown in that case.
    pub fn take_photo(&mut self) -> Result<&CompositeResult, CameraError> {
        let frame = self
            .acquirer
            .current_frame()
            .ok_or_else(|| CameraError::other("Camera is not active"))?;
        let result = self.compositor.capture(&frame, &self.overlay, &self.transform)?;
        tracing::info!(width = result.width(), height = result.height(), "Photo taken");
        Ok(self.viewer.show(result))
    }

    /// Close the photo review.
    pub fn dismiss_photo(&mut self) {
        self.viewer.dismiss();
    }

    /// Hand the photo under review to a sink. `Ok(None)` when nothing is shown.
    pub fn export_photo(&self, sink: &mut dyn ExportSink) -> OverlayCamResult<Option<ExportReceipt>> {
        match self.viewer.current() {
            Some(result) => sink.deliver(result).map(Some),
            None => Ok(None),
        }
    }

    /// Current screen.
    pub fn status(&self) -> ViewStatus {
        ViewStatus::resolve(
            self.is_eligible(),
            self.acquirer.state(),
            self.acquirer.last_error(),
        )
    }

    /// Capability report for diagnostics.
    pub fn capabilities(&self) -> Vec<Capability> {
        check_capabilities(
            self.platform,
            self.acquirer.permission_state(),
            self.acquirer.last_error(),
        )
    }

    /// Page unmount: release the camera and drop any shown photo.
    pub fn teardown(&mut self) {
        self.acquirer.stop();
        self.viewer.dismiss();
    }
}

impl<B: CameraBackend> Drop for CameraView<B> {
    fn drop(&mut self) {
        self.acquirer.stop();
    }
}

impl<B: CameraBackend> std::fmt::Debug for CameraView<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraView")
            .field("platform", &self.platform)
            .field("acquirer", &self.acquirer)
            .field("transform", &self.transform)
            .field("photo_shown", &self.viewer.is_visible())
            .finish()
    }
}
