//! OverlayCam Camera View
//!
//! The capture page as one owned value. A [`CameraView`] classifies the
//! client once, drives the camera through its permission flow, keeps the
//! overlay zoom, and holds the photo under review. The page renders from
//! [`CameraView::status`] and the preview helpers; every button maps to one
//! method.
//!
//! ```text
//!  user agent ──▶ eligibility ──▶ Unsupported
//!                      │
//!                      ▼
//!  mount()/activate() ──▶ StreamAcquirer ──▶ Starting / Live / PermissionDenied / Unavailable
//!                                 │
//!  zoom_in()/zoom_out() ──▶ OverlayTransform
//!                                 │
//!  take_photo() ──▶ Compositor ──▶ CaptureResultViewer ──▶ export_photo()
//! ```

pub mod status;
pub mod view;

pub use status::ViewStatus;
pub use view::CameraView;
