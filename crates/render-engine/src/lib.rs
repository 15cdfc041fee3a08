//! OverlayCam Render Engine
//!
//! Turns a live camera frame and the overlay image into a finished photo,
//! then hands it to review and export.
//!
//! # Pipeline Architecture
//!
//! ```text
//! VideoFrame (native size) ──┐
//!                            ├── Raster target (frame at 0,0)
//! OverlayTransform ──────────┤          │
//!   resolve_geometry()       │          ├── Overlay resize + alpha blend
//! OverlayAsset ──────────────┘          │
//!                                       ▼
//!                                 Encode (PNG/JPEG)
//!                                       │
//!                        ┌──────────────┴──────────────┐
//!                        ▼                             ▼
//!                CaptureResultViewer              ExportSink
//! ```

pub mod compositor;
pub mod export;
pub mod overlay_asset;
pub mod viewer;

pub use compositor::{capture, CompositeResult, Compositor};
pub use export::*;
pub use overlay_asset::{AssetState, OverlayAsset};
pub use viewer::CaptureResultViewer;
