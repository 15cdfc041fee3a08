//! OverlayCam Overlay Model
//!
//! Pure state and math for the overlay layer:
//! - **Transform:** the clamped zoom factor the user adjusts
//! - **Geometry:** centered placement rectangles derived from the transform
//! - **Preview:** mapping of capture placements onto a cover-fit viewport
//!
//! Nothing here touches pixels; the compositor and the live preview both
//! read their placement from [`OverlayTransform::resolve_geometry`].

pub mod geometry;
pub mod preview;
pub mod transform;

pub use geometry::*;
pub use preview::*;
pub use transform::*;
