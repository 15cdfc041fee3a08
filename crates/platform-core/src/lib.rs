//! OverlayCam platform core contracts.
//!
//! This crate contains the host-facing data structures used by the capture,
//! render, and view crates without coupling them to a concrete camera API:
//! - [`device`]: user-agent based eligibility check
//! - [`frame`]: decoded video frames at native resolution
//! - [`stream`]: stream constraints, platform rejections, and track handles

pub mod device;
pub mod frame;
pub mod stream;

pub use device::*;
pub use frame::*;
pub use stream::*;
