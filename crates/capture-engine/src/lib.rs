//! OverlayCam Capture Engine
//!
//! Acquires the live camera stream a capture view draws from and owns its
//! lifecycle. The platform camera API sits behind [`CameraBackend`]; the
//! [`StreamAcquirer`] drives it through the permission flow and guarantees
//! the camera is released on every exit path.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                StreamAcquirer                 │
//! │  Idle → Requesting → Active / Denied / Failed │
//! │        │                       │              │
//! │        ▼                       ▼              │
//! │  ┌──────────────┐      ┌───────────────┐      │
//! │  │ CameraBackend│ ───▶ │ StreamSession │      │
//! │  │ (platform)   │      │ (track guard) │      │
//! │  └──────────────┘      └───────────────┘      │
//! └──────────────────────────────────────────────┘
//! ```

pub mod acquirer;
pub mod backend;
pub mod error;
pub mod permissions;
pub mod session;

pub use acquirer::*;
pub use backend::{CameraBackend, ScriptedOutcome, SyntheticBackend, TrackProbe};
pub use error::classify_rejection;
pub use session::*;
