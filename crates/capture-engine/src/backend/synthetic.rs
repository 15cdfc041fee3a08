//! In-process camera backend.
//!
//! Serves a generated test pattern (or a still image) as a live stream.
//! Outcomes can be scripted per request so permission denials and busy
//! devices can be exercised without real hardware.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_circle_mut;
use overlaycam_common::error::{OverlayCamError, OverlayCamResult};
use overlaycam_platform_core::{PlatformRejection, StreamConstraints, StreamHandle, VideoFrame};

use crate::backend::CameraBackend;

/// What the next stream request should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedOutcome {
    /// Grant a stream that delivers frames.
    Grant,
    /// Grant a stream whose first frame has not been decoded yet.
    GrantWithoutFrames,
    /// Reject with the given platform error.
    Reject(PlatformRejection),
}

/// Observer for a track handed out by the backend.
#[derive(Debug, Clone)]
pub struct TrackProbe {
    id: u64,
    live: Arc<AtomicBool>,
}

impl TrackProbe {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }
}

pub struct SyntheticBackend {
    name: String,
    frame: Arc<VideoFrame>,
    latency: Option<Duration>,
    script: Mutex<VecDeque<ScriptedOutcome>>,
    tracks: Mutex<Vec<TrackProbe>>,
    next_track_id: AtomicU64,
}

impl SyntheticBackend {
    /// Backend delivering a `width x height` test pattern.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_frame(VideoFrame::new(create_tracking_pattern(width, height)))
    }

    /// Backend delivering the given frame on every stream.
    pub fn with_frame(frame: VideoFrame) -> Self {
        Self {
            name: "synthetic".to_string(),
            frame: Arc::new(frame),
            latency: None,
            script: Mutex::new(VecDeque::new()),
            tracks: Mutex::new(Vec::new()),
            next_track_id: AtomicU64::new(1),
        }
    }

    /// Backend delivering a still photo, e.g. to composite an existing picture.
    pub fn from_image_file(path: &Path) -> OverlayCamResult<Self> {
        if !path.exists() {
            return Err(OverlayCamError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let pixels = image::open(path)
            .map_err(|e| OverlayCamError::asset(format!("Failed to decode {path:?}: {e}")))?
            .to_rgba8();
        let mut backend = Self::with_frame(VideoFrame::new(pixels));
        backend.name = format!("still:{}", path.display());
        Ok(backend)
    }

    /// Delay every answer, like a permission prompt left open.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Queue the outcome of a future request. Unscripted requests are granted.
    pub fn push_outcome(&self, outcome: ScriptedOutcome) {
        lock(&self.script).push_back(outcome);
    }

    /// Shorthand for queueing a `NotAllowedError` rejection.
    pub fn deny_next(&self) {
        self.push_outcome(ScriptedOutcome::Reject(PlatformRejection::not_allowed(
            "Permission denied by user",
        )));
    }

    /// Every track handed out so far, oldest first.
    pub fn issued_tracks(&self) -> Vec<TrackProbe> {
        lock(&self.tracks).clone()
    }

    /// Tracks that have not been stopped.
    pub fn live_track_count(&self) -> usize {
        lock(&self.tracks).iter().filter(|t| t.is_live()).count()
    }
}

#[async_trait::async_trait]
impl CameraBackend for SyntheticBackend {
    async fn request_stream(
        &self,
        constraints: &StreamConstraints,
    ) -> Result<Box<dyn StreamHandle>, PlatformRejection> {
        match self.latency {
            Some(latency) => tokio::time::sleep(latency).await,
            None => tokio::task::yield_now().await,
        }

        let outcome = lock(&self.script)
            .pop_front()
            .unwrap_or(ScriptedOutcome::Grant);

        let delivering = match outcome {
            ScriptedOutcome::Reject(rejection) => return Err(rejection),
            ScriptedOutcome::Grant => true,
            ScriptedOutcome::GrantWithoutFrames => false,
        };

        let probe = TrackProbe {
            id: self.next_track_id.fetch_add(1, Ordering::SeqCst),
            live: Arc::new(AtomicBool::new(true)),
        };
        lock(&self.tracks).push(probe.clone());
        tracing::debug!(
            track = probe.id,
            facing = constraints.facing.as_str(),
            "Synthetic track opened"
        );

        Ok(Box::new(SyntheticStream {
            label: format!("{}#{}", self.name, probe.id),
            frame: Arc::clone(&self.frame),
            delivering,
            live: probe.live,
        }))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

struct SyntheticStream {
    label: String,
    frame: Arc<VideoFrame>,
    delivering: bool,
    live: Arc<AtomicBool>,
}

impl StreamHandle for SyntheticStream {
    fn stop_all_tracks(&mut self) {
        self.live.store(false, Ordering::SeqCst);
    }

    fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    fn current_frame(&self) -> Option<VideoFrame> {
        if !self.is_live() {
            return None;
        }
        if !self.delivering {
            return Some(VideoFrame::empty());
        }
        Some(VideoFrame::clone(&self.frame))
    }

    fn label(&self) -> &str {
        &self.label
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Test pattern with corner, edge, and center markers so placement errors
/// are visible in captured output.
pub fn create_tracking_pattern(width: u32, height: u32) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(width, height, Rgba([40, 40, 50, 255]));

    let (w, h) = (width as i32, height as i32);
    let marker_radius = 20;
    if w < 4 * marker_radius || h < 4 * marker_radius {
        return img;
    }

    // Corner markers (red)
    let inset = marker_radius + 10;
    for (x, y) in [(inset, inset), (w - inset, inset), (w - inset, h - inset), (inset, h - inset)] {
        draw_filled_circle_mut(&mut img, (x, y), marker_radius, Rgba([255, 50, 50, 255]));
    }

    // Center marker (green)
    draw_filled_circle_mut(&mut img, (w / 2, h / 2), 30, Rgba([50, 255, 50, 255]));

    // Edge markers (blue)
    for (x, y) in [(w / 2, inset), (w - inset, h / 2), (w / 2, h - inset), (inset, h / 2)] {
        draw_filled_circle_mut(&mut img, (x, y), 15, Rgba([50, 50, 255, 255]));
    }

    img
}
