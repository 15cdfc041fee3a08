//! Review surface for the last captured photo.

use crate::compositor::CompositeResult;

/// Holds at most one captured photo for review.
#[derive(Debug, Default)]
pub struct CaptureResultViewer {
    current: Option<CompositeResult>,
}

impl CaptureResultViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Display a result, replacing whatever was shown.
    pub fn show(&mut self, result: CompositeResult) -> &CompositeResult {
        if self.current.is_some() {
            tracing::debug!("Replacing displayed capture");
        }
        self.current.insert(result)
    }

    /// Clear the displayed result. Returns it so callers can still export it.
    pub fn dismiss(&mut self) -> Option<CompositeResult> {
        self.current.take()
    }

    pub fn current(&self) -> Option<&CompositeResult> {
        self.current.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.current.is_some()
    }
}
