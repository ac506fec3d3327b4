//! Deferred work drained once per paint frame.
//!
//! Embedding calls arrive while the renderer is mid-pass, before the
//! placeholder nodes they describe are committed to the document. Anything
//! that touches real nodes therefore waits here until the host calls
//! [`Bridge::frame`](crate::Bridge::frame) from its paint callback. Tests
//! drive the boundary directly with a stamp of their choosing.

use crate::descriptor::Placeholder;

/// Identifies one paint frame.
///
/// Supplied by the host, monotonically non-decreasing. Equal stamps mean
/// the same frame; the sweeper uses that to run at most once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameStamp(u64);

impl FrameStamp {
    /// Wraps a raw frame counter or timestamp.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw stamp value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Work scheduled during a render pass, waiting for the frame boundary.
#[derive(Debug, Default)]
pub struct FrameQueue {
    creations: Vec<Placeholder>,
    sweep_requests: usize,
}

impl FrameQueue {
    /// Creates an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            creations: Vec::new(),
            sweep_requests: 0,
        }
    }

    /// Queues a deferred creation for the descriptor's identifier.
    ///
    /// Re-scheduling an identifier before the frame fires replaces the
    /// queued descriptor in place, so the creation performed at the
    /// boundary reflects the latest render pass.
    pub fn schedule_creation(&mut self, placeholder: Placeholder) {
        if let Some(slot) = self
            .creations
            .iter_mut()
            .find(|queued| queued.id() == placeholder.id())
        {
            *slot = placeholder;
        } else {
            self.creations.push(placeholder);
        }
    }

    /// Records one request for a cleanup sweep at the next boundary.
    pub fn request_sweep(&mut self) {
        self.sweep_requests += 1;
    }

    /// Drains the queued creations in scheduling order.
    pub fn take_creations(&mut self) -> Vec<Placeholder> {
        std::mem::take(&mut self.creations)
    }

    /// Drains the pending sweep-request count.
    pub fn take_sweep_requests(&mut self) -> usize {
        std::mem::take(&mut self.sweep_requests)
    }

    /// Whether nothing is waiting for the next frame.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.creations.is_empty() && self.sweep_requests == 0
    }
}
