//! Single-slot holder of a camera's most recent frame.
//!
//! The capture loop is the only writer; the recording loop and every stream
//! session read. Each operation holds the mutex only long enough to move a
//! `Frame` in or clone one out, and never performs I/O while locked.

use crate::core::frame::Frame;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Anything that can hand out the latest frame, if there is one yet.
pub trait FrameSource: Send + Sync {
    fn latest(&self) -> Option<Frame>;
}

#[derive(Debug, Default)]
pub struct FrameBuffer {
    slot: Mutex<Option<Frame>>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the held frame. Older frames are dropped, never queued.
    pub fn publish(&self, frame: Frame) {
        let previous = {
            let mut slot = self.lock();
            slot.replace(frame)
        };
        // Release the old pixel block outside the critical section.
        drop(previous);
    }

    /// Copy of the held frame, or `None` before the first publish.
    pub fn read(&self) -> Option<Frame> {
        self.lock().clone()
    }

    pub fn has_frame(&self) -> bool {
        self.lock().is_some()
    }

    // A panicking holder cannot leave a torn frame behind: the slot is only
    // ever assigned whole values, so a poisoned lock is safe to reuse.
    fn lock(&self) -> MutexGuard<'_, Option<Frame>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FrameSource for FrameBuffer {
    fn latest(&self) -> Option<Frame> {
        self.read()
    }
}
