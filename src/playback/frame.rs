//! Frame callbacks as cancelable handles.
//!
//! The host's per-frame scheduler hands out a [`FrameHandle`] for every
//! requested frame. A cancelled handle is removed from the queue and will
//! never fire.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;

    /// Returns false when the handle had already fired or been cancelled.
    fn cancel_frame(&mut self, handle: FrameHandle) -> bool;
}

/// Pending frame requests, drained by the host once per frame.
#[derive(Debug, Default)]
pub struct FrameQueue {
    next_id: u64,
    pending: Vec<FrameHandle>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles due this frame. Requests made while processing them land in
    /// the next frame.
    pub fn take_due(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.pending)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|h| *h != handle);
        self.pending.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_are_unique() {
        let mut queue = FrameQueue::new();
        let a = queue.request_frame();
        let b = queue.request_frame();
        assert_ne!(a, b);
        assert_eq!(queue.pending(), 2);
    }

    #[test]
    fn test_cancelled_handle_never_fires() {
        let mut queue = FrameQueue::new();
        let a = queue.request_frame();
        let b = queue.request_frame();
        assert!(queue.cancel_frame(a));
        assert!(!queue.cancel_frame(a));
        assert_eq!(queue.take_due(), vec![b]);
        assert!(!queue.has_pending());
    }
}
