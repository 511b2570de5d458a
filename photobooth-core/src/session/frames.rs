use crate::models::config::SESSION_FRAMES;
use crate::models::frame::CapturedFrame;

/// Ordered frames of one photobooth round, at most `SESSION_FRAMES` long.
///
/// Frames are only appended at the tail. Once full, a new capture evicts the
/// oldest frame so the session always holds the most recent shots.
#[derive(Debug, Clone, Default)]
pub struct FrameSession {
    frames: Vec<CapturedFrame>,
}

impl FrameSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a frame, returning the evicted oldest frame if the session was full.
    pub fn push(&mut self, frame: CapturedFrame) -> Option<CapturedFrame> {
        let evicted = if self.frames.len() == SESSION_FRAMES {
            Some(self.frames.remove(0))
        } else {
            None
        };
        self.frames.push(frame);
        evicted
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.frames.len() == SESSION_FRAMES
    }

    /// Frame in 1-based `slot`.
    pub fn slot(&self, slot: usize) -> Option<&CapturedFrame> {
        slot.checked_sub(1).and_then(|i| self.frames.get(i))
    }

    pub fn frames(&self) -> &[CapturedFrame] {
        &self.frames
    }
}
