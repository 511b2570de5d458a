use super::config::SESSION_FRAMES;
use super::error::BoothError;

/// Countdown state machine.
///
/// State transitions:
/// ```text
/// idle → counting_down(n) → … → counting_down(1) → capturing
///            ↑                                         │
///            └──────────── more shots planned ─────────┤
///                                                      ↓
///                                                     idle
/// ```
/// `shot` is the 1-based number of the shot being prepared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountdownState {
    #[default]
    Idle,
    CountingDown { remaining: u32, shot: u32 },
    Capturing { shot: u32 },
}

impl CountdownState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_counting_down(&self) -> bool {
        matches!(self, Self::CountingDown { .. })
    }

    /// Seconds left before the next capture, if counting down.
    pub fn remaining(&self) -> Option<u32> {
        match self {
            Self::CountingDown { remaining, .. } => Some(*remaining),
            _ => None,
        }
    }

    pub fn shot(&self) -> Option<u32> {
        match self {
            Self::CountingDown { shot, .. } | Self::Capturing { shot } => Some(*shot),
            Self::Idle => None,
        }
    }
}

/// Point-in-time view of the booth for a UI layer.
///
/// Legal combinations: `is_capturing()` holds exactly when the countdown is
/// not idle, and `countdown.remaining()` is `Some` only while counting down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoothSnapshot {
    pub countdown: CountdownState,
    pub frames_captured: usize,
    pub camera_open: bool,
    pub live_view_mirrored: bool,
    pub last_error: Option<BoothError>,
}

impl BoothSnapshot {
    /// The capture control should be disabled while this is true.
    pub fn is_capturing(&self) -> bool {
        !self.countdown.is_idle()
    }

    /// Enough frames for a strip.
    pub fn is_complete(&self) -> bool {
        self.frames_captured == SESSION_FRAMES
    }

    /// 1-based slot the next capture fills, as shown in an `n/3` counter.
    pub fn next_slot(&self) -> usize {
        if self.is_complete() {
            SESSION_FRAMES
        } else {
            self.frames_captured + 1
        }
    }
}
