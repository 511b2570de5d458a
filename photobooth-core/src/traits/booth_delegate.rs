use crate::models::error::BoothError;
use crate::models::state::CountdownState;

/// Event delegate for booth notifications.
///
/// Countdown events fire on the ticker thread in `TickMode::Thread`.
/// Implementations should marshal to the UI thread if needed.
pub trait BoothDelegate: Send + Sync {
    /// Called whenever the countdown state changes.
    fn on_state_changed(&self, state: &CountdownState);

    /// Called once per tick with the seconds left before the next capture.
    fn on_countdown(&self, remaining: u32);

    /// Called after a frame lands in the session. `slot` is 1-based.
    fn on_frame_captured(&self, slot: usize);

    /// Called when a timed capture fails; the sequence has been aborted.
    fn on_error(&self, error: &BoothError);
}
