use crate::models::config::CountdownPlan;
use crate::models::error::BoothError;
use crate::models::state::CountdownState;

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// No countdown is running.
    Idle,
    /// Counter decremented; `remaining` seconds left before shot `shot`.
    Counting { remaining: u32, shot: u32 },
    /// Counter hit zero: capture shot `shot`, then call `finish_shot`.
    Fire { shot: u32 },
    /// A capture is in flight.
    Waiting,
}

/// Result of completing a shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotOutcome {
    /// Counting down again for the next shot.
    Next { shot: u32 },
    /// All planned shots taken; back to idle.
    Finished,
}

/// Countdown scheduler driven by a fixed one-second tick.
///
/// The shots still to take are an explicit counter rather than nested
/// timer callbacks.
#[derive(Debug, Clone, Default)]
pub struct Countdown {
    state: CountdownState,
    plan: Option<CountdownPlan>,
    shots_taken: u32,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CountdownState {
        self.state
    }

    /// Plan of the running sequence, `None` when idle.
    pub fn plan(&self) -> Option<CountdownPlan> {
        self.plan
    }

    pub fn shots_taken(&self) -> u32 {
        self.shots_taken
    }

    /// Begin a sequence. Returns `Ok(false)` without touching anything when
    /// one is already running.
    pub fn start(&mut self, plan: CountdownPlan) -> Result<bool, BoothError> {
        plan.validate().map_err(BoothError::ConfigurationFailed)?;
        if !self.state.is_idle() {
            return Ok(false);
        }

        self.plan = Some(plan);
        self.shots_taken = 0;
        self.state = CountdownState::CountingDown {
            remaining: plan.interval_secs,
            shot: 1,
        };
        Ok(true)
    }

    pub fn tick(&mut self) -> Tick {
        match self.state {
            CountdownState::Idle => Tick::Idle,
            CountdownState::Capturing { .. } => Tick::Waiting,
            CountdownState::CountingDown { remaining, shot } => {
                let remaining = remaining.saturating_sub(1);
                if remaining == 0 {
                    self.state = CountdownState::Capturing { shot };
                    Tick::Fire { shot }
                } else {
                    self.state = CountdownState::CountingDown { remaining, shot };
                    Tick::Counting { remaining, shot }
                }
            }
        }
    }

    /// Record that the fired shot was captured.
    pub fn finish_shot(&mut self) -> ShotOutcome {
        let (CountdownState::Capturing { shot }, Some(plan)) = (self.state, self.plan) else {
            return ShotOutcome::Finished;
        };

        self.shots_taken += 1;
        if self.shots_taken < plan.total_shots {
            let next = shot + 1;
            self.state = CountdownState::CountingDown {
                remaining: plan.interval_secs,
                shot: next,
            };
            ShotOutcome::Next { shot: next }
        } else {
            self.reset();
            ShotOutcome::Finished
        }
    }

    /// Stop the sequence. Returns whether one was running.
    pub fn cancel(&mut self) -> bool {
        let was_running = !self.state.is_idle();
        self.reset();
        was_running
    }

    fn reset(&mut self) {
        self.state = CountdownState::Idle;
        self.plan = None;
    }
}
