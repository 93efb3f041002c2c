//! Per-card countdown.
//!
//! The countdown does not run on its own. Whoever drives the UI calls
//! [`Countdown::tick`] with the elapsed time and the token it was handed on
//! [`Countdown::start`]. Starting again or cancelling invalidates older
//! tokens, so a late tick for a card that has been replaced is a no-op.

use serde::{Deserialize, Serialize};

/// Identifies one started countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerToken(u64);

/// Result of advancing the countdown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tick {
    Running { remaining: f64 },
    /// Time ran out on this tick. Reported once.
    Expired,
    /// The token no longer refers to a running countdown.
    Stale,
}

#[derive(Debug, Clone, Copy)]
struct Active {
    token: TimerToken,
    remaining: f64,
}

#[derive(Debug, Default)]
pub struct Countdown {
    generation: u64,
    active: Option<Active>,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh countdown, replacing any running one.
    pub fn start(&mut self, seconds: f64) -> TimerToken {
        self.generation += 1;
        let token = TimerToken(self.generation);
        self.active = Some(Active {
            token,
            remaining: seconds.max(0.0),
        });
        token
    }

    /// Stop the running countdown. Safe to call any number of times.
    pub fn cancel(&mut self) {
        self.active = None;
    }

    pub fn tick(&mut self, token: TimerToken, elapsed: f64) -> Tick {
        let Some(active) = self.active.as_mut().filter(|a| a.token == token) else {
            return Tick::Stale;
        };

        active.remaining -= elapsed.max(0.0);
        if active.remaining <= 0.0 {
            self.active = None;
            Tick::Expired
        } else {
            Tick::Running {
                remaining: active.remaining,
            }
        }
    }

    pub fn current(&self) -> Option<TimerToken> {
        self.active.map(|a| a.token)
    }

    pub fn remaining(&self) -> Option<f64> {
        self.active.map(|a| a.remaining)
    }
}
