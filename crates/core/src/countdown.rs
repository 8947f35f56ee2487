use std::fmt;

use thiserror::Error;

/// Countdown duration used when no quiz duration is configured.
pub const DEFAULT_QUIZ_SECONDS: u32 = 300;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CountdownError {
    #[error("countdown duration must be at least one second")]
    ZeroDuration,
}

/// Result of advancing a countdown by one second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Still running with this many seconds left.
    Running { remaining: u32 },
    /// The countdown just reached zero. Reported exactly once.
    Expired,
    /// The countdown already expired; nothing happens anymore.
    Halted,
}

/// Per-second countdown state.
///
/// Holds no tick source of its own; the owner advances it once per elapsed
/// second via [`Countdown::tick`]. Once the countdown reports [`Tick::Expired`]
/// it is halted for good — a fresh quiz needs a fresh countdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
    fired: bool,
}

impl Countdown {
    /// Create a countdown with the given initial duration.
    ///
    /// # Errors
    ///
    /// Returns `CountdownError::ZeroDuration` if `initial_secs` is zero.
    pub fn new(initial_secs: u32) -> Result<Self, CountdownError> {
        if initial_secs == 0 {
            return Err(CountdownError::ZeroDuration);
        }
        Ok(Self {
            remaining: initial_secs,
            fired: false,
        })
    }

    /// Seconds left before expiry.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// True once the countdown has reported [`Tick::Expired`].
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.fired
    }

    /// Advance the countdown by one second.
    pub fn tick(&mut self) -> Tick {
        if self.fired {
            return Tick::Halted;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.fired = true;
            Tick::Expired
        } else {
            Tick::Running {
                remaining: self.remaining,
            }
        }
    }
}

/// Zero-padded `minutes:seconds` rendering of a second count.
#[must_use]
pub fn format_remaining(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_remaining(self.remaining))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
