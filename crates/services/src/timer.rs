use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use quiz_core::countdown::{Countdown, CountdownError, Tick, format_remaining};

/// Handle to a running quiz countdown.
///
/// Owns the periodic tick source: a tokio task drives a [`Countdown`] once
/// per second, publishes the remaining time through a watch channel, and
/// delivers expiry exactly once. Dropping the handle aborts the task, so the
/// tick source is released on every exit path — a tick can never fire into a
/// torn-down session. Re-arming means starting a fresh handle; a handle is
/// never reused across sessions.
#[derive(Debug)]
pub struct CountdownHandle {
    remaining: watch::Receiver<u32>,
    expired: mpsc::Receiver<()>,
    task: JoinHandle<()>,
}

impl CountdownHandle {
    /// Spawn a countdown ticking once per second from `initial_secs`.
    ///
    /// # Errors
    ///
    /// Returns `CountdownError::ZeroDuration` if `initial_secs` is zero.
    pub fn start(initial_secs: u32) -> Result<Self, CountdownError> {
        let countdown = Countdown::new(initial_secs)?;
        let (remaining_tx, remaining_rx) = watch::channel(initial_secs);
        let (expired_tx, expired_rx) = mpsc::channel(1);
        let task = tokio::spawn(run_countdown(countdown, remaining_tx, expired_tx));

        Ok(Self {
            remaining: remaining_rx,
            expired: expired_rx,
            task,
        })
    }

    /// Seconds left before expiry.
    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        *self.remaining.borrow()
    }

    /// Zero-padded `minutes:seconds` rendering of the remaining time.
    #[must_use]
    pub fn display(&self) -> String {
        format_remaining(self.remaining_secs())
    }

    /// A watch receiver over the remaining seconds, for display loops.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u32> {
        self.remaining.clone()
    }

    /// Wait for the countdown to reach zero.
    ///
    /// Resolves `true` when the countdown expired. Expiry is delivered at
    /// most once per handle. Cancel-safe: dropping the future leaves a
    /// pending expiry in the channel for the next call.
    pub async fn expired(&mut self) -> bool {
        self.expired.recv().await.is_some()
    }

    /// Stop ticking and release the tick source.
    pub fn stop(self) {
        // Drop aborts the task.
    }
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_countdown(
    mut countdown: Countdown,
    remaining: watch::Sender<u32>,
    expired: mpsc::Sender<()>,
) {
    let mut ticks = time::interval(Duration::from_secs(1));
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; skip it so the countdown starts
    // a full second after arming.
    ticks.tick().await;

    loop {
        ticks.tick().await;
        match countdown.tick() {
            Tick::Running { remaining: secs } => {
                if remaining.send(secs).is_err() {
                    break;
                }
            }
            Tick::Expired => {
                let _ = remaining.send(0);
                let _ = expired.send(()).await;
                break;
            }
            Tick::Halted => break,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
