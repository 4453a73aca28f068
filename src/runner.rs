//! Async session driver.
//!
//! Owns the one live timer a session is allowed: a 1-second interval that
//! advances the sequencer's state machine. The interval is local to the
//! future, so cancelling (dropping/aborting) the runner cancels any pending
//! countdown or pause tick with it; a stale callback can never reach a
//! sequencer whose session was abandoned.

use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};
use tracing::instrument;

use crate::capture::{CaptureSequencer, Phase, Tick};
use crate::error::Result;

/// Progress events surfaced while a session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Countdown shows `n` seconds remaining.
    CountdownTick(u8),
    /// Photo `index` (0-based) of `of` was captured.
    PhotoCaptured { index: usize, of: u8 },
    /// Inter-photo pause before the next countdown.
    Paused,
    /// The session holds all its photos.
    Completed,
    /// The session was abandoned after a failed snapshot.
    Aborted,
}

/// Run one capture session to completion.
///
/// Starts the session (honoring the sequencer's guards), then ticks once
/// per second until the photo set is complete. The exclusive borrow also
/// guarantees no second countdown can run concurrently.
#[instrument(skip_all)]
pub async fn run_session(
    sequencer: &mut CaptureSequencer,
    mut on_event: impl FnMut(SessionEvent),
) -> Result<()> {
    sequencer.start_session()?;
    on_event(SessionEvent::CountdownTick(sequencer.countdown()));

    let mut interval = time::interval(Duration::from_secs(1));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first interval tick resolves immediately; consume it so session
    // ticks land a full second apart.
    interval.tick().await;

    loop {
        interval.tick().await;
        match sequencer.tick() {
            Tick::Counting(n) => on_event(SessionEvent::CountdownTick(n)),
            Tick::Captured { index } => {
                on_event(SessionEvent::PhotoCaptured {
                    index,
                    of: sequencer.target_count(),
                });
                if sequencer.phase() == Phase::SessionComplete {
                    on_event(SessionEvent::Completed);
                    return Ok(());
                }
                on_event(SessionEvent::Paused);
            }
            Tick::Rearmed => on_event(SessionEvent::CountdownTick(sequencer.countdown())),
            Tick::Complete => {
                on_event(SessionEvent::Completed);
                return Ok(());
            }
            Tick::Aborted => {
                on_event(SessionEvent::Aborted);
                return Ok(());
            }
            // The session was cancelled out from under the timer.
            Tick::Idle => return Ok(()),
        }
    }
}
