//! Cancellable repeating task that drives the countdown.

use std::ops::ControlFlow;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};

/// Interval between two countdown ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Handle to a spawned repeating task.
///
/// Dropping the handle detaches the task; use [`TickHandle::cancel`] to end it.
#[derive(Debug)]
pub struct TickHandle {
    handle: JoinHandle<()>,
}

impl TickHandle {
    /// Spawns `on_tick` on the current Tokio runtime, first firing one full
    /// `period` from now and then every `period` after that.
    ///
    /// The task ends on its own once `on_tick` returns `ControlFlow::Break`.
    pub fn spawn<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        let first = Instant::now() + period;
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(first, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                if on_tick().is_break() {
                    break;
                }
            }
        });

        Self { handle }
    }

    /// Cancels the task. It is aborted at its next suspension point.
    pub fn cancel(self) {
        self.handle.abort();
    }

    #[cfg(test)]
    fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
