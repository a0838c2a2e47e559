//! Timer engine for the countdown.
//!
//! This module provides the countdown state machine:
//! - State transitions (Idle → Running → Paused → Running → Idle)
//! - Setting field validation (parse, clamp to 0-99)
//! - A single cancellable one-second tick task
//! - Synchronous snapshot notifications after every mutation

use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::{debug, info, trace};

use crate::types::{progress_fraction, Phase, SettingDuration, TimerSnapshot};

use super::observer::{Observers, SubscriptionId};
use super::ticker::{TickHandle, TICK_PERIOD};

// ============================================================================
// EngineState
// ============================================================================

/// Mutable state behind the engine lock.
#[derive(Debug, Default)]
struct EngineState {
    phase: Phase,
    setting: SettingDuration,
    remaining_seconds: u32,
    total_seconds: u32,
    progress: f32,
    /// Live tick task, present exactly while `phase` is `Running`
    ticker: Option<TickHandle>,
    /// Bumped on every cancellation; a tick task only applies ticks while
    /// its own generation is current
    generation: u64,
    observers: Observers,
}

impl EngineState {
    fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot::new(
            self.phase,
            self.remaining_seconds,
            self.total_seconds,
            self.progress,
            &self.setting,
        )
    }

    fn notify(&self) {
        self.observers.notify(&self.snapshot());
    }

    /// Invalidates the current tick task and aborts it if one is live.
    fn cancel_ticker(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
            debug!(generation = self.generation, "tick task cancelled");
        }
    }

    /// Returns to Idle with the captured duration restored.
    fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.remaining_seconds = self.total_seconds;
        self.progress = 0.0;
        self.setting = SettingDuration::from_seconds(self.remaining_seconds);
    }

    /// Applies one tick for the task of `generation`.
    fn tick(&mut self, generation: u64) -> ControlFlow<()> {
        if generation != self.generation || !self.phase.is_running() {
            return ControlFlow::Break(());
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        self.progress = progress_fraction(self.remaining_seconds, self.total_seconds);
        trace!(remaining_seconds = self.remaining_seconds, "tick");
        self.notify();

        if self.remaining_seconds > 0 {
            return ControlFlow::Continue(());
        }

        // The task is finishing by itself; detach rather than abort it.
        self.ticker = None;
        self.generation = self.generation.wrapping_add(1);
        self.reset();
        info!(total_seconds = self.total_seconds, "countdown completed");
        self.notify();
        ControlFlow::Break(())
    }
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Countdown engine: owns the phase, the setting fields, the remaining time
/// and the tick task.
///
/// Cloning yields another handle to the same engine. Ticks run on the Tokio
/// runtime, so [`TimerEngine::start`] must be called from within one.
///
/// Listeners are called while the engine is locked and must not call back
/// into it.
#[derive(Debug, Clone, Default)]
pub struct TimerEngine {
    shared: Arc<Mutex<EngineState>>,
}

impl TimerEngine {
    /// Creates an idle engine with both setting fields cleared.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a listener called with a fresh snapshot after every change.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&TimerSnapshot) + Send + 'static,
    {
        self.lock().observers.subscribe(Box::new(listener))
    }

    /// Removes a listener. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.lock().observers.unsubscribe(id)
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> TimerSnapshot {
        self.lock().snapshot()
    }

    /// Returns the current phase.
    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    /// Updates the minutes setting field. Ignored while running.
    pub fn set_minutes(&self, text: &str) {
        self.edit_setting("minutes", |setting| setting.set_minutes_text(text));
    }

    /// Updates the seconds setting field. Ignored while running.
    pub fn set_seconds(&self, text: &str) {
        self.edit_setting("seconds", |setting| setting.set_seconds_text(text));
    }

    fn edit_setting<F>(&self, field: &str, edit: F)
    where
        F: FnOnce(&mut SettingDuration),
    {
        let mut state = self.lock();
        if state.phase.is_running() {
            debug!(field, "setting edit ignored while running");
            return;
        }

        edit(&mut state.setting);
        debug!(
            minutes = %state.setting.minutes_text(),
            seconds = %state.setting.seconds_text(),
            "setting updated"
        );
        state.notify();
    }

    /// Starts a countdown from the setting, or resumes a paused one.
    ///
    /// Does nothing while running or when both setting fields are cleared,
    /// and from Idle when the setting adds up to zero seconds.
    pub fn start(&self) {
        let mut state = self.lock();
        if state.setting.is_cleared() && !state.phase.is_running() {
            debug!(phase = %state.phase, "start ignored: setting is cleared");
            return;
        }
        match state.phase {
            Phase::Running => {
                debug!("start ignored: already running");
                return;
            }
            Phase::Paused => {
                info!(
                    remaining_seconds = state.remaining_seconds,
                    "countdown resumed"
                );
            }
            Phase::Idle => {
                let total = state.setting.total_seconds();
                if total == 0 {
                    debug!("start ignored: duration is zero");
                    return;
                }
                state.total_seconds = total;
                state.remaining_seconds = total;
                state.progress = 1.0;
                info!(total_seconds = total, "countdown started");
            }
        }

        state.cancel_ticker();
        state.phase = Phase::Running;
        state.ticker = Some(Self::spawn_ticker(
            Arc::downgrade(&self.shared),
            state.generation,
        ));
        state.notify();
    }

    /// Freezes a running countdown and copies the remaining time back into
    /// the setting fields. Does nothing unless running.
    pub fn pause(&self) {
        let mut state = self.lock();
        if !state.phase.is_running() {
            debug!(phase = %state.phase, "pause ignored: not running");
            return;
        }

        state.cancel_ticker();
        state.phase = Phase::Paused;
        state.setting = SettingDuration::from_seconds(state.remaining_seconds);
        info!(
            remaining_seconds = state.remaining_seconds,
            "countdown paused"
        );
        state.notify();
    }

    /// Cancels any countdown and resets to the captured duration (0 if none
    /// was ever started). Valid in every phase.
    pub fn stop(&self) {
        let mut state = self.lock();
        let from = state.phase;

        state.cancel_ticker();
        state.reset();
        info!(%from, remaining_seconds = state.remaining_seconds, "countdown stopped");
        state.notify();
    }

    fn spawn_ticker(shared: Weak<Mutex<EngineState>>, generation: u64) -> TickHandle {
        TickHandle::spawn(TICK_PERIOD, move || {
            let Some(shared) = shared.upgrade() else {
                return ControlFlow::Break(());
            };
            let mut state = shared.lock().unwrap_or_else(PoisonError::into_inner);
            state.tick(generation)
        })
    }

    /// Applies one tick to the live countdown as if a second had passed.
    #[cfg(test)]
    fn force_tick(&self) {
        let mut state = self.lock();
        let generation = state.generation;
        let _ = state.tick(generation);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn create_engine(minutes: &str, seconds: &str) -> TimerEngine {
        let engine = TimerEngine::new();
        engine.set_minutes(minutes);
        engine.set_seconds(seconds);
        engine
    }

    fn record(engine: &TimerEngine) -> Arc<Mutex<Vec<TimerSnapshot>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        engine.subscribe(move |snapshot| sink.lock().unwrap().push(snapshot.clone()));
        log
    }

    // ------------------------------------------------------------------------
    // Setting Tests
    // ------------------------------------------------------------------------

    mod setting_tests {
        use super::*;

        #[test]
        fn test_new_engine() {
            let engine = TimerEngine::new();
            let snapshot = engine.snapshot();

            assert_eq!(snapshot.phase, Phase::Idle);
            assert_eq!(snapshot.remaining_seconds, 0);
            assert_eq!(snapshot.total_seconds, 0);
            assert_eq!(snapshot.progress, 0.0);
            assert_eq!(snapshot.setting_minutes_text, "");
            assert_eq!(snapshot.setting_seconds_text, "");
        }

        #[test]
        fn test_set_minutes_clamps() {
            let engine = TimerEngine::new();
            let cases = [("5", "05"), ("150", "99"), ("-3", "00"), ("x", "00"), ("", "")];
            for (input, expected) in cases {
                engine.set_minutes(input);
                assert_eq!(
                    engine.snapshot().setting_minutes_text,
                    expected,
                    "input {:?}",
                    input
                );
            }
        }

        #[test]
        fn test_set_seconds_clamps() {
            let engine = TimerEngine::new();
            let cases = [("9", "09"), ("100", "99"), ("seven", "00"), (" ", "")];
            for (input, expected) in cases {
                engine.set_seconds(input);
                assert_eq!(
                    engine.snapshot().setting_seconds_text,
                    expected,
                    "input {:?}",
                    input
                );
            }
        }

        #[test]
        fn test_edit_notifies() {
            let engine = TimerEngine::new();
            let log = record(&engine);

            engine.set_minutes("3");
            engine.set_seconds("4");

            let log = log.lock().unwrap();
            assert_eq!(log.len(), 2);
            assert_eq!(log[1].setting_minutes_text, "03");
            assert_eq!(log[1].setting_seconds_text, "04");
        }

        #[tokio::test(start_paused = true)]
        async fn test_edit_ignored_while_running() {
            let engine = create_engine("1", "0");
            engine.start();
            let log = record(&engine);

            engine.set_minutes("9");
            engine.set_seconds("9");

            assert!(log.lock().unwrap().is_empty());
            assert_eq!(engine.snapshot().setting_minutes_text, "01");
            assert_eq!(engine.snapshot().setting_seconds_text, "00");
            engine.stop();
        }
    }

    // ------------------------------------------------------------------------
    // Transition Tests
    // ------------------------------------------------------------------------

    mod transition_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_start_from_idle() {
            let engine = create_engine("0", "5");

            engine.start();

            let snapshot = engine.snapshot();
            assert_eq!(snapshot.phase, Phase::Running);
            assert_eq!(snapshot.total_seconds, 5);
            assert_eq!(snapshot.remaining_seconds, 5);
            assert_eq!(snapshot.progress, 1.0);
            engine.stop();
        }

        #[test]
        fn test_start_with_cleared_fields_is_noop() {
            let engine = TimerEngine::new();
            let log = record(&engine);

            engine.start();

            assert_eq!(engine.phase(), Phase::Idle);
            assert!(log.lock().unwrap().is_empty());
        }

        #[test]
        fn test_start_with_zero_fields_is_noop() {
            let engine = create_engine("0", "00");

            engine.start();

            assert_eq!(engine.phase(), Phase::Idle);
            assert_eq!(engine.snapshot().total_seconds, 0);
        }

        #[tokio::test(start_paused = true)]
        async fn test_start_while_running_is_noop() {
            let engine = create_engine("0", "10");
            engine.start();
            engine.force_tick();
            let log = record(&engine);

            engine.start();

            assert!(log.lock().unwrap().is_empty());
            assert_eq!(engine.snapshot().remaining_seconds, 9);
            engine.stop();
        }

        #[tokio::test(start_paused = true)]
        async fn test_pause_copies_remaining_into_setting() {
            let engine = create_engine("7", "30");
            engine.start();
            for _ in 0..2 {
                engine.force_tick();
            }

            engine.pause();

            let snapshot = engine.snapshot();
            assert_eq!(snapshot.phase, Phase::Paused);
            assert_eq!(snapshot.remaining_seconds, 448);
            assert_eq!(snapshot.setting_minutes_text, "07");
            assert_eq!(snapshot.setting_seconds_text, "28");
            assert_eq!(snapshot.remaining_minutes_text, "07");
            assert_eq!(snapshot.remaining_seconds_text, "28");
        }

        #[test]
        fn test_pause_when_idle_is_noop() {
            let engine = create_engine("1", "0");
            let log = record(&engine);

            engine.pause();

            assert_eq!(engine.phase(), Phase::Idle);
            assert!(log.lock().unwrap().is_empty());
        }

        #[tokio::test(start_paused = true)]
        async fn test_resume_keeps_total() {
            let engine = create_engine("0", "10");
            engine.start();
            engine.force_tick();
            engine.force_tick();
            engine.pause();
            engine.set_minutes("50");

            engine.start();

            let snapshot = engine.snapshot();
            assert_eq!(snapshot.phase, Phase::Running);
            assert_eq!(snapshot.total_seconds, 10);
            assert_eq!(snapshot.remaining_seconds, 8);
            engine.stop();
        }

        #[tokio::test(start_paused = true)]
        async fn test_resume_with_cleared_fields_is_noop() {
            let engine = create_engine("", "10");
            engine.start();
            engine.force_tick();
            engine.pause();
            engine.set_minutes("");
            engine.set_seconds("");
            let log = record(&engine);

            engine.start();

            let snapshot = engine.snapshot();
            assert_eq!(snapshot.phase, Phase::Paused);
            assert_eq!(snapshot.remaining_seconds, 9);
            assert!(engine.lock().ticker.is_none());
            assert!(log.lock().unwrap().is_empty());

            engine.set_seconds("0");
            engine.start();
            assert_eq!(engine.phase(), Phase::Running);
            assert_eq!(engine.snapshot().remaining_seconds, 9);
            engine.stop();
        }

        #[tokio::test(start_paused = true)]
        async fn test_stop_from_running_resets() {
            let engine = create_engine("0", "10");
            engine.start();
            engine.force_tick();

            engine.stop();

            let snapshot = engine.snapshot();
            assert_eq!(snapshot.phase, Phase::Idle);
            assert_eq!(snapshot.remaining_seconds, 10);
            assert_eq!(snapshot.progress, 0.0);
            assert_eq!(snapshot.setting_minutes_text, "00");
            assert_eq!(snapshot.setting_seconds_text, "10");
        }

        #[tokio::test(start_paused = true)]
        async fn test_stop_from_paused_resets() {
            let engine = create_engine("1", "0");
            engine.start();
            engine.force_tick();
            engine.pause();

            engine.stop();

            let snapshot = engine.snapshot();
            assert_eq!(snapshot.phase, Phase::Idle);
            assert_eq!(snapshot.remaining_seconds, 60);
            assert_eq!(snapshot.setting_minutes_text, "01");
            assert_eq!(snapshot.setting_seconds_text, "00");
        }

        #[test]
        fn test_stop_before_any_start() {
            let engine = create_engine("4", "");

            engine.stop();

            let snapshot = engine.snapshot();
            assert_eq!(snapshot.phase, Phase::Idle);
            assert_eq!(snapshot.remaining_seconds, 0);
            assert_eq!(snapshot.progress, 0.0);
            assert_eq!(snapshot.setting_minutes_text, "00");
            assert_eq!(snapshot.setting_seconds_text, "00");
        }
    }

    // ------------------------------------------------------------------------
    // Tick Tests
    // ------------------------------------------------------------------------

    mod tick_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_tick_decrements_and_updates_progress() {
            let engine = create_engine("0", "4");
            engine.start();

            engine.force_tick();

            let snapshot = engine.snapshot();
            assert_eq!(snapshot.remaining_seconds, 3);
            assert_eq!(snapshot.progress, 0.75);
            engine.stop();
        }

        #[tokio::test(start_paused = true)]
        async fn test_completion_resets_to_idle() {
            let engine = create_engine("0", "5");
            engine.start();
            let log = record(&engine);

            for _ in 0..5 {
                engine.force_tick();
            }

            let snapshot = engine.snapshot();
            assert_eq!(snapshot.phase, Phase::Idle);
            assert_eq!(snapshot.remaining_seconds, 5);
            assert_eq!(snapshot.progress, 0.0);
            assert_eq!(snapshot.setting_seconds_text, "05");

            // Five ticks, then the reset; the final tick is observed at 00:00
            let log = log.lock().unwrap();
            assert_eq!(log.len(), 6);
            assert_eq!(log[4].phase, Phase::Running);
            assert_eq!(log[4].remaining_seconds, 0);
            assert_eq!(log[5].phase, Phase::Idle);
        }

        #[test]
        fn test_tick_ignored_when_not_running() {
            let engine = create_engine("0", "5");
            engine.force_tick();
            assert_eq!(engine.snapshot().remaining_seconds, 0);
            assert_eq!(engine.phase(), Phase::Idle);
        }

        #[tokio::test(start_paused = true)]
        async fn test_stale_generation_is_rejected() {
            let engine = create_engine("0", "5");
            engine.start();
            let stale = engine.lock().generation;
            engine.pause();

            let flow = engine.lock().tick(stale);

            assert_eq!(flow, ControlFlow::Break(()));
            assert_eq!(engine.snapshot().remaining_seconds, 5);
        }

        #[tokio::test(start_paused = true)]
        async fn test_ticker_present_only_while_running() {
            let engine = create_engine("0", "3");
            assert!(engine.lock().ticker.is_none());

            engine.start();
            assert!(engine.lock().ticker.is_some());

            engine.pause();
            assert!(engine.lock().ticker.is_none());

            engine.start();
            assert!(engine.lock().ticker.is_some());

            for _ in 0..3 {
                engine.force_tick();
            }
            assert!(engine.lock().ticker.is_none());
        }
    }

    // ------------------------------------------------------------------------
    // Integration Tests with Tokio Runtime
    // ------------------------------------------------------------------------

    mod runtime_tests {
        use super::*;
        use tokio::time::{sleep, Duration};

        #[tokio::test(start_paused = true)]
        async fn test_runs_to_completion() {
            let engine = create_engine("0", "3");
            engine.start();

            sleep(Duration::from_millis(2500)).await;
            assert_eq!(engine.snapshot().remaining_seconds, 1);
            assert_eq!(engine.phase(), Phase::Running);

            sleep(Duration::from_secs(1)).await;
            let snapshot = engine.snapshot();
            assert_eq!(snapshot.phase, Phase::Idle);
            assert_eq!(snapshot.remaining_seconds, 3);
        }

        #[tokio::test(start_paused = true)]
        async fn test_no_ticks_after_pause() {
            let engine = create_engine("0", "10");
            engine.start();
            sleep(Duration::from_millis(2500)).await;

            engine.pause();
            sleep(Duration::from_secs(5)).await;

            let snapshot = engine.snapshot();
            assert_eq!(snapshot.phase, Phase::Paused);
            assert_eq!(snapshot.remaining_seconds, 8);
        }
    }
}
