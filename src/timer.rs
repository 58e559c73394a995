//! Brew countdown timer.
//!
//! [`TimerState`] is the pure state machine: `Idle -> Running -> Finished`,
//! one decrement per tick. [`CountdownTimer`] wraps it with a real tick
//! source, a tokio task that exists only between `start()` and whichever
//! comes first of completion, `stop()`, or drop.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::consts::TICK_INTERVAL;

/// Where the countdown is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Finished,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Timer was not running; nothing changed.
    Ignored,
    /// One second was taken off.
    Counted,
    /// Countdown reached zero on this tick.
    Finished,
}

/// Remaining seconds plus phase. `remaining_secs` only moves while running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerState {
    remaining_secs: u32,
    phase: Phase,
}

impl TimerState {
    pub fn new(duration_secs: u32) -> Self {
        Self {
            remaining_secs: duration_secs,
            phase: Phase::Idle,
        }
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_brewing(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// `m:ss` rendering of the remaining time.
    pub fn display(&self) -> String {
        format_display(self.remaining_secs)
    }

    /// Enter `Running`. Returns `false` (and changes nothing) if already running.
    ///
    /// Does not touch `remaining_secs`: restarting after `Finished` runs from 0
    /// and finishes on the next tick unless [`reset`](Self::reset) ran first.
    pub fn begin(&mut self) -> bool {
        if self.phase == Phase::Running {
            return false;
        }
        self.phase = Phase::Running;
        true
    }

    /// Advance by one second.
    pub fn tick(&mut self) -> Tick {
        if self.phase != Phase::Running {
            return Tick::Ignored;
        }
        if self.remaining_secs > 0 {
            self.remaining_secs -= 1;
        }
        if self.remaining_secs == 0 {
            self.phase = Phase::Finished;
            Tick::Finished
        } else {
            Tick::Counted
        }
    }

    /// Back to `Idle` with a full duration. Refused while running.
    pub fn reset(&mut self, duration_secs: u32) -> bool {
        if self.phase == Phase::Running {
            return false;
        }
        *self = Self::new(duration_secs);
        true
    }
}

/// Format seconds as `m:ss`, e.g. `65 -> "1:05"`.
pub fn format_display(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Periodic tick task. Aborted on drop, so it can never outlive its owner.
struct TickSource {
    handle: JoinHandle<()>,
}

impl TickSource {
    fn spawn(runtime: &Handle, state: Arc<watch::Sender<TimerState>>, period: Duration) -> Self {
        let handle = runtime.spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;

                let mut outcome = Tick::Ignored;
                state.send_if_modified(|s| {
                    outcome = s.tick();
                    outcome != Tick::Ignored
                });

                match outcome {
                    Tick::Counted => {}
                    Tick::Finished => {
                        info!("brew timer finished");
                        break;
                    }
                    Tick::Ignored => break,
                }
            }
        });
        Self { handle }
    }

    fn is_alive(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for TickSource {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A countdown driven by a real one-second tick.
///
/// Subscribers from [`watch`](Self::watch) are notified on every tick.
pub struct CountdownTimer {
    duration_secs: u32,
    period: Duration,
    state: Arc<watch::Sender<TimerState>>,
    ticker: Option<TickSource>,
}

impl CountdownTimer {
    pub fn new(duration_secs: u32) -> Self {
        Self::with_period(duration_secs, TICK_INTERVAL)
    }

    /// Same as [`new`](Self::new) with a custom tick period (at least 1ms).
    pub fn with_period(duration_secs: u32, period: Duration) -> Self {
        let (tx, _) = watch::channel(TimerState::new(duration_secs));
        Self {
            duration_secs,
            period: period.max(Duration::from_millis(1)),
            state: Arc::new(tx),
            ticker: None,
        }
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn state(&self) -> TimerState {
        *self.state.borrow()
    }

    pub fn display(&self) -> String {
        self.state().display()
    }

    /// Receiver notified on every state change.
    pub fn watch(&self) -> watch::Receiver<TimerState> {
        self.state.subscribe()
    }

    /// Whether a tick source is currently live.
    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(TickSource::is_alive)
    }

    /// Start counting down.
    ///
    /// Returns `Ok(false)` when a tick source is already live; a timer never
    /// gets a second one. A run left `Running` by [`stop`](Self::stop) resumes
    /// from its remaining time. Fails only outside a tokio runtime.
    pub fn start(&mut self) -> Result<bool> {
        let runtime = Handle::try_current().context("countdown timer needs a tokio runtime")?;

        if self.is_ticking() {
            debug!("brew timer already running");
            return Ok(false);
        }

        let resumed = !self.state.send_if_modified(TimerState::begin);
        self.ticker = Some(TickSource::spawn(
            &runtime,
            Arc::clone(&self.state),
            self.period,
        ));
        info!(
            remaining = self.state().remaining_secs(),
            resumed, "brew timer started"
        );
        Ok(true)
    }

    /// Release the tick source, if any. Phase and remaining time are left as is.
    ///
    /// Returns `true` if a live tick source was released.
    pub fn stop(&mut self) -> bool {
        match self.ticker.take() {
            Some(ticker) if ticker.is_alive() => {
                debug!("brew timer tick source released");
                true
            }
            _ => false,
        }
    }

    /// Restore the full duration. Refused (returns `false`) while ticking.
    ///
    /// A run halted by [`stop`](Self::stop) counts as not ticking and goes
    /// back to `Idle`.
    pub fn reset(&mut self) -> bool {
        if self.is_ticking() {
            return false;
        }
        self.ticker = None;
        self.state.send_replace(TimerState::new(self.duration_secs));
        true
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(secs: u32) -> TimerState {
        let mut state = TimerState::new(secs);
        assert!(state.begin());
        state
    }

    #[test]
    fn new_state_is_idle() {
        let state = TimerState::new(180);
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.remaining_secs(), 180);
    }

    #[test]
    fn tick_while_idle_is_ignored() {
        let mut state = TimerState::new(180);
        assert_eq!(state.tick(), Tick::Ignored);
        assert_eq!(state.remaining_secs(), 180);
    }

    #[test]
    fn tick_decrements_while_running() {
        let mut state = running(180);
        assert_eq!(state.tick(), Tick::Counted);
        assert_eq!(state.remaining_secs(), 179);
    }

    #[test]
    fn last_tick_finishes() {
        let mut state = running(2);
        assert_eq!(state.tick(), Tick::Counted);
        assert_eq!(state.tick(), Tick::Finished);
        assert_eq!(state.remaining_secs(), 0);
        assert!(state.is_finished());
        assert!(!state.is_brewing());
    }

    #[test]
    fn begin_is_refused_while_running() {
        let mut state = running(10);
        assert!(!state.begin());
    }

    #[test]
    fn restart_after_finish_keeps_zero() {
        let mut state = running(1);
        assert_eq!(state.tick(), Tick::Finished);

        assert!(state.begin());
        assert_eq!(state.remaining_secs(), 0);
        assert_eq!(state.tick(), Tick::Finished);
    }

    #[test]
    fn zero_duration_finishes_on_first_tick() {
        let mut state = running(0);
        assert_eq!(state.tick(), Tick::Finished);
        assert_eq!(state.remaining_secs(), 0);
    }

    #[test]
    fn reset_refused_while_running() {
        let mut state = running(10);
        state.tick();
        assert!(!state.reset(10));
        assert_eq!(state.remaining_secs(), 9);
    }

    #[test]
    fn reset_after_finish_restores_duration() {
        let mut state = running(1);
        state.tick();
        assert!(state.reset(180));
        assert_eq!(state, TimerState::new(180));
    }

    #[test]
    fn display_pads_seconds() {
        assert_eq!(format_display(65), "1:05");
        assert_eq!(format_display(5), "0:05");
        assert_eq!(format_display(0), "0:00");
        assert_eq!(format_display(180), "3:00");
        assert_eq!(format_display(600), "10:00");
    }

    #[test]
    fn start_outside_runtime_fails() {
        let mut timer = CountdownTimer::new(180);
        assert!(timer.start().is_err());
        assert_eq!(timer.state().phase(), Phase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_releases_tick_source() {
        let mut timer = CountdownTimer::new(180);
        assert!(timer.start().unwrap());
        assert!(timer.is_ticking());

        assert!(timer.stop());
        assert!(!timer.is_ticking());
        assert_eq!(timer.state().phase(), Phase::Running);
        assert!(!timer.stop());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_after_finish_releases_nothing() {
        let mut timer = CountdownTimer::with_period(1, Duration::from_millis(10));
        timer.start().unwrap();
        tokio::time::sleep(Duration::from_millis(25)).await;
        assert!(timer.state().is_finished());
        assert!(!timer.stop());
    }

    #[tokio::test(start_paused = true)]
    async fn reset_is_refused_while_ticking() {
        let mut timer = CountdownTimer::new(180);
        timer.start().unwrap();
        assert!(!timer.reset());
    }
}
