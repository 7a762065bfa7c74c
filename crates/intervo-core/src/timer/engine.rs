//! Phase timer implementation.
//!
//! The timer is a tick-driven state machine over `{Running, Paused} x {Work, Rest}`.
//! It owns a [`TickSource`] which it arms on `start()` and disarms on `pause()`,
//! `reset()` and drop; whoever drives the event loop forwards each delivered
//! tick to `tick()`.
//!
//! ## State Transitions
//!
//! ```text
//! (Paused, Work) -start-> (Running, Work) -tick at zero-> (Running, Rest) -> ...
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = PhaseTimer::new(work, rest, IntervalTicker::new());
//! timer.start();
//! // In the event loop:
//! timer.ticker_mut().wait().await;
//! timer.tick(); // Returns Some(Event::PhaseSwitched) at each phase boundary
//! ```

use std::num::NonZeroU32;

use chrono::Utc;

use super::phase::Phase;
use super::ticker::{TickSource, TICK_PERIOD};
use crate::events::Event;

/// Work/rest interval timer.
#[derive(Debug)]
pub struct PhaseTimer<T: TickSource> {
    work_secs: NonZeroU32,
    rest_secs: NonZeroU32,
    phase: Phase,
    /// Countdown for the active phase, in whole seconds.
    remaining_secs: u32,
    running: bool,
    ticker: T,
}

impl<T: TickSource> PhaseTimer<T> {
    /// Create a paused timer at the start of a work phase.
    pub fn new(work_secs: NonZeroU32, rest_secs: NonZeroU32, ticker: T) -> Self {
        Self {
            work_secs,
            rest_secs,
            phase: Phase::Work,
            remaining_secs: work_secs.get(),
            running: false,
            ticker,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn work_secs(&self) -> u32 {
        self.work_secs.get()
    }

    pub fn rest_secs(&self) -> u32 {
        self.rest_secs.get()
    }

    pub fn durations(&self) -> (NonZeroU32, NonZeroU32) {
        (self.work_secs, self.rest_secs)
    }

    /// Configured length of `phase`.
    pub fn duration_of(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Work => self.work_secs.get(),
            Phase::Rest => self.rest_secs.get(),
        }
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn phase_progress(&self) -> f64 {
        let total = self.duration_of(self.phase);
        (1.0 - f64::from(self.remaining_secs) / f64::from(total)).clamp(0.0, 1.0)
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    pub fn ticker_mut(&mut self) -> &mut T {
        &mut self.ticker
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::TimerSnapshot {
            phase: self.phase,
            label: self.phase.label().to_string(),
            running: self.running,
            remaining_secs: self.remaining_secs,
            work_secs: self.work_secs.get(),
            rest_secs: self.rest_secs.get(),
            phase_progress: self.phase_progress(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Update both durations.
    ///
    /// A paused timer shows the new length of the active phase at once. A
    /// running countdown is never shortened by a new active-phase length; it
    /// is only capped at the longer of the two durations.
    pub fn configure(&mut self, work_secs: NonZeroU32, rest_secs: NonZeroU32) -> Option<Event> {
        if work_secs == self.work_secs && rest_secs == self.rest_secs {
            return None;
        }

        let active_changed = match self.phase {
            Phase::Work => work_secs != self.work_secs,
            Phase::Rest => rest_secs != self.rest_secs,
        };
        self.work_secs = work_secs;
        self.rest_secs = rest_secs;

        if self.running {
            let bound = work_secs.max(rest_secs).get();
            self.remaining_secs = self.remaining_secs.min(bound);
        } else if active_changed {
            self.remaining_secs = self.duration_of(self.phase);
        }

        tracing::debug!(
            work = work_secs.get(),
            rest = rest_secs.get(),
            remaining = self.remaining_secs,
            "timer configured"
        );
        Some(Event::TimerConfigured {
            work_secs: work_secs.get(),
            rest_secs: rest_secs.get(),
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn start(&mut self) -> Option<Event> {
        if self.running {
            return None; // Already running.
        }
        self.running = true;
        self.ticker.arm(TICK_PERIOD);
        Some(Event::TimerStarted {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        self.ticker.disarm();
        Some(Event::TimerPaused {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Start when paused, pause when running.
    pub fn toggle(&mut self) -> Option<Event> {
        if self.running {
            self.pause()
        } else {
            self.start()
        }
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.running = false;
        self.ticker.disarm();
        self.phase = Phase::Work;
        self.remaining_secs = self.work_secs.get();
        Some(Event::TimerReset {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Advance the countdown by one tick.
    ///
    /// Returns `Some(Event::PhaseSwitched)` on the tick that reaches zero; the
    /// next phase is loaded in that same tick, so the switch fires once.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return None;
        }

        let from = self.phase;
        self.phase = from.other();
        self.remaining_secs = self.duration_of(self.phase);
        tracing::info!(%from, to = %self.phase, secs = self.remaining_secs, "phase switched");
        Some(Event::PhaseSwitched {
            from,
            to: self.phase,
            duration_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }
}

impl<T: TickSource> Drop for PhaseTimer<T> {
    fn drop(&mut self) {
        self.ticker.disarm();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::ManualTicker;

    fn secs(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    fn timer(work: u32, rest: u32) -> PhaseTimer<ManualTicker> {
        PhaseTimer::new(secs(work), secs(rest), ManualTicker::default())
    }

    #[test]
    fn starts_paused_in_work() {
        let t = timer(30, 10);
        assert_eq!(t.phase(), Phase::Work);
        assert_eq!(t.remaining_secs(), 30);
        assert!(!t.is_running());
        assert!(!t.ticker().is_armed());
    }

    #[test]
    fn start_pause_arm_and_disarm_ticker() {
        let mut t = timer(30, 10);
        assert!(t.start().is_some());
        assert!(t.ticker().is_armed());
        assert!(t.pause().is_some());
        assert!(!t.ticker().is_armed());
    }

    #[test]
    fn start_and_pause_are_idempotent() {
        let mut t = timer(30, 10);
        assert!(t.start().is_some());
        assert!(t.start().is_none());
        assert_eq!(t.ticker().arm_count(), 1);
        assert!(t.pause().is_some());
        assert!(t.pause().is_none());
        assert!(!t.is_running());
    }

    #[test]
    fn tick_while_paused_changes_nothing() {
        let mut t = timer(30, 10);
        assert!(t.tick().is_none());
        assert_eq!(t.remaining_secs(), 30);
    }

    #[test]
    fn tick_counts_down() {
        let mut t = timer(30, 10);
        t.start();
        t.tick();
        t.tick();
        assert_eq!(t.remaining_secs(), 28);
        assert_eq!(t.phase(), Phase::Work);
    }

    #[test]
    fn reaching_zero_switches_phase_once() {
        let mut t = timer(3, 2);
        t.start();
        assert!(t.tick().is_none());
        assert!(t.tick().is_none());
        match t.tick() {
            Some(Event::PhaseSwitched { from, to, duration_secs, .. }) => {
                assert_eq!(from, Phase::Work);
                assert_eq!(to, Phase::Rest);
                assert_eq!(duration_secs, 2);
            }
            other => panic!("Expected PhaseSwitched, got {other:?}"),
        }
        assert_eq!(t.remaining_secs(), 2);
        assert!(t.tick().is_none());
        assert!(t.tick().is_some());
        assert_eq!(t.phase(), Phase::Work);
        assert_eq!(t.remaining_secs(), 3);
    }

    #[test]
    fn one_second_phases_alternate_every_tick() {
        let mut t = timer(1, 1);
        t.start();
        assert!(t.tick().is_some());
        assert_eq!(t.phase(), Phase::Rest);
        assert!(t.tick().is_some());
        assert_eq!(t.phase(), Phase::Work);
        assert_eq!(t.remaining_secs(), 1);
    }

    #[test]
    fn reset_returns_to_initial_state() {
        let mut t = timer(3, 2);
        t.start();
        for _ in 0..4 {
            t.tick();
        }
        assert_eq!(t.phase(), Phase::Rest);
        assert!(t.reset().is_some());
        assert_eq!(t.phase(), Phase::Work);
        assert_eq!(t.remaining_secs(), 3);
        assert!(!t.is_running());
        assert!(!t.ticker().is_armed());
        assert_eq!(t.work_secs(), 3);
        assert_eq!(t.rest_secs(), 2);
    }

    #[test]
    fn toggle_flips_running() {
        let mut t = timer(30, 10);
        t.toggle();
        assert!(t.is_running());
        t.toggle();
        assert!(!t.is_running());
    }

    #[test]
    fn configure_while_paused_rebinds_active_phase() {
        let mut t = timer(30, 10);
        assert!(t.configure(secs(45), secs(10)).is_some());
        assert_eq!(t.remaining_secs(), 45);
    }

    #[test]
    fn configure_inactive_phase_keeps_paused_countdown() {
        let mut t = timer(30, 10);
        t.start();
        t.tick();
        t.pause();
        t.configure(secs(30), secs(20));
        assert_eq!(t.remaining_secs(), 29);
        assert_eq!(t.rest_secs(), 20);
    }

    #[test]
    fn configure_while_running_does_not_restart_countdown() {
        let mut t = timer(30, 10);
        t.start();
        t.tick();
        t.configure(secs(60), secs(10));
        assert_eq!(t.remaining_secs(), 29);
    }

    #[test]
    fn configure_while_running_does_not_shorten_countdown() {
        let mut t = timer(30, 10);
        t.start();
        t.tick();
        t.configure(secs(20), secs(40));
        assert_eq!(t.remaining_secs(), 29);
        assert_eq!(t.work_secs(), 20);

        // The new length applies from the next work phase on.
        for _ in 0..29 {
            t.tick();
        }
        assert_eq!(t.phase(), Phase::Rest);
        assert_eq!(t.remaining_secs(), 40);
    }

    #[test]
    fn configure_while_running_caps_at_longest_phase() {
        let mut t = timer(30, 10);
        t.start();
        t.tick();
        t.configure(secs(5), secs(12));
        assert_eq!(t.remaining_secs(), 12);
        assert!(t.is_running());
    }

    #[test]
    fn configure_with_same_values_is_noop() {
        let mut t = timer(30, 10);
        assert!(t.configure(secs(30), secs(10)).is_none());
    }

    #[test]
    fn drop_disarms_ticker() {
        use std::cell::Cell;
        use std::rc::Rc;

        struct Probe(Rc<Cell<bool>>);
        impl TickSource for Probe {
            fn arm(&mut self, _period: std::time::Duration) {
                self.0.set(true);
            }
            fn disarm(&mut self) {
                self.0.set(false);
            }
            fn is_armed(&self) -> bool {
                self.0.get()
            }
        }

        let armed = Rc::new(Cell::new(false));
        let mut t = PhaseTimer::new(secs(30), secs(10), Probe(armed.clone()));
        t.start();
        assert!(armed.get());
        drop(t);
        assert!(!armed.get());
    }

    #[test]
    fn snapshot_reports_label_and_progress() {
        let mut t = timer(10, 5);
        t.start();
        for _ in 0..5 {
            t.tick();
        }
        match t.snapshot() {
            Event::TimerSnapshot { label, running, remaining_secs, phase_progress, .. } => {
                assert_eq!(label, "Work!");
                assert!(running);
                assert_eq!(remaining_secs, 5);
                assert!((phase_progress - 0.5).abs() < f64::EPSILON);
            }
            other => panic!("Expected TimerSnapshot, got {other:?}"),
        }
    }
}
