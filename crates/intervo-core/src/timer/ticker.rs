//! Repeating tick sources for [`PhaseTimer`](super::PhaseTimer).
//!
//! The timer arms its source on `start()` and disarms it on `pause()`,
//! `reset()` and drop. Nothing else touches it.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Fixed countdown period.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// A cancellable repeating timer.
pub trait TickSource {
    /// Begin delivering ticks every `period`. Re-arming restarts the period.
    fn arm(&mut self, period: Duration);
    /// Stop delivering ticks. Ticks already queued are discarded.
    fn disarm(&mut self);
    fn is_armed(&self) -> bool;
}

/// Tick source without a background task.
///
/// The owner calls `PhaseTimer::tick()` itself; this only records whether
/// ticking is currently wanted.
#[derive(Debug, Default)]
pub struct ManualTicker {
    armed: bool,
    arm_count: usize,
}

impl ManualTicker {
    /// How many times the source has been armed.
    pub fn arm_count(&self) -> usize {
        self.arm_count
    }
}

impl TickSource for ManualTicker {
    fn arm(&mut self, _period: Duration) {
        self.armed = true;
        self.arm_count += 1;
    }

    fn disarm(&mut self) {
        self.armed = false;
    }

    fn is_armed(&self) -> bool {
        self.armed
    }
}

/// Tick source backed by `tokio::time::interval`.
///
/// Each `arm` spawns a task on the current runtime and opens a fresh channel,
/// so a tick queued before `disarm` can never be observed after it.
#[derive(Debug, Default)]
pub struct IntervalTicker {
    task: Option<JoinHandle<()>>,
    rx: Option<mpsc::UnboundedReceiver<()>>,
}

impl IntervalTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves on the next tick. Pends forever while disarmed, which makes it
    /// safe to use as a `select!` branch.
    pub async fn wait(&mut self) {
        if let Some(rx) = self.rx.as_mut() {
            if rx.recv().await.is_some() {
                return;
            }
        }
        std::future::pending::<()>().await
    }
}

impl TickSource for IntervalTicker {
    fn arm(&mut self, period: Duration) {
        self.disarm();

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!("cannot arm interval ticker outside a runtime: {e}");
                return;
            }
        };

        let (tx, rx) = mpsc::unbounded_channel();
        let task = handle.spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if tx.send(()).is_err() {
                    break;
                }
            }
        });

        self.task = Some(task);
        self.rx = Some(rx);
    }

    fn disarm(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.rx = None;
    }

    fn is_armed(&self) -> bool {
        self.task.is_some()
    }
}

impl Drop for IntervalTicker {
    fn drop(&mut self) {
        self.disarm();
    }
}
