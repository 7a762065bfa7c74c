use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::Phase;

/// Every state change in the system produces an Event.
/// The presentation layer renders them; no-op commands produce none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        phase: Phase,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerConfigured {
        work_secs: u32,
        rest_secs: u32,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    /// The countdown hit zero and the timer moved to the other phase.
    PhaseSwitched {
        from: Phase,
        to: Phase,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    TimerSnapshot {
        phase: Phase,
        label: String,
        running: bool,
        remaining_secs: u32,
        work_secs: u32,
        rest_secs: u32,
        phase_progress: f64,
        at: DateTime<Utc>,
    },
    TracksAdded {
        /// Index of the first appended track.
        first_index: usize,
        names: Vec<String>,
        at: DateTime<Utc>,
    },
    TrackStarted {
        index: usize,
        name: String,
        at: DateTime<Utc>,
    },
    PlaybackPaused {
        index: usize,
        at: DateTime<Utc>,
    },
    PlaybackResumed {
        index: usize,
        at: DateTime<Utc>,
    },
    TrackRemoved {
        index: usize,
        name: String,
        /// True when the removed track was the selected one; playback stopped.
        was_selected: bool,
        selected_index: Option<usize>,
        at: DateTime<Utc>,
    },
    PlaylistSnapshot {
        tracks: Vec<String>,
        selected_index: Option<usize>,
        playing: bool,
        at: DateTime<Utc>,
    },
}
