//! Integration tests for the timer and playlist working through the public API.
//!
//! Covers the end-to-end scenarios plus property checks on the phase cycle and
//! the selected-index invariant.

use std::num::NonZeroU32;

use intervo_core::{
    Event, LocatorStore, ManualTicker, MemoryOutput, Phase, PhaseTimer, PlaylistController,
    UploadedFile,
};
use proptest::prelude::*;

fn secs(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).unwrap()
}

fn new_timer(work: u32, rest: u32) -> PhaseTimer<ManualTicker> {
    PhaseTimer::new(secs(work), secs(rest), ManualTicker::default())
}

fn new_playlist() -> PlaylistController<MemoryOutput> {
    let store = LocatorStore::new();
    PlaylistController::new(store.clone(), MemoryOutput::new(store))
}

fn upload(names: &[&str]) -> Vec<UploadedFile> {
    names
        .iter()
        .map(|n| UploadedFile::new(*n, vec![0xFF, 0xFB, 0x90, 0x00]))
        .collect()
}

fn track_names(c: &PlaylistController<MemoryOutput>) -> Vec<String> {
    c.tracks().iter().map(|t| t.name().to_string()).collect()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn scenario_a_full_work_rest_cycle() {
    let mut timer = new_timer(30, 10);
    timer.start();

    for _ in 0..30 {
        timer.tick();
    }
    assert_eq!(timer.phase(), Phase::Rest);
    assert_eq!(timer.remaining_secs(), 10);

    for _ in 0..10 {
        timer.tick();
    }
    assert_eq!(timer.phase(), Phase::Work);
    assert_eq!(timer.remaining_secs(), 30);
}

#[test]
fn scenario_b_next_stops_at_last_track() {
    let mut playlist = new_playlist();
    playlist.add_tracks(upload(&["a.mp3", "b.mp3", "c.mp3"]));

    playlist.play(1).unwrap();
    assert_eq!(playlist.selected_index(), Some(1));

    playlist.next().unwrap();
    assert_eq!(playlist.selected_index(), Some(2));

    assert!(playlist.next().unwrap().is_none());
    assert_eq!(playlist.selected_index(), Some(2));
}

#[test]
fn scenario_c_remove_before_selection() {
    let mut playlist = new_playlist();
    playlist.add_tracks(upload(&["a.mp3", "b.mp3", "c.mp3"]));
    playlist.play(2).unwrap();

    playlist.remove(0);
    assert_eq!(playlist.selected_index(), Some(1));
    assert_eq!(track_names(&playlist), ["b.mp3", "c.mp3"]);
}

#[test]
fn scenario_d_toggle_with_empty_playlist() {
    let mut playlist = new_playlist();
    assert!(playlist.toggle_play_pause().unwrap().is_none());
    assert!(!playlist.is_playing());
}

// ============================================================================
// Timer behaviour
// ============================================================================

#[test]
fn reset_from_any_state_is_paused_work() {
    let mut timer = new_timer(5, 3);
    timer.start();
    for _ in 0..7 {
        timer.tick();
    }
    assert_eq!(timer.phase(), Phase::Rest);
    timer.reset();
    assert_eq!(
        (timer.is_running(), timer.phase(), timer.remaining_secs()),
        (false, Phase::Work, 5)
    );

    // Reset of an already pristine timer gives the same state.
    timer.reset();
    assert_eq!(
        (timer.is_running(), timer.phase(), timer.remaining_secs()),
        (false, Phase::Work, 5)
    );
}

#[test]
fn paused_timer_ignores_ticks_mid_cycle() {
    let mut timer = new_timer(5, 3);
    timer.start();
    timer.tick();
    timer.tick();
    timer.pause();
    for _ in 0..10 {
        assert!(timer.tick().is_none());
    }
    assert_eq!(timer.remaining_secs(), 3);
    timer.start();
    timer.tick();
    assert_eq!(timer.remaining_secs(), 2);
}

#[test]
fn timer_and_playlist_are_independent() {
    let mut timer = new_timer(2, 1);
    let mut playlist = new_playlist();
    playlist.add_tracks(upload(&["a.mp3"]));
    playlist.play(0).unwrap();

    timer.start();
    timer.tick();
    timer.tick();
    assert_eq!(timer.phase(), Phase::Rest);
    assert!(playlist.is_playing());

    playlist.toggle_play_pause().unwrap();
    assert!(timer.is_running());
}

#[test]
fn events_serialize_with_type_tag() {
    let mut timer = new_timer(1, 1);
    timer.start();
    let event = timer.tick().unwrap();
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "PhaseSwitched");
    assert_eq!(json["from"], "work");
    assert_eq!(json["to"], "rest");
}

// ============================================================================
// Playlist behaviour
// ============================================================================

#[test]
fn removed_locator_cannot_be_replayed() {
    let mut playlist = new_playlist();
    playlist.add_tracks(upload(&["a.mp3", "b.mp3"]));
    playlist.play(0).unwrap();
    let loaded = playlist.output().loaded().unwrap().to_string();

    playlist.remove(0);
    assert!(!playlist.store().is_live(&loaded));
    assert!(!playlist.is_playing());
    assert!(playlist.toggle_play_pause().unwrap().is_none());
}

#[test]
fn replaying_the_selected_track_restarts_it() {
    let mut playlist = new_playlist();
    playlist.add_tracks(upload(&["a.mp3"]));
    playlist.play(0).unwrap();
    playlist.toggle_play_pause().unwrap();
    assert!(!playlist.is_playing());

    match playlist.play(0).unwrap() {
        Some(Event::TrackStarted { index, name, .. }) => {
            assert_eq!(index, 0);
            assert_eq!(name, "a.mp3");
        }
        other => panic!("Expected TrackStarted, got {other:?}"),
    }
    assert!(playlist.is_playing());
}

#[test]
fn duplicate_names_get_distinct_locators() {
    let mut playlist = new_playlist();
    playlist.add_tracks(upload(&["same.mp3", "same.mp3"]));
    let tracks = playlist.tracks();
    assert_ne!(tracks[0].reference(), tracks[1].reference());
}

// ============================================================================
// Properties
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    Add(u8),
    Remove(usize),
    Play(usize),
    Next,
    Previous,
    Toggle,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..4).prop_map(Op::Add),
        (0usize..8).prop_map(Op::Remove),
        (0usize..8).prop_map(Op::Play),
        Just(Op::Next),
        Just(Op::Previous),
        Just(Op::Toggle),
    ]
}

proptest! {
    #[test]
    fn work_phase_ends_after_exactly_work_ticks(work in 1u32..200, rest in 1u32..200) {
        let mut timer = new_timer(work, rest);
        timer.start();

        let mut switches = 0;
        for _ in 0..work {
            if timer.tick().is_some() {
                switches += 1;
            }
        }
        prop_assert_eq!(switches, 1);
        prop_assert_eq!(timer.phase(), Phase::Rest);
        prop_assert_eq!(timer.remaining_secs(), rest);
    }

    #[test]
    fn remaining_stays_within_bounds(
        work in 1u32..50,
        rest in 1u32..50,
        steps in prop::collection::vec(prop::option::of((1u32..50, 1u32..50)), 0..300),
    ) {
        let mut timer = new_timer(work, rest);
        timer.start();
        for step in steps {
            let before = timer.remaining_secs();
            match step {
                Some((w, r)) => {
                    timer.configure(secs(w), secs(r));
                    // Only the upper bound may cut a running countdown.
                    prop_assert_eq!(timer.remaining_secs(), before.min(w.max(r)));
                }
                None => {
                    timer.tick();
                }
            }
            prop_assert!(timer.remaining_secs() <= timer.work_secs().max(timer.rest_secs()));
        }
    }

    #[test]
    fn selected_index_is_always_valid(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut playlist = new_playlist();
        let mut counter = 0usize;

        for op in ops {
            let before = playlist.selected_index();
            let len_before = playlist.len();
            match op {
                Op::Add(n) => {
                    let files: Vec<UploadedFile> = (0..n)
                        .map(|_| {
                            counter += 1;
                            UploadedFile::new(format!("t{counter}.mp3"), vec![1, 2, 3])
                        })
                        .collect();
                    playlist.add_tracks(files);
                }
                Op::Remove(i) => {
                    playlist.remove(i);
                    if let (Some(sel), true) = (before, i < len_before) {
                        if i == sel {
                            prop_assert_eq!(playlist.selected_index(), None);
                            prop_assert!(!playlist.is_playing());
                        } else if i < sel {
                            prop_assert_eq!(playlist.selected_index(), Some(sel - 1));
                        } else {
                            prop_assert_eq!(playlist.selected_index(), Some(sel));
                        }
                    }
                }
                Op::Play(i) => {
                    let _ = playlist.play(i);
                }
                Op::Next => {
                    let _ = playlist.next();
                }
                Op::Previous => {
                    let _ = playlist.previous();
                }
                Op::Toggle => {
                    let _ = playlist.toggle_play_pause();
                }
            }

            if let Some(sel) = playlist.selected_index() {
                prop_assert!(sel < playlist.len());
            }
            prop_assert_eq!(playlist.store().live_count(), playlist.len());
        }
    }
}
