//! Playlist controller.
//!
//! Owns the loaded tracks and the selected index, and is the only thing that
//! commands the audio output. Out-of-range indices are ignored (`None`);
//! output failures are handed back unchanged.

use std::rc::Rc;

use chrono::Utc;

use super::locator::LocatorStore;
use super::output::AudioOutput;
use super::track::{Track, UploadedFile};
use crate::error::AudioError;
use crate::events::Event;

#[derive(Debug)]
pub struct PlaylistController<O: AudioOutput> {
    tracks: Vec<Track>,
    /// Always `None` or a valid index into `tracks`.
    selected: Option<usize>,
    store: LocatorStore,
    output: O,
}

impl<O: AudioOutput> PlaylistController<O> {
    /// `store` must be the registry `output` resolves locators against.
    pub fn new(store: LocatorStore, output: O) -> Self {
        Self {
            tracks: Vec::new(),
            selected: None,
            store,
            output,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.selected.and_then(|i| self.tracks.get(i))
    }

    pub fn is_playing(&self) -> bool {
        self.output.is_playing()
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn store(&self) -> &LocatorStore {
        &self.store
    }

    pub fn snapshot(&self) -> Event {
        Event::PlaylistSnapshot {
            tracks: self.tracks.iter().map(|t| t.name().to_string()).collect(),
            selected_index: self.selected,
            playing: self.output.is_playing(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Append one track per file, in input order.
    pub fn add_tracks<I>(&mut self, files: I) -> Option<Event>
    where
        I: IntoIterator<Item = UploadedFile>,
    {
        let first_index = self.tracks.len();
        for file in files {
            let reference = self.store.mint(Rc::from(file.bytes));
            tracing::info!(name = %file.name, %reference, "track added");
            self.tracks.push(Track::new(file.name, reference));
        }

        if self.tracks.len() == first_index {
            return None;
        }
        Some(Event::TracksAdded {
            first_index,
            names: self.tracks[first_index..]
                .iter()
                .map(|t| t.name().to_string())
                .collect(),
            at: Utc::now(),
        })
    }

    /// Select `index` and play it from the start.
    ///
    /// The selection moves even if the output then fails, so the user can
    /// retry the same track.
    pub fn play(&mut self, index: usize) -> Result<Option<Event>, AudioError> {
        let Some(track) = self.tracks.get(index) else {
            tracing::debug!(index, len = self.tracks.len(), "play ignored: index out of range");
            return Ok(None);
        };

        self.selected = Some(index);
        let name = track.name().to_string();
        self.output.load(track.reference().as_str())?;
        self.output.play()?;

        tracing::info!(index, %name, "track started");
        Ok(Some(Event::TrackStarted {
            index,
            name,
            at: Utc::now(),
        }))
    }

    pub fn toggle_play_pause(&mut self) -> Result<Option<Event>, AudioError> {
        let Some(index) = self.selected else {
            tracing::debug!("play/pause ignored: nothing loaded");
            return Ok(None);
        };

        if self.output.is_playing() {
            self.output.pause();
            Ok(Some(Event::PlaybackPaused {
                index,
                at: Utc::now(),
            }))
        } else {
            self.output.play()?;
            Ok(Some(Event::PlaybackResumed {
                index,
                at: Utc::now(),
            }))
        }
    }

    /// Play the following track. No wraparound.
    pub fn next(&mut self) -> Result<Option<Event>, AudioError> {
        match self.selected {
            Some(i) if i + 1 < self.tracks.len() => self.play(i + 1),
            _ => Ok(None),
        }
    }

    /// Play the preceding track. No wraparound.
    pub fn previous(&mut self) -> Result<Option<Event>, AudioError> {
        match self.selected {
            Some(i) if i > 0 => self.play(i - 1),
            _ => Ok(None),
        }
    }

    /// Remove a track and release its locator.
    pub fn remove(&mut self, index: usize) -> Option<Event> {
        if index >= self.tracks.len() {
            tracing::debug!(index, len = self.tracks.len(), "remove ignored: index out of range");
            return None;
        }

        let was_selected = self.selected == Some(index);
        if was_selected {
            self.output.pause();
            self.selected = None;
        } else if let Some(sel) = self.selected {
            if index < sel {
                self.selected = Some(sel - 1);
            }
        }

        let track = self.tracks.remove(index);
        let name = track.name().to_string();
        self.store.revoke(track.into_reference());
        tracing::info!(index, %name, was_selected, "track removed");

        Some(Event::TrackRemoved {
            index,
            name,
            was_selected,
            selected_index: self.selected,
            at: Utc::now(),
        })
    }
}

impl<O: AudioOutput> Drop for PlaylistController<O> {
    fn drop(&mut self) {
        self.output.pause();
        self.selected = None;
        for track in self.tracks.drain(..) {
            self.store.revoke(track.into_reference());
        }
    }
}
