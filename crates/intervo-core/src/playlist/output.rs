//! The audio output boundary.
//!
//! The controller only sequences `load`/`play`/`pause` calls; decoding and
//! actual sound are the output's business.

use crate::error::AudioError;

use super::locator::LocatorStore;

/// A single shared playback resource. Commands are last-write-wins: loading a
/// new reference replaces whatever was loaded or playing.
pub trait AudioOutput {
    /// Point the output at `reference`, positioned at the start. Stops any
    /// current playback.
    fn load(&mut self, reference: &str) -> Result<(), AudioError>;
    /// Start or resume playback of the loaded reference.
    fn play(&mut self) -> Result<(), AudioError>;
    fn pause(&mut self);
    fn is_playing(&self) -> bool;
}

impl<O: AudioOutput + ?Sized> AudioOutput for Box<O> {
    fn load(&mut self, reference: &str) -> Result<(), AudioError> {
        (**self).load(reference)
    }

    fn play(&mut self) -> Result<(), AudioError> {
        (**self).play()
    }

    fn pause(&mut self) {
        (**self).pause()
    }

    fn is_playing(&self) -> bool {
        (**self).is_playing()
    }
}

/// Headless output that validates locators but produces no sound.
#[derive(Debug, Clone)]
pub struct MemoryOutput {
    store: LocatorStore,
    loaded: Option<String>,
    playing: bool,
}

impl MemoryOutput {
    pub fn new(store: LocatorStore) -> Self {
        Self {
            store,
            loaded: None,
            playing: false,
        }
    }

    /// Locator currently loaded, if any.
    pub fn loaded(&self) -> Option<&str> {
        self.loaded.as_deref()
    }
}

impl AudioOutput for MemoryOutput {
    fn load(&mut self, reference: &str) -> Result<(), AudioError> {
        self.playing = false;
        if !self.store.is_live(reference) {
            self.loaded = None;
            return Err(AudioError::Revoked(reference.to_string()));
        }
        self.loaded = Some(reference.to_string());
        Ok(())
    }

    fn play(&mut self) -> Result<(), AudioError> {
        let reference = self.loaded.as_deref().ok_or(AudioError::NothingLoaded)?;
        let bytes = self
            .store
            .resolve(reference)
            .ok_or_else(|| AudioError::Revoked(reference.to_string()))?;
        if bytes.is_empty() {
            return Err(AudioError::Decode {
                reference: reference.to_string(),
                message: "empty payload".into(),
            });
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}
