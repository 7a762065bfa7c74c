//! Playlist and playback control.

mod controller;
mod locator;
mod output;
mod track;

pub use controller::PlaylistController;
pub use locator::{LocatorStore, PlayableRef};
pub use output::{AudioOutput, MemoryOutput};
pub use track::{Track, UploadedFile};
