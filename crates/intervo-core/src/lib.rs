//! # Intervo Core Library
//!
//! This library provides the core logic for the intervo workout timer: a
//! work/rest interval timer and an independent playlist player. The CLI binary
//! is a thin presentation layer composing the two.
//!
//! ## Architecture
//!
//! - **Timer**: A tick-driven work/rest state machine that owns a cancellable
//!   repeating tick source
//! - **Playlist**: Ordered tracks with revocable locators, driving a single
//!   audio output resource
//! - **Events**: Every state change is reported as an [`Event`] for rendering
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`PhaseTimer`]: Work/rest timer state machine
//! - [`PlaylistController`]: Track list, selection and playback commands
//! - [`AudioOutput`]: Trait for the playback resource
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod playlist;
pub mod storage;
pub mod timer;

pub use error::{AudioError, ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use playlist::{
    AudioOutput, LocatorStore, MemoryOutput, PlayableRef, PlaylistController, Track, UploadedFile,
};
pub use storage::{Config, Theme};
pub use timer::{IntervalTicker, ManualTicker, Phase, PhaseTimer, TickSource, TICK_PERIOD};
