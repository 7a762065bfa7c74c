//! Audio output backed by an external player process.
//!
//! Decoding is left to whatever player the user configures (`mpv --no-video`,
//! `ffplay -nodisp -autoexit`, ...). The resolved bytes are written to a temp
//! file which is handed to the player as its last argument.

use std::cell::RefCell;
use std::io::Write;
use std::path::Path;
use std::process::{Child, Command, Stdio};

use intervo_core::{AudioError, AudioOutput, LocatorStore, ValidationError};
use tempfile::NamedTempFile;

pub struct ExternalPlayer {
    store: LocatorStore,
    program: String,
    args: Vec<String>,
    loaded: Option<NamedTempFile>,
    /// `RefCell` so `is_playing` can reap an exited child.
    child: RefCell<Option<Child>>,
    suspended: bool,
}

impl ExternalPlayer {
    pub fn new(store: LocatorStore, command: &str) -> Result<Self, ValidationError> {
        let mut words = command.split_whitespace().map(str::to_string);
        let program = words.next().ok_or_else(|| ValidationError::InvalidValue {
            field: "audio.player_command".into(),
            message: "player command is empty".into(),
        })?;
        Ok(Self {
            store,
            program,
            args: words.collect(),
            loaded: None,
            child: RefCell::new(None),
            suspended: false,
        })
    }

    /// Temp file holding the loaded track, if any.
    pub fn loaded_path(&self) -> Option<&Path> {
        self.loaded.as_ref().map(|f| f.path())
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.child.get_mut().take() {
            if self.suspended {
                signal(&child, "-CONT");
            }
            if let Err(e) = child.kill() {
                tracing::debug!("player already gone: {e}");
            }
            let _ = child.wait();
        }
        self.suspended = false;
    }

    fn spawn(&mut self) -> Result<(), AudioError> {
        let path = self
            .loaded
            .as_ref()
            .map(|f| f.path().to_path_buf())
            .ok_or(AudioError::NothingLoaded)?;

        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(&path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| AudioError::Backend(format!("cannot start '{}': {e}", self.program)))?;

        tracing::debug!(pid = child.id(), program = %self.program, "player started");
        *self.child.get_mut() = Some(child);
        self.suspended = false;
        Ok(())
    }

    fn child_alive(&self) -> bool {
        let mut slot = self.child.borrow_mut();
        let status = slot.as_mut().map(|c| c.try_wait());
        match status {
            Some(Ok(None)) => true,
            Some(_) => {
                *slot = None;
                false
            }
            None => false,
        }
    }
}

impl AudioOutput for ExternalPlayer {
    fn load(&mut self, reference: &str) -> Result<(), AudioError> {
        self.stop();
        self.loaded = None;

        let bytes = self
            .store
            .resolve(reference)
            .ok_or_else(|| AudioError::Revoked(reference.to_string()))?;

        let backend = |e: std::io::Error| AudioError::Backend(e.to_string());
        let mut file = tempfile::Builder::new()
            .prefix("intervo-")
            .tempfile()
            .map_err(backend)?;
        file.write_all(&bytes).map_err(backend)?;
        file.flush().map_err(backend)?;

        self.loaded = Some(file);
        Ok(())
    }

    fn play(&mut self) -> Result<(), AudioError> {
        if self.child_alive() {
            if self.suspended {
                self.resume();
            }
            return Ok(());
        }
        self.spawn()
    }

    fn pause(&mut self) {
        if !self.child_alive() || self.suspended {
            return;
        }
        self.suspend();
    }

    fn is_playing(&self) -> bool {
        !self.suspended && self.child_alive()
    }
}

#[cfg(unix)]
impl ExternalPlayer {
    fn suspend(&mut self) {
        if let Some(child) = self.child.get_mut().as_ref() {
            self.suspended = signal(child, "-STOP");
        }
    }

    fn resume(&mut self) {
        if let Some(child) = self.child.get_mut().as_ref() {
            if signal(child, "-CONT") {
                self.suspended = false;
            }
        }
    }
}

// No job control: pausing ends the process and resuming starts the track over.
#[cfg(not(unix))]
impl ExternalPlayer {
    fn suspend(&mut self) {
        self.stop();
    }

    fn resume(&mut self) {
        if let Err(e) = self.spawn() {
            tracing::warn!("cannot restart player: {e}");
        }
    }
}

/// Send `sig` through `kill`. True only if the signal was delivered.
#[cfg(unix)]
fn signal(child: &Child, sig: &str) -> bool {
    let status = Command::new("kill")
        .arg(sig)
        .arg(child.id().to_string())
        .stderr(Stdio::null())
        .status();
    match status {
        Ok(status) if status.success() => true,
        Ok(status) => {
            tracing::warn!(pid = child.id(), sig, %status, "player did not accept signal");
            false
        }
        Err(e) => {
            tracing::warn!(pid = child.id(), sig, "cannot signal player: {e}");
            false
        }
    }
}

#[cfg(not(unix))]
fn signal(_child: &Child, _sig: &str) -> bool {
    true
}

impl Drop for ExternalPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}
