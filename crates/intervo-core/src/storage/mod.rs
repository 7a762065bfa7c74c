mod config;

pub use config::{AudioConfig, Config, Theme, TimerConfig, UiConfig};

use std::path::PathBuf;

use crate::error::Result;

/// Returns the directory holding `config.toml`.
///
/// `INTERVO_HOME` wins outright. Otherwise `~/.config/intervo[-dev]/`,
/// selected by `INTERVO_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("INTERVO_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("INTERVO_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("intervo-dev")
            } else {
                base_dir.join("intervo")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
