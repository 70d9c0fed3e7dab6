mod config;

pub use config::{ActivitySection, BreaksSection, Config, MetricsSection, NotificationsSection};

use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Returns `~/.config/relaxeyes[-dev]/` based on RELAXEYES_ENV.
///
/// Set RELAXEYES_ENV=dev to use the development config directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .ok_or(ConfigError::NoConfigDir)?
        .join(".config");

    let env = std::env::var("RELAXEYES_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("relaxeyes-dev")
    } else {
        base_dir.join("relaxeyes")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::SaveFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
