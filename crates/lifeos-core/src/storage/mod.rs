mod config;
pub mod migrations;
pub mod record_store;

pub use config::{CalendarConfig, Config, DashboardConfig, ThemeMode, UiConfig};
pub use record_store::{RecordStore, UserData};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the LifeOS data directory, creating it if needed.
///
/// `LIFEOS_DATA_DIR` overrides the location outright. Otherwise the directory
/// is `~/.config/lifeos[-dev]/`, with the `-dev` suffix selected by
/// `LIFEOS_ENV=dev`.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("LIFEOS_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("LIFEOS_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("lifeos-dev")
            } else {
                base_dir.join("lifeos")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
