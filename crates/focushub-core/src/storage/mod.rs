pub mod config;
pub mod snapshot;

pub use config::HubConfig;
pub use snapshot::{HubSnapshot, SnapshotStore};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns `~/.config/focushub[-dev]/` based on FOCUSHUB_ENV.
///
/// Set FOCUSHUB_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FOCUSHUB_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("focushub-dev")
    } else {
        base_dir.join("focushub")
    };

    std::fs::create_dir_all(&dir).map_err(|e| StorageError::DataDir(e.to_string()))?;
    Ok(dir)
}
