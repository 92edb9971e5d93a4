//! Command implementations.
//!
//! Commands write their report to the given writer so tests can capture it.

pub mod cart;
pub mod theme;

use std::path::PathBuf;

use thiserror::Error;
use urban_vibe_storefront::config::{ConfigError, StorefrontConfig};
use urban_vibe_storefront::persistence::{CartStore, FileSlot, PersistenceError};

/// Errors returned by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Open the file-backed store, preferring an explicit directory over config.
///
/// # Errors
///
/// Returns `CliError::Config` if the environment configuration is invalid.
pub fn open_store(data_dir: Option<PathBuf>) -> Result<CartStore<FileSlot>, CliError> {
    let dir = match data_dir {
        Some(dir) => dir,
        None => StorefrontConfig::from_env()?.data_dir,
    };
    tracing::debug!(dir = %dir.display(), "opening data directory");
    Ok(CartStore::new(FileSlot::new(dir)))
}
