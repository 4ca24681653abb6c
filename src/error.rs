// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Result type for snowflake operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised before an animation loop is allowed to start
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid polygon: {0}")]
    InvalidPolygon(String),

    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
