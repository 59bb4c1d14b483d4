use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum Error {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A data operation or connect step ran before the handle it needs.
    #[error("Not connected: no {0} handle")]
    NotConnected(&'static str),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("mongoimport failed for {path} ({status}): {stderr}")]
    ImportFailed { path: PathBuf, status: String, stderr: String },

    #[error("Destination already exists: {0}")]
    DestinationExists(PathBuf),
}

/// Convenience Result type using our Error
pub type Result<T> = std::result::Result<T, Error>;
