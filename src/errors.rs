use std::io;

use thiserror::Error;

/// Error type for pipeline configuration, IO, and emission failures.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("invalid record: {0}")]
    InvalidRecord(String),
    #[error("reference csv '{path}' failed: {reason}")]
    Reference { path: String, reason: String },
    #[error("failed to write '{path}': {reason}")]
    Write { path: String, reason: String },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
