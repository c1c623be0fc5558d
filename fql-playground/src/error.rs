use std::io;
use std::path::PathBuf;

use crate::engine::EngineError;

/// Errors that end the `fqlp` process
#[derive(Debug, thiserror::Error)]
pub enum PlaygroundError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("cannot open log file {}: {source}", path.display())]
    LogFile { path: PathBuf, source: io::Error },

    #[error("invalid log filter '{filter}': {reason}")]
    LogFilter { filter: String, reason: String },

    #[error("logging could not be initialized: {0}")]
    Logging(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("cannot serialize output: {0}")]
    Json(#[from] serde_json::Error),
}
