//! Error types

use std::path::PathBuf;
use thiserror::Error;

/// Configuration problems, always raised before any timing begins
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown benchmark or suite `{0}` (try `listbench list`)")]
    UnknownCase(String),

    #[error("measurement_iterations must be at least 1")]
    NoMeasurementIterations,

    #[error("box_cache_max must be at least {min}, got {got}")]
    BoxCacheTooSmall { min: i32, got: i32 },

    #[error("box_cache_max must be at most {max}, got {got}")]
    BoxCacheTooLarge { max: i32, got: i32 },

    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures of a single fork
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("benchmark `{case}` panicked in fork #{fork}: {message}")]
    BodyPanicked { case: String, fork: u32, message: String },

    #[error("failed to spawn fork #{fork} of `{case}`: {source}")]
    Spawn {
        case: String,
        fork: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("fork #{fork} of `{case}` exited abnormally ({status}) without reporting")]
    ChildExited { case: String, fork: u32, status: String },

    #[error("fork #{fork} of `{case}` sent unreadable output: {source}")]
    Protocol {
        case: String,
        fork: u32,
        #[source]
        source: serde_json::Error,
    },

    #[error("fork #{fork} of `{case}` failed: {reason}")]
    ChildFailed { case: String, fork: u32, reason: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
