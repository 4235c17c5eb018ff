//! Per-invocation run registry.
//!
//! Every `shopforge` command gets `<runs_dir>/<timestamp>__run_<uuid>/` with
//! the command's effective options in `config.json` and its tracing events
//! in `logs.ndjson`.

mod logging;
mod run;

pub use logging::init_run_logging;
pub use run::{RunContext, RunPaths, start_run, write_json};

use thiserror::Error;

/// Failures while writing a registry entry or installing its log layers.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("logging error: {0}")]
    Logging(String),
}

/// Result type for registry operations.
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
