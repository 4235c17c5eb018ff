use thiserror::Error;

use crate::model::GenerationReport;

/// Errors emitted by the generation engine.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("unique values exhausted for '{column}' after {attempts} attempts")]
    Exhausted { column: String, attempts: u32 },
    #[error("missing input: {0}")]
    MissingInput(String),
    #[error(transparent)]
    Core(#[from] shopforge_core::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("generation failed")]
    Failed(Box<GenerationReport>),
}
