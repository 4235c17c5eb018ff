use thiserror::Error;

use shopforge_generate::GenerationError;

/// Errors emitted by the evaluation engine.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),
    #[error("missing input: {0}")]
    MissingInput(String),
    #[error("validation failed with {0} violation(s)")]
    Violations(u64),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<GenerationError> for EvalError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::MissingInput(message) => EvalError::MissingInput(message),
            GenerationError::Io(err) => EvalError::Io(err),
            GenerationError::Csv(err) => EvalError::Csv(err),
            GenerationError::Json(err) => EvalError::Json(err),
            other => EvalError::InvalidDataset(other.to_string()),
        }
    }
}
