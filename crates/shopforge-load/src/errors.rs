use thiserror::Error;

use shopforge_generate::GenerationError;

/// Errors emitted while loading or querying the database.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("missing input: {0}")]
    MissingInput(String),
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),
    #[error(transparent)]
    Core(#[from] shopforge_core::Error),
    #[error("dataset error: {0}")]
    Dataset(String),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<GenerationError> for LoadError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::MissingInput(message) => LoadError::MissingInput(message),
            GenerationError::Io(err) => LoadError::Io(err),
            other => LoadError::Dataset(other.to_string()),
        }
    }
}
