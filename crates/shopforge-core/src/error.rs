use thiserror::Error;

/// Core error type shared across shopforge crates.
#[derive(Debug, Error)]
pub enum Error {
    /// Generated rows broke a dataset invariant.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
    /// A currency value could not be parsed.
    #[error("invalid money value '{0}'")]
    InvalidMoney(String),
    /// The table catalog is internally inconsistent.
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),
}

/// Convenience alias for results returned by shopforge crates.
pub type Result<T> = std::result::Result<T, Error>;
