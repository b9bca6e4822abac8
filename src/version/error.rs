use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Rate limited: retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Repository not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintError {
    #[error("constraint is empty")]
    Empty,

    #[error("invalid version `{0}`")]
    InvalidVersion(String),

    #[error("operator `{0}` is missing a version")]
    DanglingOperator(String),

    #[error("empty comparator set in `{0}`")]
    EmptySet(String),
}
