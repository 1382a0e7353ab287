use thiserror::Error;

#[derive(Error, Debug)]
pub enum FunnelError {
    #[error("Invalid limit {0}: must be zero or greater")]
    InvalidLimit(i64),

    #[error("Invalid strategy record #{index}: {details}")]
    InvalidRecord { index: usize, details: String },

    #[error("Invalid stage catalog: {0}")]
    InvalidCatalog(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FunnelError>;

/// Converts a caller-supplied limit into a truncation length.
pub(crate) fn validate_limit(limit: i64) -> Result<usize> {
    usize::try_from(limit).map_err(|_| FunnelError::InvalidLimit(limit))
}
