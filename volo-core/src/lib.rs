pub mod repository;
pub mod search;
pub mod source;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Store operation failed: {0}")]
    StoreError(String),
    #[error("Offer source failed: {0}")]
    SourceError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
