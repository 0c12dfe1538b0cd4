use fauxrest_core::AppError;
use thiserror::Error;

/// Errors raised by dataset reads and writes.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Resource '{0}' not found")]
    ResourceNotFound(String),

    #[error("{resource}/{id} not found")]
    RecordNotFound { resource: String, id: String },

    #[error("User '{0}' not found")]
    UserNotFound(String),

    #[error("{resource} already contains a record with id {id}")]
    DuplicateId { resource: String, id: String },

    #[error("{0}")]
    InvalidBody(String),

    #[error("'{0}' is a singular resource")]
    NotACollection(String),

    #[error("'{0}' is a collection")]
    NotASingular(String),

    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("Dataset I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ResourceNotFound(_)
            | StoreError::RecordNotFound { .. }
            | StoreError::UserNotFound(_) => AppError::not_found(err),
            StoreError::DuplicateId { .. } => AppError::conflict(err),
            StoreError::InvalidBody(_) => AppError::bad_request(err),
            StoreError::NotACollection(_) | StoreError::NotASingular(_) => {
                AppError::method_not_allowed(err)
            }
            StoreError::InvalidDataset(_)
            | StoreError::Io(_)
            | StoreError::Serialization(_)
            | StoreError::Hashing(_) => AppError::internal(err),
        }
    }
}
