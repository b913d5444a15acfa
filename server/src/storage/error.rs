use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("configuration not found: {0}")]
    NotFound(String),

    #[error("configuration already exists: {0}")]
    AlreadyExists(String),

    #[error("version {version} not found for configuration {name}")]
    VersionNotFound { name: String, version: u64 },
}

pub type StorageResult<T> = Result<T, StorageError>;
