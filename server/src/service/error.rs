use shared_types::FieldError;
use thiserror::Error;

use crate::storage::StorageError;
use crate::validation::{SchemaViolations, ValidationError};

/// Every failure the service reports, one variant per kind
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{message}")]
    InvalidRequest { field: String, message: String },

    #[error("unknown config type: {0}")]
    UnknownConfigType(String),

    #[error("schema validation failed: {details}")]
    SchemaValidation {
        details: String,
        violations: SchemaViolations,
    },

    #[error("configuration not found: {0}")]
    ConfigNotFound(String),

    #[error("configuration already exists: {0}")]
    ConfigAlreadyExists(String),

    #[error("version {version} not found for configuration {name}")]
    VersionNotFound { name: String, version: u64 },

    #[error("failed to compile schema for {config_type}: {reason}")]
    SchemaCompile { config_type: String, reason: String },
}

impl ServiceError {
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Stable machine-readable code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest { .. } => "invalid_request",
            Self::UnknownConfigType(_) => "unknown_config_type",
            Self::SchemaValidation { .. } => "schema_validation_failed",
            Self::ConfigNotFound(_) => "config_not_found",
            Self::ConfigAlreadyExists(_) => "config_already_exists",
            Self::VersionNotFound { .. } => "version_not_found",
            Self::SchemaCompile { .. } => "schema_compile_error",
        }
    }
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(name) => Self::ConfigNotFound(name),
            StorageError::AlreadyExists(name) => Self::ConfigAlreadyExists(name),
            StorageError::VersionNotFound { name, version } => {
                Self::VersionNotFound { name, version }
            }
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::UnknownType(config_type) => Self::UnknownConfigType(config_type),
            ValidationError::Schema(violations) => Self::SchemaValidation {
                details: violations.to_string(),
                violations,
            },
            ValidationError::SchemaCompile {
                config_type,
                reason,
            } => Self::SchemaCompile {
                config_type,
                reason,
            },
        }
    }
}

impl From<FieldError> for ServiceError {
    fn from(err: FieldError) -> Self {
        Self::InvalidRequest {
            field: err.field.to_string(),
            message: err.message,
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
