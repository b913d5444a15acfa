#![cfg_attr(test, allow(clippy::unwrap_used))]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The latest revision of a named, typed configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub name: String,
    #[serde(rename = "type")]
    pub config_type: String,
    pub version: u64,
    pub data: Value,
    /// Timestamp of version 1
    pub created_at: DateTime<Utc>,
    /// Timestamp of the revision carried in `version`
    pub updated_at: DateTime<Utc>,
}

/// One immutable snapshot of a configuration's data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigVersion {
    pub version: u64,
    pub data: Value,
    pub created_at: DateTime<Utc>,
}

/// Full revision history of a configuration, oldest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionsResponse {
    pub name: String,
    pub versions: Vec<ConfigVersion>,
}

/// A request field that is missing or out of range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateConfigRequest {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub config_type: String,
    pub data: Option<Value>,
}

impl CreateConfigRequest {
    pub fn new(name: impl Into<String>, config_type: impl Into<String>, data: Value) -> Self {
        Self {
            name: name.into(),
            config_type: config_type.into(),
            data: Some(data),
        }
    }

    /// Check that name, type and data are all present
    pub fn validate(&self) -> Result<(), FieldError> {
        if self.name.is_empty() {
            return Err(FieldError::new("name", "name is required"));
        }
        if self.config_type.is_empty() {
            return Err(FieldError::new("type", "type is required"));
        }
        if self.data.is_none() {
            return Err(FieldError::new("data", "data is required"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateConfigRequest {
    pub data: Option<Value>,
}

impl UpdateConfigRequest {
    pub fn new(data: Value) -> Self {
        Self { data: Some(data) }
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        match self.data {
            Some(_) => Ok(()),
            None => Err(FieldError::new("data", "data is required")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RollbackRequest {
    #[serde(default)]
    pub version: u64,
}

impl RollbackRequest {
    pub fn new(version: u64) -> Self {
        Self { version }
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        if self.version < 1 {
            return Err(FieldError::new("version", "version must be >= 1"));
        }
        Ok(())
    }
}

/// Response after a schema was registered under a type name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterSchemaResponse {
    #[serde(rename = "type")]
    pub config_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaTypesResponse {
    pub types: Vec<String>,
}

/// Counters describing the store contents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub total_configs: usize,
    pub total_versions: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearResponse {
    pub cleared: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub timestamp: DateTime<Utc>,
}

/// Error body returned for every failed request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable machine-readable kind, e.g. `config_not_found`
    pub code: String,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
