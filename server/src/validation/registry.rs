use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::error::{SchemaViolations, ValidationError};
use super::schema::CompiledSchema;

pub const PAYMENT_CONFIG: &str = "payment_config";

/// Schema for the built-in `payment_config` type
pub fn payment_config_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "max_limit": {"type": "integer"},
            "enabled": {"type": "boolean"}
        },
        "required": ["max_limit", "enabled"],
        "additionalProperties": false
    })
}

/// Maps configuration type names to compiled schemas.
///
/// Lookups clone an `Arc` out of the lock, so documents are checked without
/// holding it and a concurrent re-registration never blocks on validation.
pub struct SchemaRegistry {
    schemas: RwLock<HashMap<String, Arc<CompiledSchema>>>,
}

impl SchemaRegistry {
    pub fn empty() -> Self {
        Self {
            schemas: RwLock::new(HashMap::new()),
        }
    }

    /// Registry with `payment_config` pre-registered
    pub fn with_builtin_schemas() -> Result<Self, ValidationError> {
        let payment = compile(PAYMENT_CONFIG, payment_config_schema())?;

        let mut schemas = HashMap::new();
        schemas.insert(PAYMENT_CONFIG.to_string(), Arc::new(payment));

        Ok(Self {
            schemas: RwLock::new(schemas),
        })
    }

    /// Compile `definition` and store it under `config_type`, replacing any
    /// schema previously registered for that type.
    pub async fn register_schema(
        &self,
        config_type: &str,
        definition: Value,
    ) -> Result<(), ValidationError> {
        let compiled = compile(config_type, definition)?;
        let replaced = self
            .schemas
            .write()
            .await
            .insert(config_type.to_string(), Arc::new(compiled))
            .is_some();

        info!(config_type, replaced, "Registered schema");
        Ok(())
    }

    pub async fn has_schema(&self, config_type: &str) -> bool {
        self.schemas.read().await.contains_key(config_type)
    }

    pub async fn schema_definition(&self, config_type: &str) -> Option<Value> {
        self.lookup(config_type)
            .await
            .map(|schema| schema.definition().clone())
    }

    /// Registered type names, sorted
    pub async fn types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.schemas.read().await.keys().cloned().collect();
        types.sort();
        types
    }

    /// Check `data` against the schema registered for `config_type`
    pub async fn validate(&self, config_type: &str, data: &Value) -> Result<(), ValidationError> {
        let schema = self
            .lookup(config_type)
            .await
            .ok_or_else(|| ValidationError::UnknownType(config_type.to_string()))?;

        let violations = schema.check(data);
        if violations.is_empty() {
            Ok(())
        } else {
            debug!(config_type, count = violations.len(), "Document failed schema");
            Err(ValidationError::Schema(SchemaViolations::new(violations)))
        }
    }

    /// Register every `<type>.json` file found in `dir`; the file stem is
    /// the type name. Returns the registered types.
    pub async fn register_dir(&self, dir: &Path) -> Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(dir)
            .await
            .with_context(|| format!("Failed to read schema directory {}", dir.display()))?;

        let mut registered = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(config_type) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };

            let bytes = tokio::fs::read(&path)
                .await
                .with_context(|| format!("Failed to read schema file {}", path.display()))?;
            let definition: Value = serde_json::from_slice(&bytes)
                .with_context(|| format!("Invalid JSON in schema file {}", path.display()))?;

            self.register_schema(config_type, definition).await?;
            registered.push(config_type.to_string());
        }

        registered.sort();
        Ok(registered)
    }

    async fn lookup(&self, config_type: &str) -> Option<Arc<CompiledSchema>> {
        self.schemas.read().await.get(config_type).cloned()
    }
}

fn compile(config_type: &str, definition: Value) -> Result<CompiledSchema, ValidationError> {
    CompiledSchema::compile(definition).map_err(|reason| ValidationError::SchemaCompile {
        config_type: config_type.to_string(),
        reason,
    })
}
