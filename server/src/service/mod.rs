mod error;


use serde_json::Value;
use shared_types::{
    Configuration, CreateConfigRequest, RollbackRequest, StoreStats, UpdateConfigRequest,
    VersionsResponse,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::storage::ConfigStorage;
use crate::validation::{SchemaRegistry, ValidationError};

pub use error::{ServiceError, ServiceResult};

/// Sequences schema validation and storage for configuration requests.
///
/// Both collaborators are injected; the service holds no state of its own.
pub struct ConfigService {
    store: Arc<dyn ConfigStorage>,
    schemas: Arc<SchemaRegistry>,
}

impl ConfigService {
    pub fn new(store: Arc<dyn ConfigStorage>, schemas: Arc<SchemaRegistry>) -> Self {
        Self { store, schemas }
    }

    #[instrument(
        skip(self, request),
        fields(name = %request.name, config_type = %request.config_type)
    )]
    pub async fn create_config(
        &self,
        request: CreateConfigRequest,
    ) -> ServiceResult<Configuration> {
        request.validate()?;
        let CreateConfigRequest {
            name,
            config_type,
            data,
        } = request;
        let data = data.ok_or_else(|| ServiceError::invalid("data", "data is required"))?;

        if !self.schemas.has_schema(&config_type).await {
            warn!("Rejected config with unknown type");
            return Err(ServiceError::UnknownConfigType(config_type));
        }
        self.check_document(&config_type, &data).await?;

        let config = self.store.create(&name, &config_type, data).await?;
        info!(version = config.version, "Created config");
        Ok(config)
    }

    /// Latest revision, or the revision `version` when given. A historical
    /// revision is reported with the configuration's type and original
    /// creation time, and its own timestamp as `updated_at`.
    #[instrument(skip(self))]
    pub async fn get_config(
        &self,
        name: &str,
        version: Option<u64>,
    ) -> ServiceResult<Configuration> {
        require_name(name)?;

        let Some(version) = version else {
            return Ok(self.store.get_latest(name).await?);
        };

        let revision = self.store.get_revision(name, version).await?;
        let latest = self.store.get_latest(name).await?;

        Ok(Configuration {
            name: latest.name,
            config_type: latest.config_type,
            version: revision.version,
            data: revision.data,
            created_at: latest.created_at,
            updated_at: revision.created_at,
        })
    }

    #[instrument(skip(self, request))]
    pub async fn update_config(
        &self,
        name: &str,
        request: UpdateConfigRequest,
    ) -> ServiceResult<Configuration> {
        require_name(name)?;
        request.validate()?;
        let data = request
            .data
            .ok_or_else(|| ServiceError::invalid("data", "data is required"))?;

        let existing = self.store.get_latest(name).await?;
        self.check_document(&existing.config_type, &data).await?;

        let config = self.store.update(name, data).await?;
        info!(version = config.version, "Updated config");
        Ok(config)
    }

    /// Append a new revision carrying the data of `request.version`.
    ///
    /// The historical data is re-checked against the schema currently
    /// registered for the configuration's type; history is never rewritten.
    #[instrument(skip(self))]
    pub async fn rollback_config(
        &self,
        name: &str,
        request: RollbackRequest,
    ) -> ServiceResult<Configuration> {
        require_name(name)?;
        request.validate()?;

        let target = self.store.get_revision(name, request.version).await?;
        let current = self.store.get_latest(name).await?;

        match self.schemas.validate(&current.config_type, &target.data).await {
            Ok(()) => {}
            Err(ValidationError::Schema(violations)) => {
                warn!(
                    target_version = target.version,
                    "Rollback target fails current schema"
                );
                return Err(ServiceError::SchemaValidation {
                    details: format!(
                        "target version data is incompatible with current schema: {violations}"
                    ),
                    violations,
                });
            }
            Err(err) => return Err(err.into()),
        }

        let config = self.store.update(name, target.data).await?;
        info!(
            from_version = target.version,
            version = config.version,
            "Rolled back config"
        );
        Ok(config)
    }

    #[instrument(skip(self))]
    pub async fn list_versions(&self, name: &str) -> ServiceResult<VersionsResponse> {
        require_name(name)?;

        let versions = self.store.list_revisions(name).await?;
        Ok(VersionsResponse {
            name: name.to_string(),
            versions,
        })
    }

    #[instrument(skip(self, definition))]
    pub async fn register_schema(
        &self,
        config_type: &str,
        definition: Value,
    ) -> ServiceResult<()> {
        if config_type.is_empty() {
            return Err(ServiceError::invalid("type", "type is required"));
        }
        Ok(self.schemas.register_schema(config_type, definition).await?)
    }

    pub async fn schema_definition(&self, config_type: &str) -> ServiceResult<Value> {
        self.schemas
            .schema_definition(config_type)
            .await
            .ok_or_else(|| ServiceError::UnknownConfigType(config_type.to_string()))
    }

    pub async fn schema_types(&self) -> Vec<String> {
        self.schemas.types().await
    }

    pub async fn stats(&self) -> StoreStats {
        self.store.stats().await
    }

    /// Remove every configuration and its history
    #[instrument(skip(self))]
    pub async fn clear(&self) -> usize {
        let cleared = self.store.clear().await;
        warn!(cleared, "Cleared all configurations");
        cleared
    }

    async fn check_document(&self, config_type: &str, data: &Value) -> ServiceResult<()> {
        self.schemas
            .validate(config_type, data)
            .await
            .inspect_err(|err| warn!(config_type, error = %err, "Document rejected"))
            .map_err(ServiceError::from)
    }
}

fn require_name(name: &str) -> ServiceResult<()> {
    if name.is_empty() {
        return Err(ServiceError::invalid("name", "name is required"));
    }
    Ok(())
}
