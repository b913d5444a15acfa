use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use shared_types::{ConfigVersion, Configuration, StoreStats};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tokio::sync::RwLock;
use tracing::debug;

use super::error::{StorageError, StorageResult};
use super::history::History;
use super::traits::ConfigStorage;

/// Process-lifetime store guarded by a single readers-writer lock.
///
/// Every mutation computes the next version number and commits the new
/// revision under one write guard, so writers on the same name are totally
/// ordered and never share a version number.
#[derive(Default)]
pub struct InMemoryStore {
    configs: RwLock<HashMap<String, History>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConfigStorage for InMemoryStore {
    async fn create(
        &self,
        name: &str,
        config_type: &str,
        data: Value,
    ) -> StorageResult<Configuration> {
        let mut configs = self.configs.write().await;

        match configs.entry(name.to_string()) {
            Entry::Occupied(_) => Err(StorageError::AlreadyExists(name.to_string())),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let history = slot.insert(History::new(config_type, now));
                let config = history.append(name, data, now);
                debug!(name, config_type, "Created revision 1");
                Ok(config)
            }
        }
    }

    async fn get_latest(&self, name: &str) -> StorageResult<Configuration> {
        let configs = self.configs.read().await;
        configs
            .get(name)
            .and_then(|history| history.latest(name))
            .ok_or_else(|| StorageError::NotFound(name.to_string()))
    }

    async fn update(&self, name: &str, data: Value) -> StorageResult<Configuration> {
        let mut configs = self.configs.write().await;

        let history = configs
            .get_mut(name)
            .ok_or_else(|| StorageError::NotFound(name.to_string()))?;
        let config = history.append(name, data, Utc::now());
        debug!(name, version = config.version, "Appended revision");
        Ok(config)
    }

    async fn get_revision(&self, name: &str, version: u64) -> StorageResult<ConfigVersion> {
        let configs = self.configs.read().await;

        let history = configs
            .get(name)
            .ok_or_else(|| StorageError::NotFound(name.to_string()))?;
        history
            .revision(version)
            .cloned()
            .ok_or_else(|| StorageError::VersionNotFound {
                name: name.to_string(),
                version,
            })
    }

    async fn list_revisions(&self, name: &str) -> StorageResult<Vec<ConfigVersion>> {
        let configs = self.configs.read().await;
        configs
            .get(name)
            .map(|history| history.revisions().to_vec())
            .ok_or_else(|| StorageError::NotFound(name.to_string()))
    }

    async fn exists(&self, name: &str) -> bool {
        self.configs.read().await.contains_key(name)
    }

    async fn clear(&self) -> usize {
        let mut configs = self.configs.write().await;
        let removed = configs.len();
        configs.clear();
        removed
    }

    async fn stats(&self) -> StoreStats {
        let configs = self.configs.read().await;
        StoreStats {
            total_configs: configs.len(),
            total_versions: configs.values().map(|h| h.revisions().len()).sum(),
        }
    }
}
