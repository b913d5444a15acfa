use async_trait::async_trait;
use serde_json::Value;
use shared_types::{ConfigVersion, Configuration, StoreStats};

use super::error::StorageResult;

/// Append-only, versioned storage of named configurations.
///
/// Document data moves into the store by value and every read returns an
/// owned copy, so callers never share state with the stored revisions.
#[async_trait]
pub trait ConfigStorage: Send + Sync {
    /// Establish revision 1 of `name`.
    ///
    /// # Errors
    /// Returns `StorageError::AlreadyExists` if `name` has any revisions
    async fn create(
        &self,
        name: &str,
        config_type: &str,
        data: Value,
    ) -> StorageResult<Configuration>;

    async fn get_latest(&self, name: &str) -> StorageResult<Configuration>;

    /// Append a revision numbered one past the current highest. The type
    /// recorded at creation is carried over unchanged.
    async fn update(&self, name: &str, data: Value) -> StorageResult<Configuration>;

    async fn get_revision(&self, name: &str, version: u64) -> StorageResult<ConfigVersion>;

    /// All revisions in ascending version order
    async fn list_revisions(&self, name: &str) -> StorageResult<Vec<ConfigVersion>>;

    async fn exists(&self, name: &str) -> bool;

    /// Drop every configuration and revision; returns how many
    /// configurations were removed
    async fn clear(&self) -> usize;

    async fn stats(&self) -> StoreStats;
}
