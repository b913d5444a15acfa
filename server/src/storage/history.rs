use chrono::{DateTime, Utc};
use serde_json::Value;
use shared_types::{ConfigVersion, Configuration};

/// Revision history of a single configuration.
///
/// Revisions are 1-indexed and contiguous: the revision at position `i`
/// always carries version `i + 1`.
#[derive(Debug, Clone)]
pub struct History {
    config_type: String,
    created_at: DateTime<Utc>,
    revisions: Vec<ConfigVersion>,
}

impl History {
    pub fn new(config_type: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            config_type: config_type.into(),
            created_at,
            revisions: Vec::new(),
        }
    }

    pub fn config_type(&self) -> &str {
        &self.config_type
    }

    pub fn current_version(&self) -> u64 {
        self.revisions.len() as u64
    }

    pub fn next_version_number(&self) -> u64 {
        self.current_version() + 1
    }

    /// Append `data` as the next revision and return the resulting
    /// configuration
    pub fn append(&mut self, name: &str, data: Value, now: DateTime<Utc>) -> Configuration {
        let revision = ConfigVersion {
            version: self.next_version_number(),
            data,
            created_at: now,
        };
        let config = self.to_configuration(name, &revision);
        self.revisions.push(revision);
        config
    }

    pub fn revision(&self, version: u64) -> Option<&ConfigVersion> {
        let index = usize::try_from(version.checked_sub(1)?).ok()?;
        self.revisions.get(index)
    }

    pub fn revisions(&self) -> &[ConfigVersion] {
        &self.revisions
    }

    /// The configuration at its highest revision; `None` while empty
    pub fn latest(&self, name: &str) -> Option<Configuration> {
        self.revisions
            .last()
            .map(|revision| self.to_configuration(name, revision))
    }

    fn to_configuration(&self, name: &str, revision: &ConfigVersion) -> Configuration {
        Configuration {
            name: name.to_string(),
            config_type: self.config_type.clone(),
            version: revision.version,
            data: revision.data.clone(),
            created_at: self.created_at,
            updated_at: revision.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_history_new() {
        let history = History::new("payment_config", Utc::now());
        assert_eq!(history.current_version(), 0);
        assert!(history.revisions().is_empty());
        assert!(history.latest("payments").is_none());
    }

    #[test]
    fn test_append_first_revision() {
        let now = Utc::now();
        let mut history = History::new("payment_config", now);
        let config = history.append("payments", json!({"enabled": true}), now);

        assert_eq!(config.version, 1);
        assert_eq!(config.config_type, "payment_config");
        assert_eq!(config.created_at, config.updated_at);
        assert_eq!(history.current_version(), 1);
    }

    #[test]
    fn test_append_multiple_revisions() {
        let created = Utc::now();
        let mut history = History::new("payment_config", created);
        history.append("payments", json!({"n": 1}), created);
        history.append("payments", json!({"n": 2}), Utc::now());
        let config = history.append("payments", json!({"n": 3}), Utc::now());

        assert_eq!(config.version, 3);
        assert_eq!(config.created_at, created);
        assert_eq!(config.data, json!({"n": 3}));

        let versions: Vec<u64> = history.revisions().iter().map(|r| r.version).collect();
        assert_eq!(versions, vec![1, 2, 3]);
    }

    #[test]
    fn test_next_version_number() {
        let now = Utc::now();
        let mut history = History::new("t", now);
        assert_eq!(history.next_version_number(), 1);

        history.append("n", json!({}), now);
        assert_eq!(history.next_version_number(), 2);

        history.append("n", json!({}), now);
        assert_eq!(history.next_version_number(), 3);
    }

    #[test]
    fn test_revision_lookup_bounds() {
        let now = Utc::now();
        let mut history = History::new("t", now);
        history.append("n", json!({"n": 1}), now);
        history.append("n", json!({"n": 2}), now);

        assert!(history.revision(0).is_none());
        assert_eq!(history.revision(1).map(|r| &r.data), Some(&json!({"n": 1})));
        assert_eq!(history.revision(2).map(|r| &r.data), Some(&json!({"n": 2})));
        assert!(history.revision(3).is_none());
        assert!(history.revision(u64::MAX).is_none());
    }

    #[test]
    fn test_revision_timestamp() {
        let before = Utc::now();
        let mut history = History::new("t", before);
        history.append("n", json!({}), Utc::now());
        let after = Utc::now();

        let revision = history.revision(1).unwrap();
        assert!(revision.created_at >= before);
        assert!(revision.created_at <= after);
    }
}
