use serde::{Deserialize, Serialize};

/// Query string accepted by `GET /api/v1/configs/{name}`
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct VersionQuery {
    pub version: Option<String>,
}

impl VersionQuery {
    /// The requested revision, if any. Must be a positive integer.
    pub fn requested_version(&self) -> Result<Option<u64>, String> {
        match self.version.as_deref() {
            None | Some("") => Ok(None),
            Some(raw) => match raw.parse::<u64>() {
                Ok(version) if version >= 1 => Ok(Some(version)),
                _ => Err("version must be a positive integer".to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(version: Option<&str>) -> VersionQuery {
        VersionQuery {
            version: version.map(str::to_string),
        }
    }

    #[test]
    fn test_requested_version() {
        assert_eq!(query(None).requested_version(), Ok(None));
        assert_eq!(query(Some("")).requested_version(), Ok(None));
        assert_eq!(query(Some("3")).requested_version(), Ok(Some(3)));
    }

    #[test]
    fn test_requested_version_rejects_non_positive() {
        for raw in ["0", "-1", "abc", "1.5"] {
            assert!(query(Some(raw)).requested_version().is_err(), "{raw}");
        }
    }
}
