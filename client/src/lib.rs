#![cfg_attr(test, allow(clippy::unwrap_used))]

use anyhow::{Context, Result};
use reqwest::{Client as ReqwestClient, RequestBuilder, Response, StatusCode, Url};
use serde_json::Value;
use shared_types::{
    ClearResponse, Configuration, CreateConfigRequest, ErrorResponse, RegisterSchemaResponse,
    RollbackRequest, SchemaTypesResponse, StoreStats, UpdateConfigRequest, VersionsResponse,
};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// A non-success response from the config store.
///
/// Returned inside [`anyhow::Error`]; recover it with
/// `err.downcast_ref::<ApiFailure>()`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{status}: {code}: {error}")]
pub struct ApiFailure {
    pub status: StatusCode,
    pub code: String,
    pub error: String,
    pub details: Option<String>,
}

/// Client for interacting with the config store service
pub struct ConfigClient {
    client: ReqwestClient,
    base_url: String,
}

impl ConfigClient {
    /// Create a new client instance
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = ReqwestClient::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a configuration at version 1
    pub async fn create_config(
        &self,
        name: &str,
        config_type: &str,
        data: Value,
    ) -> Result<Configuration> {
        let request = CreateConfigRequest::new(name, config_type, data);
        let url = self.url(&["api", "v1", "configs"])?;
        send(self.client.post(url).json(&request)).await
    }

    /// Get the latest revision of a configuration
    pub async fn get_config(&self, name: &str) -> Result<Configuration> {
        let url = self.url(&["api", "v1", "configs", name])?;
        send(self.client.get(url)).await
    }

    /// Get a specific revision of a configuration
    pub async fn get_config_version(&self, name: &str, version: u64) -> Result<Configuration> {
        let url = self.url(&["api", "v1", "configs", name])?;
        send(
            self.client
                .get(url)
                .query(&[("version", version.to_string())]),
        )
        .await
    }

    /// Append a new revision with the given data
    pub async fn update_config(&self, name: &str, data: Value) -> Result<Configuration> {
        let url = self.url(&["api", "v1", "configs", name])?;
        send(self.client.put(url).json(&UpdateConfigRequest::new(data))).await
    }

    /// Append a new revision carrying the data of `version`
    pub async fn rollback_config(&self, name: &str, version: u64) -> Result<Configuration> {
        let url = self.url(&["api", "v1", "configs", name, "rollback"])?;
        send(self.client.post(url).json(&RollbackRequest::new(version))).await
    }

    /// List all revisions of a configuration, oldest first
    pub async fn list_versions(&self, name: &str) -> Result<VersionsResponse> {
        let url = self.url(&["api", "v1", "configs", name, "versions"])?;
        send(self.client.get(url)).await
    }

    /// Register or replace the schema for a configuration type
    pub async fn register_schema(&self, config_type: &str, definition: &Value) -> Result<()> {
        let url = self.url(&["api", "v1", "schemas", config_type])?;
        let _: RegisterSchemaResponse = send(self.client.put(url).json(definition)).await?;
        Ok(())
    }

    /// Get the schema registered for a configuration type
    pub async fn get_schema(&self, config_type: &str) -> Result<Value> {
        let url = self.url(&["api", "v1", "schemas", config_type])?;
        send(self.client.get(url)).await
    }

    /// List every registered configuration type
    pub async fn list_schema_types(&self) -> Result<Vec<String>> {
        let url = self.url(&["api", "v1", "schemas"])?;
        let response: SchemaTypesResponse = send(self.client.get(url)).await?;
        Ok(response.types)
    }

    pub async fn stats(&self) -> Result<StoreStats> {
        let url = self.url(&["api", "v1", "stats"])?;
        send(self.client.get(url)).await
    }

    /// Remove every configuration, returning how many were removed
    pub async fn clear(&self) -> Result<usize> {
        let url = self.url(&["api", "v1", "configs"])?;
        let response: ClearResponse = send(self.client.delete(url)).await?;
        Ok(response.cleared)
    }

    /// Check if the service is healthy
    pub async fn health_check(&self) -> Result<bool> {
        let url = self.url(&["health"])?;

        let response = self.client.get(url).send().await?;

        Ok(response.status() == StatusCode::OK)
    }

    /// Join percent-encoded path segments onto the base URL
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .with_context(|| format!("Invalid base URL: {}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|()| anyhow::anyhow!("Base URL cannot carry a path: {}", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

async fn send<T: serde::de::DeserializeOwned>(request: RequestBuilder) -> Result<T> {
    let response = request.send().await?;
    debug!(status = %response.status(), url = %response.url(), "Received response");

    let response = check(response).await?;
    Ok(response.json().await?)
}

async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let failure = match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(err) => ApiFailure {
            status,
            code: err.code,
            error: err.error,
            details: err.details,
        },
        Err(_) => ApiFailure {
            status,
            code: "unexpected_response".to_string(),
            error: body,
            details: None,
        },
    };
    Err(failure.into())
}
