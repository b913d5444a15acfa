use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{Method, StatusCode, Uri},
};
use serde_json::Value;
use shared_types::{
    ClearResponse, Configuration, CreateConfigRequest, HealthResponse, RegisterSchemaResponse,
    RollbackRequest, SchemaTypesResponse, StoreStats, UpdateConfigRequest, VersionsResponse,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    dto::VersionQuery,
    error::{ApiError, ApiResult},
    state::AppState,
};

pub const SERVICE_NAME: &str = "config-store";

/// POST /api/v1/configs
/// Create a configuration at version 1
#[instrument(skip(state, payload))]
pub async fn create_config(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateConfigRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Configuration>)> {
    let Json(request) = payload?;
    info!("Creating config: {}", request.name);

    let config = state.service.create_config(request).await?;
    Ok((StatusCode::CREATED, Json(config)))
}

/// GET /api/v1/configs/:name
/// Get the latest configuration, or a specific revision with `?version=N`
#[instrument(skip(state))]
pub async fn get_config(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<VersionQuery>, QueryRejection>,
) -> ApiResult<Json<Configuration>> {
    let Path(name) = path?;
    let Query(query) = query?;
    let version = query.requested_version().map_err(ApiError::BadRequest)?;
    info!("Getting config: {} @ {:?}", name, version);

    let config = state.service.get_config(&name, version).await?;
    Ok(Json(config))
}

/// PUT /api/v1/configs/:name
/// Append a new revision with the given data
#[instrument(skip(state, payload))]
pub async fn update_config(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdateConfigRequest>, JsonRejection>,
) -> ApiResult<Json<Configuration>> {
    let Path(name) = path?;
    let Json(request) = payload?;
    info!("Updating config: {}", name);

    let config = state.service.update_config(&name, request).await?;
    Ok(Json(config))
}

/// POST /api/v1/configs/:name/rollback
/// Append a new revision carrying an earlier revision's data
#[instrument(skip(state, payload))]
pub async fn rollback_config(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<RollbackRequest>, JsonRejection>,
) -> ApiResult<Json<Configuration>> {
    let Path(name) = path?;
    let Json(request) = payload?;
    info!("Rolling back config: {} to v{}", name, request.version);

    let config = state.service.rollback_config(&name, request).await?;
    Ok(Json(config))
}

/// GET /api/v1/configs/:name/versions
/// List every revision of a configuration
#[instrument(skip(state))]
pub async fn list_versions(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<VersionsResponse>> {
    let Path(name) = path?;
    info!("Listing versions for: {}", name);

    let versions = state.service.list_versions(&name).await?;
    Ok(Json(versions))
}

/// DELETE /api/v1/configs
/// Remove every configuration and its history
#[instrument(skip(state))]
pub async fn clear_configs(State(state): State<Arc<AppState>>) -> Json<ClearResponse> {
    let cleared = state.service.clear().await;
    Json(ClearResponse { cleared })
}

/// PUT /api/v1/schemas/:type
/// Register or replace the schema for a configuration type
#[instrument(skip(state, payload))]
pub async fn register_schema(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<RegisterSchemaResponse>> {
    let Path(config_type) = path?;
    let Json(definition) = payload?;
    info!("Registering schema: {}", config_type);

    state
        .service
        .register_schema(&config_type, definition)
        .await?;
    Ok(Json(RegisterSchemaResponse { config_type }))
}

/// GET /api/v1/schemas
pub async fn list_schema_types(State(state): State<Arc<AppState>>) -> Json<SchemaTypesResponse> {
    Json(SchemaTypesResponse {
        types: state.service.schema_types().await,
    })
}

/// GET /api/v1/schemas/:type
pub async fn get_schema(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let Path(config_type) = path?;
    let definition = state.service.schema_definition(&config_type).await?;
    Ok(Json(definition))
}

/// GET /api/v1/stats
pub async fn stats(State(state): State<Arc<AppState>>) -> Json<StoreStats> {
    Json(state.service.stats().await)
}

/// Fallback for paths no route matches
pub async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::RouteNotFound(uri.path().to_string())
}

/// Fallback for a known path called with an unsupported method
pub async fn method_not_allowed(method: Method) -> ApiError {
    ApiError::MethodNotAllowed(method)
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "running".to_string(),
        service: SERVICE_NAME.to_string(),
        timestamp: chrono::Utc::now(),
    })
}
