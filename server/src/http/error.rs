use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use shared_types::ErrorResponse;
use tracing::{error, warn};

use crate::service::ServiceError;

#[derive(Debug)]
pub enum ApiError {
    /// Malformed body or query parameter, rejected before the service runs
    BadRequest(String),
    /// No route matches the request path
    RouteNotFound(String),
    MethodNotAllowed(Method),
    Timeout,
    Service(ServiceError),
    /// Logged server-side; never echoed to the client
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::RouteNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Service(err) => match err {
                ServiceError::InvalidRequest { .. }
                | ServiceError::UnknownConfigType(_)
                | ServiceError::SchemaValidation { .. }
                | ServiceError::SchemaCompile { .. } => StatusCode::BAD_REQUEST,
                ServiceError::ConfigNotFound(_) | ServiceError::VersionNotFound { .. } => {
                    StatusCode::NOT_FOUND
                }
                ServiceError::ConfigAlreadyExists(_) => StatusCode::CONFLICT,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            ApiError::BadRequest(msg) => {
                warn!("Bad request: {}", msg);
                ErrorResponse {
                    code: "invalid_request".to_string(),
                    error: "Invalid request format".to_string(),
                    details: Some(msg),
                }
            }
            ApiError::RouteNotFound(path) => ErrorResponse {
                code: "not_found".to_string(),
                error: "Resource not found".to_string(),
                details: Some(path),
            },
            ApiError::MethodNotAllowed(method) => ErrorResponse {
                code: "method_not_allowed".to_string(),
                error: "Method not allowed".to_string(),
                details: Some(method.to_string()),
            },
            ApiError::Timeout => {
                warn!("Request timed out");
                ErrorResponse {
                    code: "request_timeout".to_string(),
                    error: "Request timed out".to_string(),
                    details: None,
                }
            }
            ApiError::Internal(msg) => {
                error!("Internal error: {}", msg);
                ErrorResponse {
                    code: "internal_error".to_string(),
                    error: "Internal server error".to_string(),
                    details: None,
                }
            }
            ApiError::Service(err) => {
                warn!(code = err.code(), "Request failed: {}", err);
                let (error, details) = match &err {
                    ServiceError::SchemaValidation { details, .. } => {
                        ("Schema validation failed".to_string(), Some(details.clone()))
                    }
                    ServiceError::SchemaCompile { reason, .. } => {
                        ("Invalid schema definition".to_string(), Some(reason.clone()))
                    }
                    other => (other.to_string(), None),
                };
                ErrorResponse {
                    code: err.code().to_string(),
                    error,
                    details,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError::Service(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{FieldViolation, SchemaViolations};
    use axum::body::to_bytes;

    async fn render(error: ApiError) -> (StatusCode, ErrorResponse) {
        let response = error.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_api_error_not_found() {
        let (status, body) =
            render(ServiceError::ConfigNotFound("payments".to_string()).into()).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.code, "config_not_found");
        assert_eq!(body.error, "configuration not found: payments");
        assert_eq!(body.details, None);
    }

    #[tokio::test]
    async fn test_api_error_version_not_found() {
        let (status, body) = render(
            ServiceError::VersionNotFound {
                name: "payments".to_string(),
                version: 7,
            }
            .into(),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.code, "version_not_found");
    }

    #[tokio::test]
    async fn test_api_error_conflict() {
        let (status, body) =
            render(ServiceError::ConfigAlreadyExists("payments".to_string()).into()).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.code, "config_already_exists");
    }

    #[tokio::test]
    async fn test_api_error_schema_validation() {
        let violations = SchemaViolations::new(vec![
            FieldViolation::new("max_limit", "\"x\" is not of type \"integer\""),
            FieldViolation::new("(root)", "\"enabled\" is a required property"),
        ]);
        let err = ServiceError::SchemaValidation {
            details: violations.to_string(),
            violations,
        };
        let (status, body) = render(err.into()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "schema_validation_failed");
        assert_eq!(body.error, "Schema validation failed");
        let details = body.details.unwrap();
        assert!(details.contains("max_limit"));
        assert!(details.contains("enabled"));
    }

    #[tokio::test]
    async fn test_api_error_bad_request() {
        let (status, body) = render(ApiError::BadRequest("Invalid input".to_string())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "invalid_request");
        assert_eq!(body.details, Some("Invalid input".to_string()));
    }

    #[tokio::test]
    async fn test_api_error_transport_kinds() {
        let (status, body) = render(ApiError::RouteNotFound("/nope".to_string())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.code, "not_found");
        assert_eq!(body.details, Some("/nope".to_string()));

        let (status, body) = render(ApiError::MethodNotAllowed(Method::PATCH)).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body.code, "method_not_allowed");
        assert_eq!(body.details, Some("PATCH".to_string()));

        let (status, body) = render(ApiError::Timeout).await;
        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert_eq!(body.code, "request_timeout");
    }

    #[tokio::test]
    async fn test_api_error_internal_hides_details() {
        let (status, body) =
            render(ApiError::Internal("lock poisoned at 0x1234".to_string())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, "internal_error");
        assert_eq!(body.error, "Internal server error");
        assert_eq!(body.details, None);
    }
}
