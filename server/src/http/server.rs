use anyhow::Result;
use axum::{
    Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::{any::Any, sync::Arc, time::Duration};
use tower_http::{
    catch_panic::CatchPanicLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use tracing::{info, warn};

use super::{error::ApiError, handlers, state::AppState};
use crate::config::ServerConfig;
use crate::service::ConfigService;

/// Build the API router around a service instance
pub fn build_router(service: Arc<ConfigService>, request_timeout: Duration) -> Router {
    let app_state = Arc::new(AppState { service });

    let api = Router::new()
        // Health check
        .route(
            "/health",
            get(handlers::health_check).fallback(handlers::method_not_allowed),
        )
        // Config operations
        .route(
            "/api/v1/configs",
            post(handlers::create_config)
                .delete(handlers::clear_configs)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/v1/configs/:name",
            get(handlers::get_config)
                .put(handlers::update_config)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/v1/configs/:name/versions",
            get(handlers::list_versions).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/v1/configs/:name/rollback",
            post(handlers::rollback_config).fallback(handlers::method_not_allowed),
        )
        // Schema registry
        .route(
            "/api/v1/schemas",
            get(handlers::list_schema_types).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/v1/schemas/:type",
            get(handlers::get_schema)
                .put(handlers::register_schema)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/v1/stats",
            get(handlers::stats).fallback(handlers::method_not_allowed),
        )
        .fallback(handlers::route_not_found)
        // Add state
        .with_state(app_state);

    with_middleware(api, request_timeout)
}

/// Wrap routes with the shared middleware stack. Timeouts and panics are
/// rendered as `ErrorResponse` bodies like every other failure.
pub(super) fn with_middleware(router: Router, request_timeout: Duration) -> Router {
    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(middleware::map_response(timeout_body))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn start_server(service: Arc<ConfigService>, config: &ServerConfig) -> Result<()> {
    let app = build_router(service, config.request_timeout);

    info!("Server listening on {}", config.bind_address);

    // Run the server
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Handlers never answer 408 themselves, so one here came from the timeout layer
async fn timeout_body(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        ApiError::Timeout.into_response()
    } else {
        response
    }
}

fn panic_response(_panic: Box<dyn Any + Send + 'static>) -> Response {
    ApiError::Internal("request handler panicked".to_string()).into_response()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!("Failed to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
