use anyhow::Result;
use server::{
    config::ServerConfig, http, service::ConfigService, storage::InMemoryStore,
    validation::SchemaRegistry,
};
use std::sync::Arc;
use tracing::{Level, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up a local .env before reading configuration
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()),
        )
        .init();

    info!("Starting config store server");

    let config = ServerConfig::from_env()?;

    // Initialize schema registry
    let schemas = SchemaRegistry::with_builtin_schemas()?;
    if let Some(dir) = &config.schema_dir {
        let registered = schemas.register_dir(dir).await?;
        info!("Registered {} schema(s) from {}", registered.len(), dir.display());
    }
    info!("Known config types: {:?}", schemas.types().await);

    // Initialize storage and service
    let store: Arc<dyn server::storage::ConfigStorage> = Arc::new(InMemoryStore::new());
    let service = Arc::new(ConfigService::new(store, Arc::new(schemas)));

    // Start the HTTP server
    http::start_server(service, &config).await?;

    Ok(())
}
