//! Server: reads settings from the environment, builds the store for the configured table and serves the API.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use tv_catalog::{app, load_schema, AppState, DynamoStore, EntityStore, MemoryStore, Settings, StoreBackend};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tv_catalog=info,tv_catalog_server=info")),
        )
        .init();

    let schema = load_schema(&settings).await?;
    let state = match settings.table_name.as_deref() {
        Some(table) => {
            let store: Arc<dyn EntityStore> = match settings.store_backend {
                StoreBackend::DynamoDb => Arc::new(
                    DynamoStore::connect(table, &schema.id_field, settings.dynamodb_endpoint.as_deref()).await,
                ),
                StoreBackend::Memory => Arc::new(MemoryStore::new(schema.id_field.clone())),
            };
            tracing::info!(table = %table, collection = %schema.collection, backend = ?settings.store_backend, "store ready");
            AppState::new(store, schema)?
        }
        None => {
            tracing::warn!("TABLE_NAME is not set; entity requests will fail with 500");
            AppState::unconfigured()
        }
    };

    let listener = TcpListener::bind(settings.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state, settings.max_body_bytes)).await?;
    Ok(())
}
