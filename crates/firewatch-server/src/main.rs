mod config;

use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use firewatch_api::{AppStateInner, DashboardStore};
use firewatch_db::{Database, KeyValueStore, MemoryStorage, RecipientStore};

use crate::config::{ServerConfig, StorageConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "firewatch=debug,tower_http=debug".into()),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let backend: Box<dyn KeyValueStore> = match &config.storage {
        StorageConfig::Memory => {
            info!("Using in-memory storage, data is lost on exit");
            Box::new(MemoryStorage::new())
        }
        StorageConfig::Sqlite(path) => Box::new(Database::open(path)?),
    };
    let store: DashboardStore = RecipientStore::open(backend)?;

    let mut app = firewatch_api::router(AppStateInner::new(store));
    if let Some(dir) = &config.static_dir {
        info!("Serving dashboard assets from {}", dir.display());
        app = app.fallback_service(ServeDir::new(dir));
    }
    let app = app
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    info!("Firewatch listening on {}", config.addr);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
