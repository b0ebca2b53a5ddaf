use anyhow::Context;
use crm_core::Config;
use crm_sync::{
    spawn_change_listener, DataService, JsonFilePreferences, PreferenceStore, SnapshotStore,
    SqliteDataService,
};
use crm_server::{app, AppState};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let config = Config::load_default()
        .unwrap_or_else(|e| {
            warn!("Failed to load config: {:#}, using defaults", e);
            Config::default()
        })
        .with_env_overrides();

    info!(
        "Database: {}, preferences: {}",
        config.database.url, config.preferences.path
    );

    let service: Arc<dyn DataService> = Arc::new(
        SqliteDataService::connect(&config.database.url, config.database.max_connections)
            .await
            .with_context(|| format!("could not open database {}", config.database.url))?,
    );
    let prefs: Arc<dyn PreferenceStore> = Arc::new(
        JsonFilePreferences::open(&config.preferences.path)
            .with_context(|| format!("could not open preferences {}", config.preferences.path))?,
    );

    // Initial load before serving, then keep the snapshot in step with the feed
    let store = Arc::new(SnapshotStore::new());
    let report = store.reload_all(service.as_ref()).await;
    if !report.is_clean() {
        warn!(
            failed = ?report.failed,
            rejected = report.rejected,
            "Initial load incomplete"
        );
    }
    let _listener = spawn_change_listener(service.clone(), store.clone());

    let state = AppState::new(service, store, prefs, &config.agent);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("could not bind {addr}"))?;
    info!("Server running at http://{}", addr);
    axum::serve(listener, app(state)).await?;

    Ok(())
}
