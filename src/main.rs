use std::error::Error;
use std::sync::Arc;

use padel_ranking::{
    api,
    storage::{FileLocalStore, PostgresRemoteStore, SqliteBackupStore},
    sync::start_sync_task,
    AppState, BackupStore, InMemoryBackupStore, RemoteStore, SyncCoordinator, TrackerConfig,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "padel_ranking=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting padel ranking tracker");

    let config = TrackerConfig::from_env();

    let local = Arc::new(FileLocalStore::open(&config.data_dir)?);

    let backup: Arc<dyn BackupStore> = match &config.backup_db_path {
        Some(path) => Arc::new(SqliteBackupStore::open(path).await?),
        None => {
            warn!("PADEL_BACKUP_DB not set, backup kept in memory only");
            Arc::new(InMemoryBackupStore::new())
        }
    };

    let remote: Option<Arc<dyn RemoteStore>> = match &config.database_url {
        Some(url) => match sqlx::PgPool::connect(url).await {
            Ok(pool) => {
                let store = PostgresRemoteStore::new(pool);
                store.ensure_schema().await?;
                let store: Arc<dyn RemoteStore> = Arc::new(store);
                Some(store)
            }
            Err(e) => {
                warn!(error = %e, "Remote store unreachable, running local-only");
                None
            }
        },
        None => {
            info!("DATABASE_URL not set, running local-only");
            None
        }
    };

    let coordinator = Arc::new(SyncCoordinator::new(
        local,
        backup,
        remote,
        config.coordinator.clone(),
    ));
    coordinator.load().await?;

    let sync_task = tokio::spawn(start_sync_task(
        Arc::clone(&coordinator),
        config.sync.clone(),
    ));

    let app = api::router(AppState::new(Arc::clone(&coordinator)))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, "Server running");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sync_task.abort();
    let failures = coordinator.shutdown().await;
    if !failures.is_empty() {
        error!(
            count = failures.len(),
            "Some remote writes did not complete before shutdown"
        );
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Could not listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
