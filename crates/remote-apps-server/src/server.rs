//! HTTP server implementation using Axum.

use crate::handler::{handle_health, handle_list, handle_start};
use axum::{
    routing::{any, get},
    Router,
};
use remote_apps_core::{DirectoryWatcher, Launcher, ShortcutRegistry};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Application state shared across handlers.
pub struct AppState {
    /// Live shortcut registry, also fed by the directory watcher
    pub registry: Arc<ShortcutRegistry>,
    /// Launcher used for every start request
    pub launcher: Launcher,
}

/// Build the router for the given state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_list))
        .route("/healthz", get(handle_health))
        .route("/start/:name", any(handle_start))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Watch the shortcut directories, then load what they already hold.
///
/// Missing directories are skipped with a warning. The watcher starts first
/// so files created during the scan are not missed.
pub fn watch_and_scan(
    registry: &Arc<ShortcutRegistry>,
    dirs: &[PathBuf],
) -> anyhow::Result<DirectoryWatcher> {
    let existing: Vec<PathBuf> = dirs
        .iter()
        .filter(|dir| {
            let exists = dir.is_dir();
            if !exists {
                warn!("Skipping missing shortcut directory {}", dir.display());
            }
            exists
        })
        .cloned()
        .collect();

    let watcher = DirectoryWatcher::watch_registry(&existing, registry.clone())?;
    for dir in &existing {
        if let Err(e) = registry.load_dir(dir) {
            warn!("Initial scan of {} failed: {}", dir.display(), e);
        }
    }

    Ok(watcher)
}

/// Start the HTTP server.
///
/// Returns the actual address the server is bound to (useful when port=0).
pub async fn start_server(
    registry: Arc<ShortcutRegistry>,
    launcher: Launcher,
    host: &str,
    port: u16,
) -> anyhow::Result<SocketAddr> {
    let app = router(Arc::new(AppState { registry, launcher }));

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    info!("Server listening on {}", actual_addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Server error: {}", e);
        }
    });

    Ok(actual_addr)
}
