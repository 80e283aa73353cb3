//! Leaderboard backend entrypoint wiring the REST layer to the ranked store.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use leaderboard_back::{
    config::AppConfig,
    dao::ranked_store::{RankedStore, memory::MemoryRankedStore},
    routes,
    state::{AppState, SharedState},
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let app_state = AppState::new(config);
    start_store(app_state.clone()).await;

    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Install the ranked store selected by `STORE_BACKEND`.
///
/// `memory` installs an in-process store immediately. Anything else connects to MongoDB in the
/// background, leaving the state degraded until the first connection succeeds.
async fn start_store(state: SharedState) {
    let backend = env::var("STORE_BACKEND").unwrap_or_else(|_| "mongo".into());
    match backend.as_str() {
        "memory" => {
            info!("using in-memory ranked store");
            state
                .install_ranked_store(Arc::new(MemoryRankedStore::new()) as Arc<dyn RankedStore>)
                .await;
        }
        #[cfg(feature = "mongo-store")]
        "mongo" => {
            use leaderboard_back::{
                dao::{
                    ranked_store::mongodb::{MongoConfig, MongoRankedStore},
                    storage::StorageError,
                },
                services::storage_supervisor,
            };

            tokio::spawn(storage_supervisor::run(state, || async {
                let config = MongoConfig::from_env().await?;
                let store = MongoRankedStore::connect(config).await?;
                Ok::<_, StorageError>(Arc::new(store) as Arc<dyn RankedStore>)
            }));
        }
        other => {
            warn!(backend = other, "unsupported store backend; staying in degraded mode");
        }
    }
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler; waiting for Ctrl+C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
