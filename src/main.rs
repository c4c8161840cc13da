//! Lucky Draw binary entrypoint wiring the minigame REST API over the in-memory store.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lucky_draw::{
    config::AppConfig,
    dao::minigame_store::InMemoryMinigameStore,
    routes,
    services::minigame_service,
    state::{AppState, SharedState, UserRegistry},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let users = UserRegistry::from_accounts(config.users);
    if users.is_empty() {
        warn!("no user accounts configured; every minigame call will be rejected");
    }

    let app_state = AppState::with_system_clock(Arc::new(InMemoryMinigameStore::new()), users);
    seed_minigames(&app_state, config.minigames).await;

    // Build the HTTP router once the shared state is ready.
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

/// Create the minigames listed in the configuration; a bad seed is logged and skipped.
async fn seed_minigames(
    state: &SharedState,
    seeds: Vec<lucky_draw::dto::minigame::CreateMinigameRequest>,
) {
    for seed in seeds {
        let name = seed.name.clone();
        match minigame_service::create_minigame(state, seed).await {
            Ok(minigame) => info!(minigame_id = %minigame.id, %name, "seeded minigame"),
            Err(err) => warn!(error = %err, %name, "skipping minigame seed"),
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
                warn!(error = %err, "cannot install SIGTERM handler; waiting for Ctrl+C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
