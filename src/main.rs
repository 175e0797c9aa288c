use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use footle::api::{AppState, create_router};
use footle::config::{AppConfig, RosterSourceKind};
use footle::daily::DailySelector;
use footle::refresh::{RefreshPolicy, refresh_roster};
use footle::store::PlayerStore;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    info!(db = %config.db_path.display(), source = ?config.roster_source, "starting footle");

    let store = PlayerStore::open(&config.db_path)?;
    let store = Arc::new(Mutex::new(store));
    let source = config.roster_source();

    // Only the static roster is cheap enough to load before serving.
    if config.seed_on_start && config.roster_source == RosterSourceKind::Static {
        let policy = RefreshPolicy {
            min_interval_days: config.refresh_days,
            force: false,
        };
        let today = Local::now().date_naive();
        match refresh_roster(&store, source.as_ref(), today, policy) {
            Ok(outcome) => info!("startup roster check: {}", outcome.message()),
            Err(err) => warn!("startup roster load failed: {err:#}"),
        }
    }

    if let Some(name) = config.test_player.as_deref() {
        warn!(name, "test player override active");
    }

    let state = AppState {
        store: store.clone(),
        source,
        daily: DailySelector::new(config.test_player.clone()),
        refresh_days: config.refresh_days,
        today: None,
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("bind {}", config.bind))?;
    info!("HTTP API listening on http://{}", config.bind);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    drop(store);
    info!("footle stopped");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.ok();
    info!("Received shutdown signal");
}
