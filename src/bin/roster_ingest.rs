use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use chrono::Local;
use tracing_subscriber::EnvFilter;

use footle::config::{self, RosterSourceKind};
use footle::refresh::{DEFAULT_REFRESH_DAYS, RefreshOutcome, RefreshPolicy, refresh_roster};
use footle::store::PlayerStore;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    dotenvy::dotenv().ok();

    let db_path = parse_db_path_arg()
        .or_else(config::default_db_path)
        .context("unable to resolve sqlite path")?;
    let kind = match parse_value_arg("--source") {
        Some(raw) => {
            RosterSourceKind::parse(&raw).ok_or_else(|| anyhow!("unknown roster source '{raw}'"))?
        }
        None => RosterSourceKind::Static,
    };
    let force = std::env::args().skip(1).any(|arg| arg == "--force");

    let source = config::build_source(kind, &config::scrape_config_from_env());
    let store = Mutex::new(PlayerStore::open(&db_path)?);
    let policy = RefreshPolicy {
        min_interval_days: DEFAULT_REFRESH_DAYS,
        force,
    };
    let outcome = refresh_roster(&store, source.as_ref(), Local::now().date_naive(), policy)?;

    println!("Roster ingest complete");
    println!("DB: {}", db_path.display());
    println!("Source: {}", source.name());
    println!("{}", outcome.message());
    if let RefreshOutcome::Refreshed { .. } = outcome {
        let store = store
            .lock()
            .map_err(|_| anyhow!("player store lock poisoned"))?;
        let players = store.all()?;
        for player in players.iter().take(8) {
            println!(
                " - {} ({}, {}, {})",
                player.name, player.team, player.position_group, player.popularity.display()
            );
        }
    }

    Ok(())
}

fn parse_db_path_arg() -> Option<PathBuf> {
    parse_value_arg("--db").map(PathBuf::from)
}

fn parse_value_arg(flag: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}
