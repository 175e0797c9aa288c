use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};

use crate::ingest::{PopularityMode, RosterSource, ScrapeConfig, StaticRoster, TransfermarktScraper};
use crate::refresh::DEFAULT_REFRESH_DAYS;

const CACHE_DIR: &str = "footle";
const DB_FILE: &str = "players.sqlite";
const DEFAULT_BIND: &str = "0.0.0.0:5002";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterSourceKind {
    Static,
    Scrape,
}

impl RosterSourceKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "static" | "fixture" => Some(RosterSourceKind::Static),
            "scrape" | "transfermarkt" | "live" => Some(RosterSourceKind::Scrape),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub bind: SocketAddr,
    pub roster_source: RosterSourceKind,
    pub test_player: Option<String>,
    pub refresh_days: i64,
    pub seed_on_start: bool,
    pub scrape: ScrapeConfig,
}

impl AppConfig {
    /// Reads `.env` (if present) and then the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let db_path = match env::var("FOOTLE_DB") {
            Ok(raw) if !raw.trim().is_empty() => PathBuf::from(raw.trim()),
            _ => default_db_path().context("unable to resolve sqlite path")?,
        };

        let bind_raw = env::var("FOOTLE_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
        let bind = bind_raw
            .trim()
            .parse::<SocketAddr>()
            .with_context(|| format!("invalid FOOTLE_BIND '{bind_raw}'"))?;

        let roster_source = match env::var("FOOTLE_ROSTER_SOURCE") {
            Ok(raw) if !raw.trim().is_empty() => RosterSourceKind::parse(&raw)
                .ok_or_else(|| anyhow!("unknown FOOTLE_ROSTER_SOURCE '{raw}'"))?,
            _ => RosterSourceKind::Static,
        };

        let test_player = env::var("FOOTLE_TEST_PLAYER")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let refresh_days = env::var("FOOTLE_REFRESH_DAYS")
            .ok()
            .and_then(|val| val.trim().parse::<i64>().ok())
            .unwrap_or(DEFAULT_REFRESH_DAYS)
            .clamp(1, 365);

        let seed_on_start = env::var("FOOTLE_SEED_ON_START")
            .map(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "True"))
            .unwrap_or(true);

        Ok(Self {
            db_path,
            bind,
            roster_source,
            test_player,
            refresh_days,
            seed_on_start,
            scrape: scrape_config_from_env(),
        })
    }

    pub fn roster_source(&self) -> Arc<dyn RosterSource> {
        build_source(self.roster_source, &self.scrape)
    }
}

pub fn build_source(kind: RosterSourceKind, scrape: &ScrapeConfig) -> Arc<dyn RosterSource> {
    match kind {
        RosterSourceKind::Static => Arc::new(StaticRoster),
        RosterSourceKind::Scrape => Arc::new(TransfermarktScraper::new(scrape.clone())),
    }
}

pub fn scrape_config_from_env() -> ScrapeConfig {
    let mut cfg = ScrapeConfig::default();
    if let Some(mode) = env::var("FOOTLE_POPULARITY")
        .ok()
        .and_then(|v| PopularityMode::parse(&v))
    {
        cfg.popularity = mode;
    }
    if let Some(n) = env::var("FOOTLE_MIN_APPEARANCES")
        .ok()
        .and_then(|v| v.trim().parse::<u32>().ok())
    {
        cfg.min_appearances = n;
    }
    let min_delay = env::var("FOOTLE_SCRAPE_MIN_DELAY_SECS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(5)
        .min(120);
    let max_delay = env::var("FOOTLE_SCRAPE_MAX_DELAY_SECS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(15)
        .clamp(min_delay, 300);
    cfg.min_delay = Duration::from_secs(min_delay);
    cfg.max_delay = Duration::from_secs(max_delay);
    cfg
}

pub fn app_cache_dir() -> Option<PathBuf> {
    // Prefer XDG cache.
    if let Ok(base) = env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(CACHE_DIR));
        }
    }
    let home = env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR))
}

pub fn default_db_path() -> Option<PathBuf> {
    app_cache_dir().map(|dir| dir.join(DB_FILE))
}
