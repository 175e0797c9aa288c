use std::sync::Mutex;

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use crate::ingest::RosterSource;
use crate::store::PlayerStore;

pub const DEFAULT_REFRESH_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy)]
pub struct RefreshPolicy {
    pub min_interval_days: i64,
    pub force: bool,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            min_interval_days: DEFAULT_REFRESH_DAYS,
            force: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RefreshOutcome {
    Skipped { days_since: i64, days_remaining: i64 },
    NothingFetched,
    Refreshed { players: usize },
}

impl RefreshOutcome {
    pub fn message(&self) -> String {
        match self {
            RefreshOutcome::Skipped {
                days_since,
                days_remaining,
            } => format!(
                "Database was updated {days_since} days ago. Next update in {days_remaining} days."
            ),
            RefreshOutcome::NothingFetched => {
                "No players were fetched; the existing roster was kept.".to_string()
            }
            RefreshOutcome::Refreshed { players } => format!("Updated {players} players"),
        }
    }
}

/// How long until the roster may be refreshed again, or `None` if it is due.
pub fn staleness(
    last_updated: Option<NaiveDate>,
    today: NaiveDate,
    policy: RefreshPolicy,
) -> Option<RefreshOutcome> {
    if policy.force {
        return None;
    }
    let last = last_updated?;
    // A date ahead of today (clock skew, restored db) counts as today.
    let days_since = (today - last).num_days().max(0);
    if days_since < policy.min_interval_days {
        Some(RefreshOutcome::Skipped {
            days_since,
            days_remaining: policy.min_interval_days - days_since,
        })
    } else {
        None
    }
}

/// Gate on staleness, fetch from `source`, then replace the whole table.
///
/// The lock is not held while fetching, so two concurrent refreshes may
/// both fetch and the later replace wins.
pub fn refresh_roster(
    store: &Mutex<PlayerStore>,
    source: &dyn RosterSource,
    today: NaiveDate,
    policy: RefreshPolicy,
) -> Result<RefreshOutcome> {
    let last_updated = {
        let store = store.lock().map_err(|_| anyhow!("player store lock poisoned"))?;
        store.last_updated()?
    };
    if let Some(skipped) = staleness(last_updated, today, policy) {
        info!(?skipped, "roster refresh not due");
        return Ok(skipped);
    }

    info!(source = source.name(), force = policy.force, "refreshing roster");
    let players = source.fetch_roster(today)?;
    if players.is_empty() {
        warn!(
            source = source.name(),
            "no players fetched, keeping existing roster"
        );
        return Ok(RefreshOutcome::NothingFetched);
    }

    let stored = {
        let mut store = store.lock().map_err(|_| anyhow!("player store lock poisoned"))?;
        store.replace_all(&players)?
    };
    info!(players = stored.len(), "roster replaced");
    Ok(RefreshOutcome::Refreshed {
        players: stored.len(),
    })
}
