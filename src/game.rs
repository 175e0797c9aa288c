use chrono::NaiveDate;
use thiserror::Error;

use crate::daily::DailySelector;
use crate::feedback::{Feedback, compare};
use crate::player::PlayerSummary;
use crate::search::rank_matches;
use crate::store::PlayerStore;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("Player not found")]
    PlayerNotFound(i64),

    #[error("No players in database")]
    NoPlayers,

    #[error("store error: {0:#}")]
    Store(#[from] anyhow::Error),
}

pub fn search_players(store: &PlayerStore, query: &str) -> Result<Vec<PlayerSummary>, GameError> {
    if query.trim().is_empty() {
        return Ok(Vec::new());
    }
    let candidates = store.search_by_name(query)?;
    Ok(rank_matches(&candidates, query))
}

/// Grades a guess against the day's answer. The answer is picked fresh
/// from the store on every call.
pub fn check_guess(
    store: &PlayerStore,
    daily: &DailySelector,
    guessed_id: i64,
    today: NaiveDate,
) -> Result<Feedback, GameError> {
    let guessed = store
        .get(guessed_id)?
        .ok_or(GameError::PlayerNotFound(guessed_id))?;
    let players = store.all()?;
    let target = daily.pick(&players, today).ok_or(GameError::NoPlayers)?;
    Ok(compare(&guessed, &target))
}
