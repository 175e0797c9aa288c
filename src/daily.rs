use chrono::NaiveDate;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::player::Player;

/// Picks the day's answer. Nothing is cached: the pick is recomputed from
/// the current player set on every call, so a refresh mid-day can change it.
#[derive(Debug, Clone, Default)]
pub struct DailySelector {
    test_player: Option<String>,
}

impl DailySelector {
    pub fn new(test_player: Option<String>) -> Self {
        let test_player = test_player
            .map(|name| name.trim().to_lowercase())
            .filter(|name| !name.is_empty());
        Self { test_player }
    }

    pub fn test_player(&self) -> Option<&str> {
        self.test_player.as_deref()
    }

    pub fn pick(&self, players: &[Player], date: NaiveDate) -> Option<Player> {
        if players.is_empty() {
            return None;
        }

        if let Some(name) = self.test_player.as_deref() {
            if let Some(hit) = players.iter().find(|p| p.name.to_lowercase().contains(name)) {
                debug!(player = %hit.name, "daily pick from test override");
                return Some(hit.clone());
            }
        }

        let mut ordered: Vec<&Player> = players.iter().collect();
        ordered.sort_by_key(|p| p.id);

        let mut rng = StdRng::seed_from_u64(date_seed(date));
        ordered.choose(&mut rng).map(|p| (*p).clone())
    }
}

fn date_seed(date: NaiveDate) -> u64 {
    let digest = Sha256::digest(date.format("%Y-%m-%d").to_string().as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}
