use std::cmp::Ordering;

use crate::player::{Player, PlayerSummary};

pub const SEARCH_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum MatchTier {
    Exact,
    Prefix,
    Contains,
}

/// Case-insensitive substring search over player names.
///
/// Exact full-name matches come first, then prefix matches, then the rest.
/// Within a tier, players with a known team sort ahead, then by name.
pub fn rank_matches(players: &[Player], query: &str) -> Vec<PlayerSummary> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut hits: Vec<(MatchTier, &Player)> = players
        .iter()
        .filter_map(|p| tier_for(&p.name.to_lowercase(), &needle).map(|tier| (tier, p)))
        .collect();

    hits.sort_by(|(ta, a), (tb, b)| {
        ta.cmp(tb)
            .then_with(|| known_team_first(a, b))
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.id.cmp(&b.id))
    });

    hits.into_iter()
        .take(SEARCH_LIMIT)
        .map(|(_, p)| p.summary())
        .collect()
}

fn tier_for(name: &str, needle: &str) -> Option<MatchTier> {
    if name == needle {
        Some(MatchTier::Exact)
    } else if name.starts_with(needle) {
        Some(MatchTier::Prefix)
    } else if name.contains(needle) {
        Some(MatchTier::Contains)
    } else {
        None
    }
}

fn known_team_first(a: &Player, b: &Player) -> Ordering {
    b.has_known_team().cmp(&a.has_known_team())
}
