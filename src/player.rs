use serde::{Deserialize, Serialize};

use crate::position::normalize_position;

pub const PREMIER_LEAGUE: &str = "Premier League";
pub const UNKNOWN: &str = "Unknown";

/// The one popularity signal a roster carries. Scraped squads report
/// appearances; the static roster and market-value scrapes report value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Popularity {
    Appearances(u32),
    MarketValue { value: u64, display: String },
}

impl Popularity {
    pub fn market_value(value: u64) -> Self {
        Popularity::MarketValue {
            value,
            display: format_market_value(value),
        }
    }

    pub fn amount(&self) -> u64 {
        match self {
            Popularity::Appearances(n) => u64::from(*n),
            Popularity::MarketValue { value, .. } => *value,
        }
    }

    pub fn display(&self) -> String {
        match self {
            Popularity::Appearances(n) => n.to_string(),
            Popularity::MarketValue { display, .. } => display.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Assigned by the store on insert; 0 until then.
    pub id: i64,
    pub name: String,
    pub nation: String,
    pub nation_code: String,
    pub league: String,
    pub team: String,
    pub position: String,
    pub position_group: String,
    pub age: u32,
    pub popularity: Popularity,
    pub last_updated: String,
}

impl Player {
    /// Builds an unsaved player. `position_group` is always derived here.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        nation: impl Into<String>,
        nation_code: impl Into<String>,
        team: impl Into<String>,
        position: impl Into<String>,
        age: u32,
        popularity: Popularity,
        last_updated: impl Into<String>,
    ) -> Self {
        let position = position.into();
        let position_group = normalize_position(&position);
        Self {
            id: 0,
            name: name.into(),
            nation: nation.into(),
            nation_code: nation_code.into(),
            league: PREMIER_LEAGUE.to_string(),
            team: team.into(),
            position,
            position_group,
            age,
            popularity,
            last_updated: last_updated.into(),
        }
    }

    pub fn has_known_team(&self) -> bool {
        let team = self.team.trim();
        !team.is_empty() && !team.eq_ignore_ascii_case(UNKNOWN)
    }

    pub fn summary(&self) -> PlayerSummary {
        PlayerSummary {
            id: self.id,
            name: self.name.clone(),
            team: self.team.clone(),
            league: self.league.clone(),
        }
    }
}

/// What the search endpoint hands back for autocomplete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub id: i64,
    pub name: String,
    pub team: String,
    pub league: String,
}

/// Renders euros the way Transfermarkt does: "€45.00m", "€800k".
pub fn format_market_value(value: u64) -> String {
    if value >= 1_000_000 {
        format!("€{:.2}m", value as f64 / 1_000_000.0)
    } else if value >= 1_000 {
        format!("€{}k", value / 1_000)
    } else {
        format!("€{value}")
    }
}
