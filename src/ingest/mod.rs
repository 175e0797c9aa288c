use anyhow::Result;
use chrono::NaiveDate;

use crate::player::Player;

pub mod static_roster;
pub mod transfermarkt;

pub use static_roster::StaticRoster;
pub use transfermarkt::{PopularityMode, ScrapeConfig, TransfermarktScraper};

/// Anything that can produce a full Premier League roster.
///
/// Implementations stamp each player with `as_of` as its `last_updated`
/// date and fill missing attributes with safe defaults.
pub trait RosterSource: Send + Sync {
    fn name(&self) -> &str;

    fn fetch_roster(&self, as_of: NaiveDate) -> Result<Vec<Player>>;
}
