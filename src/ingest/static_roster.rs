use anyhow::Result;
use chrono::NaiveDate;

use super::RosterSource;
use crate::player::{Player, Popularity};
use crate::store::DATE_FORMAT;

struct RosterEntry {
    name: &'static str,
    nation: &'static str,
    nation_code: &'static str,
    team: &'static str,
    position: &'static str,
    age: u32,
    market_value: u64,
}

const fn entry(
    name: &'static str,
    nation: &'static str,
    nation_code: &'static str,
    team: &'static str,
    position: &'static str,
    age: u32,
    market_value: u64,
) -> RosterEntry {
    RosterEntry {
        name,
        nation,
        nation_code,
        team,
        position,
        age,
        market_value,
    }
}

// Ages and values as listed on Transfermarkt at the start of the 2025/26 season.
const ROSTER: &[RosterEntry] = &[
    entry("Bukayo Saka", "England", "GB-ENG", "Arsenal", "Right Winger", 24, 150_000_000),
    entry("Martin Ødegaard", "Norway", "NO", "Arsenal", "Attacking Midfield", 26, 90_000_000),
    entry("Declan Rice", "England", "GB-ENG", "Arsenal", "Defensive Midfield", 26, 120_000_000),
    entry("William Saliba", "France", "FR", "Arsenal", "Centre-Back", 24, 90_000_000),
    entry("Gabriel Magalhães", "Brazil", "BR", "Arsenal", "Centre-Back", 27, 75_000_000),
    entry("David Raya", "Spain", "ES", "Arsenal", "Goalkeeper", 29, 40_000_000),
    entry("Erling Haaland", "Norway", "NO", "Manchester City", "Centre-Forward", 25, 180_000_000),
    entry("Phil Foden", "England", "GB-ENG", "Manchester City", "Attacking Midfield", 25, 100_000_000),
    entry("Rodri", "Spain", "ES", "Manchester City", "Defensive Midfield", 29, 110_000_000),
    entry("Rúben Dias", "Portugal", "PT", "Manchester City", "Centre-Back", 28, 70_000_000),
    entry("Joško Gvardiol", "Croatia", "HR", "Manchester City", "Centre-Back", 23, 75_000_000),
    entry("Jérémy Doku", "Belgium", "BE", "Manchester City", "Left Winger", 23, 60_000_000),
    entry("Mohamed Salah", "Egypt", "EG", "Liverpool", "Right Winger", 33, 55_000_000),
    entry("Virgil van Dijk", "Netherlands", "NL", "Liverpool", "Centre-Back", 34, 25_000_000),
    entry("Alexis Mac Allister", "Argentina", "AR", "Liverpool", "Central Midfield", 26, 100_000_000),
    entry("Alisson", "Brazil", "BR", "Liverpool", "Goalkeeper", 32, 20_000_000),
    entry("Florian Wirtz", "Germany", "DE", "Liverpool", "Attacking Midfield", 22, 140_000_000),
    entry("Cody Gakpo", "Netherlands", "NL", "Liverpool", "Left Winger", 26, 60_000_000),
    entry("Cole Palmer", "England", "GB-ENG", "Chelsea", "Attacking Midfield", 23, 130_000_000),
    entry("Enzo Fernández", "Argentina", "AR", "Chelsea", "Central Midfield", 24, 75_000_000),
    entry("Moisés Caicedo", "Ecuador", "EC", "Chelsea", "Defensive Midfield", 23, 90_000_000),
    entry("Marc Cucurella", "Spain", "ES", "Chelsea", "Left-Back", 27, 45_000_000),
    entry("Reece James", "England", "GB-ENG", "Chelsea", "Right-Back", 25, 40_000_000),
    entry("Bruno Fernandes", "Portugal", "PT", "Manchester United", "Attacking Midfield", 31, 45_000_000),
    entry("Bryan Mbeumo", "Cameroon", "CM", "Manchester United", "Right Winger", 26, 65_000_000),
    entry("Diogo Dalot", "Portugal", "PT", "Manchester United", "Right-Back", 26, 30_000_000),
    entry("Lisandro Martínez", "Argentina", "AR", "Manchester United", "Centre-Back", 27, 35_000_000),
    entry("Alexander Isak", "Sweden", "SE", "Newcastle United", "Centre-Forward", 25, 120_000_000),
    entry("Bruno Guimarães", "Brazil", "BR", "Newcastle United", "Defensive Midfield", 27, 75_000_000),
    entry("Anthony Gordon", "England", "GB-ENG", "Newcastle United", "Left Winger", 24, 60_000_000),
    entry("Sandro Tonali", "Italy", "IT", "Newcastle United", "Central Midfield", 25, 55_000_000),
    entry("Ollie Watkins", "England", "GB-ENG", "Aston Villa", "Centre-Forward", 29, 50_000_000),
    entry("Morgan Rogers", "England", "GB-ENG", "Aston Villa", "Attacking Midfield", 23, 65_000_000),
    entry("Emiliano Martínez", "Argentina", "AR", "Aston Villa", "Goalkeeper", 33, 20_000_000),
    entry("Micky van de Ven", "Netherlands", "NL", "Tottenham Hotspur", "Centre-Back", 24, 55_000_000),
    entry("Son Heung-min", "Korea, South", "KR", "Tottenham Hotspur", "Left Winger", 33, 20_000_000),
    entry("Pedro Porro", "Spain", "ES", "Tottenham Hotspur", "Right-Back", 25, 45_000_000),
    entry("Kaoru Mitoma", "Japan", "JP", "Brighton & Hove Albion", "Left Winger", 28, 40_000_000),
    entry("Carlos Baleba", "Cameroon", "CM", "Brighton & Hove Albion", "Defensive Midfield", 21, 45_000_000),
    entry("Jarrod Bowen", "England", "GB-ENG", "West Ham United", "Right Winger", 28, 40_000_000),
    entry("Antoine Semenyo", "Ghana", "GH", "AFC Bournemouth", "Right Winger", 25, 50_000_000),
    entry("Chris Wood", "New Zealand", "NZ", "Nottingham Forest", "Centre-Forward", 33, 12_000_000),
    entry("Morgan Gibbs-White", "England", "GB-ENG", "Nottingham Forest", "Attacking Midfield", 25, 50_000_000),
    entry("Jordan Pickford", "England", "GB-ENG", "Everton", "Goalkeeper", 31, 20_000_000),
    entry("Dean Henderson", "England", "GB-ENG", "Crystal Palace", "Goalkeeper", 28, 20_000_000),
    entry("Bernd Leno", "Germany", "DE", "Fulham", "Goalkeeper", 33, 7_000_000),
    entry("Matheus Cunha", "Brazil", "BR", "Manchester United", "Second Striker", 26, 60_000_000),
    entry("Yoane Wissa", "DR Congo", "CD", "Newcastle United", "Centre-Forward", 28, 30_000_000),
];

/// The in-code fallback roster, usable without network access.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticRoster;

impl StaticRoster {
    pub fn players(as_of: NaiveDate) -> Vec<Player> {
        let last_updated = as_of.format(DATE_FORMAT).to_string();
        ROSTER
            .iter()
            .map(|e| {
                Player::new(
                    e.name,
                    e.nation,
                    e.nation_code,
                    e.team,
                    e.position,
                    e.age,
                    Popularity::market_value(e.market_value),
                    last_updated.clone(),
                )
            })
            .collect()
    }
}

impl RosterSource for StaticRoster {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch_roster(&self, as_of: NaiveDate) -> Result<Vec<Player>> {
        Ok(Self::players(as_of))
    }
}
