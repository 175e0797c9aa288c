use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::info;

use crate::player::{Player, Popularity};
use crate::position::normalize_position;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

const SELECT_COLUMNS: &str = r#"
    id, name, nation, nation_code, league, team, position, position_group,
    age, appearances, market_value, market_value_display, last_updated
"#;

/// The flat `players` table. One connection, created at startup and dropped
/// at shutdown.
pub struct PlayerStore {
    conn: Connection,
}

impl PlayerStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create db dir {}", parent.display()))?;
        }
        let conn =
            Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")
            .context("enable wal journal")?;
        let store = Self { conn };
        store.init_schema()?;
        info!(path = %path.display(), "player store opened");
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory sqlite db")?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS players (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    nation TEXT NOT NULL,
                    nation_code TEXT NOT NULL DEFAULT '',
                    league TEXT NOT NULL,
                    team TEXT NOT NULL,
                    position TEXT NOT NULL,
                    position_group TEXT NOT NULL,
                    age INTEGER NOT NULL DEFAULT 0,
                    appearances INTEGER NULL,
                    market_value INTEGER NULL,
                    market_value_display TEXT NULL,
                    last_updated TEXT NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_players_name ON players(name);
                "#,
            )
            .context("create sqlite schema")?;
        Ok(())
    }

    /// Deletes every row and inserts `players` in one transaction.
    /// Returns the stored players with their new ids.
    pub fn replace_all(&mut self, players: &[Player]) -> Result<Vec<Player>> {
        let tx = self.conn.transaction().context("begin replace transaction")?;
        tx.execute("DELETE FROM players", [])
            .context("clear players")?;

        let mut stored = Vec::with_capacity(players.len());
        {
            let mut stmt = tx
                .prepare(
                    r#"
                    INSERT INTO players (
                        name, nation, nation_code, league, team, position, position_group,
                        age, appearances, market_value, market_value_display, last_updated
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                    "#,
                )
                .context("prepare insert player")?;

            for p in players {
                let position_group = normalize_position(&p.position);
                let (appearances, market_value, market_value_display) = match &p.popularity {
                    Popularity::Appearances(n) => (Some(i64::from(*n)), None, None),
                    Popularity::MarketValue { value, display } => {
                        let value = i64::try_from(*value)
                            .with_context(|| format!("market value out of range for {}", p.name))?;
                        (None, Some(value), Some(display.clone()))
                    }
                };
                stmt.execute(params![
                    p.name,
                    p.nation,
                    p.nation_code,
                    p.league,
                    p.team,
                    p.position,
                    position_group,
                    i64::from(p.age),
                    appearances,
                    market_value,
                    market_value_display,
                    p.last_updated,
                ])
                .with_context(|| format!("insert player {}", p.name))?;

                let mut row = p.clone();
                row.id = tx.last_insert_rowid();
                row.position_group = position_group;
                stored.push(row);
            }
        }

        tx.commit().context("commit replace transaction")?;
        Ok(stored)
    }

    pub fn get(&self, id: i64) -> Result<Option<Player>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM players WHERE id = ?1");
        self.conn
            .query_row(&sql, params![id], player_from_row)
            .optional()
            .context("query player by id")
    }

    pub fn all(&self) -> Result<Vec<Player>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM players ORDER BY id ASC");
        let mut stmt = self.conn.prepare(&sql).context("prepare load players")?;
        let rows = stmt
            .query_map([], player_from_row)
            .context("query load players")?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row.context("decode player row")?);
        }
        Ok(out)
    }

    /// Players whose name contains `query`, ignoring case. Filtering happens
    /// here rather than in SQL since SQLite's LOWER only folds ASCII.
    pub fn search_by_name(&self, query: &str) -> Result<Vec<Player>> {
        let needle = query.trim().to_lowercase();
        let players = self.all()?;
        Ok(players
            .into_iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .collect())
    }

    pub fn count(&self) -> Result<usize> {
        let n = self
            .conn
            .query_row("SELECT COUNT(*) FROM players", [], |row| row.get::<_, i64>(0))
            .context("count players")?;
        Ok(usize::try_from(n).unwrap_or_default())
    }

    /// Date of the last refresh. Every row of one refresh shares it.
    pub fn last_updated(&self) -> Result<Option<NaiveDate>> {
        let raw = self
            .conn
            .query_row("SELECT MAX(last_updated) FROM players", [], |row| {
                row.get::<_, Option<String>>(0)
            })
            .context("query last_updated")?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        let date = NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
            .map_err(|err| anyhow!("invalid last_updated '{raw}': {err}"))?;
        Ok(Some(date))
    }
}

fn player_from_row(row: &Row<'_>) -> rusqlite::Result<Player> {
    let appearances: Option<i64> = row.get(9)?;
    let market_value: Option<i64> = row.get(10)?;
    let market_value_display: Option<String> = row.get(11)?;

    let popularity = match (market_value, appearances) {
        (Some(value), _) => {
            let value = u64::try_from(value).unwrap_or_default();
            match market_value_display {
                Some(display) => Popularity::MarketValue { value, display },
                None => Popularity::market_value(value),
            }
        }
        (None, Some(n)) => Popularity::Appearances(u32::try_from(n).unwrap_or_default()),
        (None, None) => Popularity::Appearances(0),
    };

    Ok(Player {
        id: row.get(0)?,
        name: row.get(1)?,
        nation: row.get(2)?,
        nation_code: row.get(3)?,
        league: row.get(4)?,
        team: row.get(5)?,
        position: row.get(6)?,
        position_group: row.get(7)?,
        age: u32::try_from(row.get::<_, i64>(8)?).unwrap_or_default(),
        popularity,
        last_updated: row.get(12)?,
    })
}
