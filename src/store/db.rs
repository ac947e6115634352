//! SQLite history store
//!
//! Manages the `~/.conquest/history.db` database with automatic schema setup.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::{AwardRecord, HistoryStore, MedallionEvent, StoreError, StoreResult};
use crate::config::Config;

/// Current schema version written to `schema_version`
const SCHEMA_VERSION: i32 = 1;

/// History store backed by a single SQLite connection
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open or create the database at the default location (~/.conquest/history.db)
    pub fn open_default() -> StoreResult<Self> {
        let db_path = Config::global_config_dir().join("history.db");
        Self::open(&db_path)
    }

    /// Open or create the database at a specific path
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        debug!("Opened history store at {}", path.display());
        Self::with_connection(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StoreResult<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.execute_batch(SCHEMA_SQL)?;

        let version: Option<i32> = conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |r| r.get(0))
            .optional()?
            .flatten();
        if version.unwrap_or(0) < SCHEMA_VERSION {
            conn.execute(
                "INSERT OR REPLACE INTO schema_version VALUES (?1)",
                [SCHEMA_VERSION],
            )?;
        }
        Ok(())
    }

    /// Number of stored maneuver events (all players)
    pub fn event_count(&self) -> StoreResult<u64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM maneuvers", [], |r| r.get(0))?;
        Ok(count as u64)
    }

    fn summed_awards(conn: &Connection, sql: &str, player: &str) -> StoreResult<BTreeMap<String, u32>> {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map([player], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(key, amount)| Ok((key, to_amount(amount)?)))
            .collect()
    }
}

impl HistoryStore for SqliteStore {
    fn insert_event(&self, event: &MedallionEvent) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"INSERT INTO maneuvers (player, type_key, value, points, created_at)
               VALUES (?1, ?2, ?3, ?4, ?5)"#,
            params![
                event.player,
                event.maneuver,
                event.value,
                event.points,
                event.created_at.timestamp_millis(),
            ],
        )?;
        Ok(())
    }

    fn maneuver_totals(&self, player: &str) -> StoreResult<BTreeMap<String, i64>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT type_key, SUM(value) FROM maneuvers WHERE player = ?1 GROUP BY type_key",
        )?;
        let totals = stmt
            .query_map([player], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        Ok(totals)
    }

    fn total_points(&self, player: &str) -> StoreResult<i64> {
        let conn = self.conn()?;
        let points: i64 = conn.query_row(
            "SELECT COALESCE(SUM(points), 0) FROM maneuvers WHERE player = ?1",
            [player],
            |r| r.get(0),
        )?;
        Ok(points)
    }

    fn distinct_players(&self) -> StoreResult<BTreeSet<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT DISTINCT player FROM maneuvers")?;
        let players = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(players)
    }

    fn insert_award(&self, award: &AwardRecord) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"INSERT INTO medallions (type_key, player, amount, created_at, user_notified)
               VALUES (?1, ?2, ?3, ?4, ?5)"#,
            params![
                award.medallion,
                award.player,
                award.amount,
                award.created_at.timestamp_millis(),
                award.user_notified as i32,
            ],
        )?;
        Ok(())
    }

    fn awards_for_player(&self, player: &str) -> StoreResult<Vec<AwardRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT type_key, amount, created_at, user_notified
               FROM medallions WHERE player = ?1 ORDER BY id"#,
        )?;
        let rows = stmt
            .query_map([player], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, bool>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(medallion, amount, created_at, user_notified)| {
                Ok(AwardRecord {
                    medallion,
                    player: player.to_string(),
                    amount: to_amount(amount)?,
                    created_at: from_millis(created_at)?,
                    user_notified,
                })
            })
            .collect()
    }

    fn delete_awards(&self, player: Option<&str>) -> StoreResult<()> {
        let conn = self.conn()?;
        let deleted = match player {
            Some(p) => conn.execute("DELETE FROM medallions WHERE player = ?1", [p])?,
            None => conn.execute("DELETE FROM medallions", [])?,
        };
        debug!("Deleted {} award rows", deleted);
        Ok(())
    }

    fn overview(&self, player: &str) -> StoreResult<BTreeMap<String, u32>> {
        let conn = self.conn()?;
        Self::summed_awards(&conn, OVERVIEW_SQL, player)
    }

    fn unnotified_awards(&self, player: &str) -> StoreResult<BTreeMap<String, u32>> {
        let conn = self.conn()?;
        Self::summed_awards(&conn, UNNOTIFIED_SQL, player)
    }

    fn mark_awards_notified(&self, player: &str) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.execute(MARK_NOTIFIED_SQL, [player])?;
        Ok(())
    }

    fn take_unnotified_awards(&self, player: &str) -> StoreResult<BTreeMap<String, u32>> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let awards = Self::summed_awards(&tx, UNNOTIFIED_SQL, player)?;
        tx.execute(MARK_NOTIFIED_SQL, [player])?;
        tx.commit()?;
        Ok(awards)
    }
}

fn to_amount(amount: i64) -> StoreResult<u32> {
    u32::try_from(amount).map_err(|_| StoreError::Corrupt(format!("award amount {}", amount)))
}

fn from_millis(ms: i64) -> StoreResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms).ok_or_else(|| StoreError::Corrupt(format!("timestamp {}", ms)))
}

const OVERVIEW_SQL: &str =
    "SELECT type_key, SUM(amount) FROM medallions WHERE player = ?1 GROUP BY type_key";

const UNNOTIFIED_SQL: &str = "SELECT type_key, SUM(amount) FROM medallions \
     WHERE player = ?1 AND user_notified = 0 GROUP BY type_key";

const MARK_NOTIFIED_SQL: &str =
    "UPDATE medallions SET user_notified = 1 WHERE player = ?1 AND user_notified = 0";

/// SQL schema for the history database
const SCHEMA_SQL: &str = r#"
-- Executed maneuvers (append-only)
CREATE TABLE IF NOT EXISTS maneuvers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    player TEXT NOT NULL,
    type_key TEXT NOT NULL,
    value INTEGER NOT NULL DEFAULT 1,
    points INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_maneuvers_player ON maneuvers(player);

-- Awarded medallions
CREATE TABLE IF NOT EXISTS medallions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    type_key TEXT NOT NULL,
    player TEXT NOT NULL,
    amount INTEGER NOT NULL,
    created_at INTEGER NOT NULL,
    user_notified INTEGER NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_medallions_player ON medallions(player);

-- Schema version
CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY);
"#;
