//! §4.3: the persistent username/online registry and leaderboard counters.
//!
//! Backed by a single SQLite table, opened once at startup and reused for
//! every call. Each operation hops onto a blocking thread via
//! [`tokio::task::spawn_blocking`] — the same "own the connection behind a
//! mutex, escape the async world for the query, come back" shape the
//! persistence layer elsewhere in this corpus uses, simplified here because
//! registry calls are request/response rather than fire-and-forget.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error as ThisError;
use tracing::warn;

pub use bluffhouse_types::protocol::LeaderboardEntry;

const MIN_USERNAME_LEN: usize = 2;
const MAX_USERNAME_LEN: usize = 20;

#[derive(Debug, ThisError)]
pub enum RegistryError {
    #[error("sqlite error: {0}")]
    Persistence(#[from] rusqlite::Error),
    #[error("worker thread panicked")]
    WorkerPanicked,
}

/// Result of `claim`. Not every unsuccessful claim is an error (§4.3: `{ok |
/// taken | invalid}`) — only a genuine storage failure is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    Claimed(String),
    Taken,
    Invalid(String),
}

fn validate_username(username: &str, max_username_len: usize) -> bool {
    let len_ok = (MIN_USERNAME_LEN..=max_username_len).contains(&username.len());
    len_ok
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

struct Inner {
    conn: Connection,
    /// Session-scoped userId -> username, for the currently-online set.
    online_sessions: HashMap<String, String>,
}

/// The Player & User Registry. Cheap to clone; every clone shares the same
/// connection and session table.
#[derive(Clone)]
pub struct Registry {
    inner: Arc<Mutex<Inner>>,
    max_username_len: usize,
}

impl Registry {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let conn = Connection::open(path).context("open registry database")?;
        init_schema(&conn).context("init registry schema")?;
        reset_online_flags(&conn).context("reset online flags on startup")?;
        Ok(Self {
            inner: Arc::new(Mutex::new(Inner {
                conn,
                online_sessions: HashMap::new(),
            })),
            max_username_len: MAX_USERNAME_LEN,
        })
    }

    pub fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory registry database")?;
        init_schema(&conn).context("init registry schema")?;
        Ok(Self {
            inner: Arc::new(Mutex::new(Inner {
                conn,
                online_sessions: HashMap::new(),
            })),
            max_username_len: MAX_USERNAME_LEN,
        })
    }

    /// Overrides the accepted username length ceiling (default 20, §4.3).
    pub fn with_max_username_len(mut self, max_username_len: usize) -> Self {
        self.max_username_len = max_username_len;
        self
    }

    /// `claim(username) → {ok(userId) | taken | invalid}` (§4.3).
    pub async fn claim(&self, username: String) -> Result<ClaimOutcome, RegistryError> {
        let inner = self.inner.clone();
        let max_username_len = self.max_username_len;
        run_blocking(move || {
            let mut guard = inner.lock().expect("registry mutex poisoned");
            if !validate_username(&username, max_username_len) {
                return Ok(ClaimOutcome::Invalid(format!(
                    "username must be {MIN_USERNAME_LEN}-{max_username_len} alphanumeric/-/_ characters"
                )));
            }

            let existing: Option<bool> = guard
                .conn
                .query_row(
                    "SELECT is_online FROM users WHERE username = ?1",
                    params![username],
                    |row| row.get::<_, i64>(0),
                )
                .optional()?
                .map(|flag| flag != 0);

            if existing == Some(true) {
                return Ok(ClaimOutcome::Taken);
            }

            let now = now_unix();
            if existing.is_some() {
                guard.conn.execute(
                    "UPDATE users SET is_online = 1, last_seen = ?1 WHERE username = ?2",
                    params![now, username],
                )?;
            } else {
                guard.conn.execute(
                    "INSERT INTO users (username, first_seen, last_seen, is_online, wins, games_played)
                     VALUES (?1, ?2, ?2, 1, 0, 0)",
                    params![username, now],
                )?;
            }

            let user_id = uuid::Uuid::new_v4().to_string();
            guard.online_sessions.insert(user_id.clone(), username);
            Ok(ClaimOutcome::Claimed(user_id))
        })
        .await
    }

    /// `release(userId)` (§4.3): marks the username offline, preserves
    /// persistent counters.
    pub async fn release(&self, user_id: String) -> Result<(), RegistryError> {
        let inner = self.inner.clone();
        run_blocking(move || {
            let mut guard = inner.lock().expect("registry mutex poisoned");
            let Some(username) = guard.online_sessions.remove(&user_id) else {
                return Ok(());
            };
            let now = now_unix();
            guard.conn.execute(
                "UPDATE users SET is_online = 0, last_seen = ?1 WHERE username = ?2",
                params![now, username],
            )?;
            Ok(())
        })
        .await
    }

    /// Leaderboard counter bumped for the winner on game end.
    pub async fn record_win(&self, user_id: String) -> Result<(), RegistryError> {
        self.bump_counter(user_id, "wins").await
    }

    /// Leaderboard counter bumped for every seated participant on game end.
    pub async fn record_game(&self, user_id: String) -> Result<(), RegistryError> {
        self.bump_counter(user_id, "games_played").await
    }

    async fn bump_counter(&self, user_id: String, column: &'static str) -> Result<(), RegistryError> {
        let inner = self.inner.clone();
        run_blocking(move || {
            let guard = inner.lock().expect("registry mutex poisoned");
            let Some(username) = guard.online_sessions.get(&user_id).cloned() else {
                warn!(user_id, "record against an unknown/released session; dropping");
                return Ok(());
            };
            let sql = format!("UPDATE users SET {column} = {column} + 1 WHERE username = ?1");
            guard.conn.execute(&sql, params![username])?;
            Ok(())
        })
        .await
    }

    /// `snapshotLeaderboard(limit)`, ordered wins desc, games_played asc,
    /// username asc.
    pub async fn snapshot_leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, RegistryError> {
        let inner = self.inner.clone();
        run_blocking(move || {
            let guard = inner.lock().expect("registry mutex poisoned");
            let mut stmt = guard.conn.prepare(
                "SELECT username, wins, games_played FROM users
                 ORDER BY wins DESC, games_played ASC, username ASC
                 LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![limit as i64], |row| {
                Ok(LeaderboardEntry {
                    username: row.get(0)?,
                    wins: row.get::<_, i64>(1)? as u64,
                    games_played: row.get::<_, i64>(2)? as u64,
                })
            })?;
            let mut out = Vec::new();
            for row in rows {
                out.push(row?);
            }
            Ok(out)
        })
        .await
    }
}

async fn run_blocking<F, T>(f: F) -> Result<T, RegistryError>
where
    F: FnOnce() -> Result<T, RegistryError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|_| RegistryError::WorkerPanicked)?
}

fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA synchronous=NORMAL;
         CREATE TABLE IF NOT EXISTS users (
             username TEXT PRIMARY KEY,
             first_seen INTEGER NOT NULL,
             last_seen INTEGER NOT NULL,
             is_online INTEGER NOT NULL DEFAULT 0,
             wins INTEGER NOT NULL DEFAULT 0,
             games_played INTEGER NOT NULL DEFAULT 0
         );",
    )
}

fn reset_online_flags(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute("UPDATE users SET is_online = 0", [])?;
    Ok(())
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
