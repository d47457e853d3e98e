//! # SQLite Database methods
//!
//! This module contains "low-level" SQLite database interactions, one submodule per table.
//!
//! All these interactions are simple functions (rather than stateful structs) that accept a `&mut SqliteConnection`
//! argument. Callers can obtain a connection from a pool, or open a transaction and pass `&mut tx` when several
//! statements must take effect atomically.
use std::{str::FromStr, time::Duration};

use log::trace;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    Error as SqlxError,
    SqlitePool,
};

pub mod deliveries;
pub mod items;
pub mod orders;
pub mod payments;

/// Creates a connection pool for `url`. The database file is created if it does not exist yet.
///
/// `timeout` bounds both how long a caller waits for a pooled connection and how long SQLite waits on a locked
/// database before giving up with `SQLITE_BUSY`.
pub async fn new_pool(url: &str, max_connections: u32, timeout: Duration) -> Result<SqlitePool, SqlxError> {
    trace!("🗃️ Connecting to {url} with up to {max_connections} connections");
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(timeout);
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(timeout)
        .connect_with(options)
        .await?;
    Ok(pool)
}
