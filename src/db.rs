//! SQLite database connection management.
//!
//! [`Storage`] is the process-wide storage connection: it is built once at
//! startup from [`DbConfig`], handed to whatever needs it, and closed at
//! shutdown. Each request borrows one pooled connection through
//! [`Storage::session`]; the connection goes back to the pool when the
//! session is dropped, on every exit path.
//!
//! WAL mode is enabled so concurrent readers do not block the writer.

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use crate::config::DbConfig;
use crate::sqlite_store::SqliteSession;

/// Storage connection shared by all requests.
///
/// Cloning is cheap and shares the underlying pool.
#[derive(Clone)]
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    /// Open a connection pool to the configured database.
    ///
    /// Creates the database file and its parent directory if they don't exist.
    pub async fn connect(config: &DbConfig) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .with_context(|| format!("Invalid database URL: {}", config.url))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        if let Some(parent) = options.get_filename().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create database directory: {}", parent.display())
                })?;
            }
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database: {}", config.url))?;

        tracing::debug!(url = %config.url, "database connected");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Acquire a scoped session for one request.
    pub async fn session(&self) -> Result<SqliteSession> {
        let conn = self
            .pool
            .acquire()
            .await
            .context("Failed to acquire database connection")?;
        Ok(SqliteSession::new(conn))
    }

    /// Close every pooled connection. Waits for checked-out sessions.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
