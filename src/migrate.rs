use anyhow::Result;

use crate::db::Storage;

/// Create the `notes` table if it does not exist. Safe to run repeatedly.
///
/// `AUTOINCREMENT` keeps SQLite from reusing the id of a deleted row.
/// `timestamp` holds unix milliseconds (UTC).
pub async fn run_migrations(storage: &Storage) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS notes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            timestamp INTEGER NOT NULL
        )
        "#,
    )
    .execute(storage.pool())
    .await?;

    tracing::debug!("migrations applied");
    Ok(())
}
