//! CLI command implementations.
//!
//! Each command opens the storage connection, applies migrations, runs one
//! note operation on a single session, prints the result as JSON to stdout,
//! and closes the connection. Migrations are idempotent, so note commands
//! work on a fresh database without a prior `notes init`; `init` exists to
//! create the database up front. A missing note prints
//! `Error: note not found: <id>` to stderr and exits with status 1.

use anyhow::Result;
use serde::Serialize;

use notes_core::models::NoteUpdate;
use notes_core::service::{NoteError, NoteResult, NoteService};

use crate::config::Config;
use crate::db::Storage;
use crate::migrate;
use crate::sqlite_store::SqliteSession;

/// Create the database and the `notes` table.
pub async fn run_init(config: &Config) -> Result<()> {
    let storage = Storage::connect(&config.db).await?;
    migrate::run_migrations(&storage).await?;
    storage.close().await;
    Ok(())
}

pub async fn run_create(config: &Config, title: String, content: String) -> Result<()> {
    with_service(config, |mut svc| async move { svc.create(title, content).await }).await
}

pub async fn run_get(config: &Config, id: i64) -> Result<()> {
    with_service(config, |mut svc| async move { svc.get(id).await }).await
}

pub async fn run_update(
    config: &Config,
    id: i64,
    title: Option<String>,
    content: Option<String>,
) -> Result<()> {
    let update = NoteUpdate::new(title, content);
    with_service(config, |mut svc| async move { svc.update(id, &update).await }).await
}

pub async fn run_delete(config: &Config, id: i64) -> Result<()> {
    with_service(config, |mut svc| async move {
        svc.delete(id)
            .await
            .map(|_| serde_json::json!({ "detail": "Note deleted" }))
    })
    .await
}

async fn with_service<F, Fut, T>(config: &Config, op: F) -> Result<()>
where
    F: FnOnce(NoteService<SqliteSession>) -> Fut,
    Fut: std::future::Future<Output = NoteResult<T>>,
    T: Serialize,
{
    let storage = Storage::connect(&config.db).await?;
    migrate::run_migrations(&storage).await?;

    let outcome = op(NoteService::new(storage.session().await?)).await;
    storage.close().await;

    match outcome {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Err(NoteError::NotFound(id)) => {
            eprintln!("Error: {}", NoteError::NotFound(id));
            std::process::exit(1);
        }
        Err(NoteError::Storage(e)) => Err(e),
    }
}
