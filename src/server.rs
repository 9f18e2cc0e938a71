//! Notes HTTP server.
//!
//! Exposes the note service as a small JSON API.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST`   | `/notes?title=..&content=..` | Create a note |
//! | `GET`    | `/notes/{id}` | Fetch a note |
//! | `PUT`    | `/notes/{id}?title=..&content=..` | Partially update a note |
//! | `DELETE` | `/notes/{id}` | Delete a note |
//! | `GET`    | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! Every error response has the shape `{ "detail": "<message>" }`:
//!
//! - `404`: `Note not found`
//! - `422`: missing required parameter or non-integer id
//! - `500`: storage failure (`Internal Server Error`; details are logged)
//!
//! # Sessions
//!
//! Each handler acquires its own storage session from [`Storage`] and lets
//! it drop when the handler returns, so the connection is released on every
//! path, including errors.

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use notes_core::models::{Note, NoteUpdate};
use notes_core::service::{NoteError, NoteService};

use crate::config::Config;
use crate::db::Storage;
use crate::migrate;
use crate::sqlite_store::SqliteSession;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    storage: Storage,
}

impl AppState {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    async fn service(&self) -> Result<NoteService<SqliteSession>, AppError> {
        let session = self.storage.session().await.map_err(internal)?;
        Ok(NoteService::new(session))
    }
}

/// Build the router. Exposed separately so tests can serve it on an
/// ephemeral listener.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/notes", post(handle_create))
        .route(
            "/notes/{id}",
            get(handle_get).put(handle_update).delete(handle_delete),
        )
        .route("/health", get(handle_health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Starts the HTTP server.
///
/// Connects to the configured database, applies migrations, binds
/// `[server].bind` and serves until Ctrl-C. The storage connection is
/// closed after the last in-flight request completes.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let storage = Storage::connect(&config.db).await?;
    migrate::run_migrations(&storage).await?;

    let app = router(AppState::new(storage.clone()));
    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    tracing::info!(addr = %listener.local_addr()?, "notes server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    storage.close().await;
    tracing::info!("notes server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}

// ============ Error response ============

#[derive(Serialize)]
struct DetailBody {
    detail: String,
}

/// Internal error type that converts into an Axum HTTP response.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(DetailBody {
                detail: self.message,
            }),
        )
            .into_response()
    }
}

fn internal(err: anyhow::Error) -> AppError {
    tracing::error!(error = %format!("{:#}", err), "storage failure");
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: "Internal Server Error".to_string(),
    }
}

fn unprocessable(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::UNPROCESSABLE_ENTITY,
        message: message.into(),
    }
}

impl From<NoteError> for AppError {
    fn from(err: NoteError) -> Self {
        match err {
            NoteError::NotFound(_) => AppError {
                status: StatusCode::NOT_FOUND,
                message: "Note not found".to_string(),
            },
            NoteError::Storage(e) => internal(e),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        unprocessable(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        unprocessable(rejection.body_text())
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ /notes ============

#[derive(Debug, Deserialize)]
struct CreateParams {
    title: String,
    content: String,
}

async fn handle_create(
    State(state): State<AppState>,
    params: Result<Query<CreateParams>, QueryRejection>,
) -> Result<Json<Note>, AppError> {
    let Query(params) = params?;
    let note = state
        .service()
        .await?
        .create(params.title, params.content)
        .await?;
    Ok(Json(note))
}

async fn handle_get(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Note>, AppError> {
    let Path(id) = id?;
    let note = state.service().await?.get(id).await?;
    Ok(Json(note))
}

async fn handle_update(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    update: Result<Query<NoteUpdate>, QueryRejection>,
) -> Result<Json<Note>, AppError> {
    let Path(id) = id?;
    let Query(update) = update?;
    let note = state.service().await?.update(id, &update).await?;
    Ok(Json(note))
}

async fn handle_delete(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<DetailBody>, AppError> {
    let Path(id) = id?;
    state.service().await?.delete(id).await?;
    Ok(Json(DetailBody {
        detail: "Note deleted".to_string(),
    }))
}
