//! HTTP API tests.
//!
//! Each test serves the real router over a fresh SQLite file on an
//! ephemeral port and talks to it with `reqwest`.

use reqwest::{Client, StatusCode};
use secure_notes::config::DbConfig;
use secure_notes::db::Storage;
use secure_notes::migrate;
use secure_notes::server::{router, AppState};
use serde_json::Value;
use tempfile::TempDir;

struct TestServer {
    base: String,
    client: Client,
    storage: Storage,
    _tmp: TempDir,
}

impl TestServer {
    async fn start() -> Self {
        let tmp = TempDir::new().unwrap();
        let db = DbConfig {
            url: format!("sqlite:{}", tmp.path().join("notes.sqlite").display()),
            max_connections: 5,
        };
        let storage = Storage::connect(&db).await.unwrap();
        migrate::run_migrations(&storage).await.unwrap();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(AppState::new(storage.clone()));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base: format!("http://{}", addr),
            client: Client::new(),
            storage,
            _tmp: tmp,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn create(&self, title: &str, content: &str) -> Value {
        let resp = self
            .client
            .post(self.url("/notes"))
            .query(&[("title", title), ("content", content)])
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        resp.json().await.unwrap()
    }
}

#[tokio::test]
async fn test_create_note() {
    let server = TestServer::start().await;
    let data = server.create("Test Note", "This is a test.").await;

    assert_eq!(data["title"], "Test Note");
    assert_eq!(data["content"], "This is a test.");
    assert!(data["id"].is_i64());
    assert!(data["timestamp"].is_string());
}

#[tokio::test]
async fn test_get_note() {
    let server = TestServer::start().await;
    let created = server.create("Another Note", "More content").await;
    let id = created["id"].as_i64().unwrap();

    let resp = server
        .client
        .get(server.url(&format!("/notes/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let data: Value = resp.json().await.unwrap();
    assert_eq!(data, created);
}

#[tokio::test]
async fn test_update_note() {
    let server = TestServer::start().await;
    let created = server.create("Old Title", "Old content").await;
    let id = created["id"].as_i64().unwrap();

    let resp = server
        .client
        .put(server.url(&format!("/notes/{}", id)))
        .query(&[("title", "New Title"), ("content", "New content")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let data: Value = resp.json().await.unwrap();
    assert_eq!(data["id"], id);
    assert_eq!(data["title"], "New Title");
    assert_eq!(data["content"], "New content");
    assert_eq!(data["timestamp"], created["timestamp"]);
}

#[tokio::test]
async fn test_partial_update_keeps_other_field() {
    let server = TestServer::start().await;
    let created = server.create("Old Title", "Old content").await;
    let id = created["id"].as_i64().unwrap();

    let data: Value = server
        .client
        .put(server.url(&format!("/notes/{}", id)))
        .query(&[("title", "Only Title")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(data["title"], "Only Title");
    assert_eq!(data["content"], "Old content");

    // An empty value counts as "not supplied"
    let data: Value = server
        .client
        .put(server.url(&format!("/notes/{}", id)))
        .query(&[("title", ""), ("content", "Only Content")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(data["title"], "Only Title");
    assert_eq!(data["content"], "Only Content");
}

#[tokio::test]
async fn test_delete_note() {
    let server = TestServer::start().await;
    let created = server.create("Temp Note", "Temp content").await;
    let id = created["id"].as_i64().unwrap();

    let resp = server
        .client
        .delete(server.url(&format!("/notes/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "detail": "Note deleted" }));

    let resp = server
        .client
        .get(server.url(&format!("/notes/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_note_is_404_for_every_verb() {
    let server = TestServer::start().await;
    let url = server.url("/notes/424242");

    let requests = [
        server.client.get(&url),
        server.client.put(&url).query(&[("title", "X")]),
        server.client.delete(&url),
    ];
    for req in requests {
        let resp = req.send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body, serde_json::json!({ "detail": "Note not found" }));
    }
}

#[tokio::test]
async fn test_deleted_id_not_reused() {
    let server = TestServer::start().await;
    let first = server.create("a", "b").await["id"].as_i64().unwrap();
    server
        .client
        .delete(server.url(&format!("/notes/{}", first)))
        .send()
        .await
        .unwrap();
    let second = server.create("c", "d").await["id"].as_i64().unwrap();
    assert!(second > first);
}

#[tokio::test]
async fn test_storage_failure_is_500() {
    let server = TestServer::start().await;
    let id = server.create("a", "b").await["id"].as_i64().unwrap();

    sqlx::query("DROP TABLE notes")
        .execute(server.storage.pool())
        .await
        .unwrap();

    let url = server.url(&format!("/notes/{}", id));
    let requests = [
        server.client.get(&url),
        server.client.put(&url).query(&[("title", "X")]),
        server.client.delete(&url),
        server
            .client
            .post(server.url("/notes"))
            .query(&[("title", "t"), ("content", "c")]),
    ];
    for req in requests {
        let resp = req.send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body, serde_json::json!({ "detail": "Internal Server Error" }));
    }
}

#[tokio::test]
async fn test_create_requires_title_and_content() {
    let server = TestServer::start().await;
    let resp = server
        .client
        .post(server.url("/notes"))
        .query(&[("title", "No content")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = resp.json().await.unwrap();
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_non_integer_id_rejected() {
    let server = TestServer::start().await;
    let resp = server
        .client
        .get(server.url("/notes/abc"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_health() {
    let server = TestServer::start().await;
    let body: Value = server
        .client
        .get(server.url("/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

/// Create, read, update, delete, then confirm the note is gone.
#[tokio::test]
async fn test_note_lifecycle() {
    let server = TestServer::start().await;

    let created = server.create("Test Note", "This is a test.").await;
    let id = created["id"].as_i64().unwrap();
    let note_url = server.url(&format!("/notes/{}", id));

    let fetched: Value = server
        .client
        .get(&note_url)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["title"], "Test Note");
    assert_eq!(fetched["content"], "This is a test.");

    let updated: Value = server
        .client
        .put(&note_url)
        .query(&[("title", "New Title"), ("content", "New content")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated["title"], "New Title");
    assert_eq!(updated["content"], "New content");

    let deleted: Value = server
        .client
        .delete(&note_url)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(deleted["detail"], "Note deleted");

    let resp = server.client.get(&note_url).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
