//! API integration tests against a live server on an ephemeral port

use std::{net::SocketAddr, sync::Arc};

use bookshelf_server::{
    api,
    config::AppConfig,
    repository::{MemoryStorage, Storage},
    services::{
        sessions::{MemorySessionStore, SessionStore},
        Services,
    },
    AppState,
};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

struct TestServer {
    base_url: String,
    _data: tempfile::TempDir,
}

/// Start the full application and return its base URL
async fn spawn_server() -> TestServer {
    let data = tempfile::tempdir().expect("Failed to create temp dir");
    let mut config = AppConfig::default();
    config.uploads.dir = data.path().join("uploads");
    config.frontend.dir = data.path().join("dist");

    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let sessions: Arc<dyn SessionStore> =
        Arc::new(MemorySessionStore::new(chrono::Duration::hours(24)));
    let services = Services::new(storage, sessions, &config)
        .await
        .expect("Failed to create services");

    let app = api::create_router(AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    });

    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server error");
    });

    TestServer {
        base_url: format!("http://{}", addr),
        _data: data,
    }
}

fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to build client")
}

/// Log the client in; its cookie store keeps the session
async fn login(client: &Client, base_url: &str) {
    let response = client
        .post(format!("{}/api/admin/login", base_url))
        .json(&json!({
            "username": "admin",
            "password": "admin123"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_check() {
    let server = spawn_server().await;

    let response = client()
        .get(format!("{}/health", server.base_url))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let server = spawn_server().await;
    let client = client();

    let response = client
        .post(format!("{}/api/admin/login", server.base_url))
        .json(&json!({
            "username": "admin",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = client
        .get(format!("{}/api/books", server.base_url))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_book_lifecycle() {
    let server = spawn_server().await;
    let client = client();
    login(&client, &server.base_url).await;

    // Create
    let response = client
        .post(format!("{}/api/books", server.base_url))
        .json(&json!({
            "title": "Dune",
            "author": "Herbert",
            "genre": "Sci-Fi"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["id"], 1);
    assert_eq!(body["coverColor"], "purple");
    assert_eq!(body["featured"], false);

    // Update
    let response = client
        .patch(format!("{}/api/books/1", server.base_url))
        .json(&json!({ "featured": true }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(updated["featured"], true);
    assert_eq!(updated["title"], "Dune");

    // Stats
    let stats: Value = client
        .get(format!("{}/api/admin/stats", server.base_url))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(stats["totalBooks"], 1);
    assert_eq!(stats["featuredBooks"], 1);
    assert_eq!(stats["recentBooks"], 1);

    // Delete
    let response = client
        .delete(format!("{}/api/books/1", server.base_url))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = client
        .get(format!("{}/api/books/1", server.base_url))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Book not found");
}

#[tokio::test]
async fn test_logout_revokes_access() {
    let server = spawn_server().await;
    let client = client();
    login(&client, &server.base_url).await;

    let response = client
        .get(format!("{}/api/books", server.base_url))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .post(format!("{}/api/admin/logout", server.base_url))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .get(format!("{}/api/books", server.base_url))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_upload_cover() {
    let server = spawn_server().await;
    let client = client();
    login(&client, &server.base_url).await;

    let part = reqwest::multipart::Part::bytes(b"fake png".to_vec())
        .file_name("cover.png")
        .mime_str("image/png")
        .expect("Invalid mime");
    let form = reqwest::multipart::Form::new().part("cover", part);

    let response = client
        .post(format!("{}/api/books/upload-cover", server.base_url))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    let cover_url = body["coverUrl"].as_str().expect("No cover URL");

    let response = client
        .get(format!("{}{}", server.base_url, cover_url))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(&response.bytes().await.expect("No body")[..], b"fake png");
}

#[tokio::test]
async fn test_admin_pages_redirect_when_anonymous() {
    let server = spawn_server().await;

    let response = client()
        .get(format!("{}/admin/dashboard", server.base_url))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_redirection());
    assert_eq!(
        response.headers().get(reqwest::header::LOCATION).unwrap(),
        "/admin/login"
    );
}
