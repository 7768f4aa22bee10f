//! In-process fake of the articles backend for client integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

/// One request as seen by the fake backend.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Clone, Default)]
pub struct Backend {
    requests: Arc<Mutex<Vec<Recorded>>>,
    next_id: Arc<AtomicUsize>,
    fail_updates: Arc<AtomicBool>,
}

impl Backend {
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    fn record(&self, method: Method, path: String, headers: &HeaderMap, body: Option<Value>) {
        let authorization = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.requests.lock().unwrap().push(Recorded {
            method,
            path,
            authorization,
            body,
        });
    }
}

/// Bind the fake backend on an ephemeral port and return its API base URL.
pub async fn spawn_backend() -> (String, Backend) {
    let backend = Backend::default();

    let app = Router::new()
        .route("/api/v1/articles", post(create_article))
        .route(
            "/api/v1/articles/{key}",
            get(get_article).put(update_article).delete(delete_article),
        )
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server");
    });

    (format!("http://{addr}/api/v1"), backend)
}

fn article_json(id: &str, body: &Value) -> Value {
    json!({
        "id": id,
        "slug": format!("slug-{id}"),
        "title": body.get("title").cloned().unwrap_or(json!("Untitled")),
        "subtitle": body.get("subtitle").cloned().unwrap_or(Value::Null),
        "content": body.get("content").cloned().unwrap_or(json!("")),
        "reading_time_minutes": 1,
        "status": body.get("status").cloned().unwrap_or(json!("draft")),
    })
}

fn envelope(data: Value) -> Json<Value> {
    Json(json!({ "success": true, "message": "ok", "data": data }))
}

fn error_envelope(status: StatusCode, code: &str, message: &str) -> Response {
    (
        status,
        Json(json!({ "success": false, "error": { "code": code, "message": message } })),
    )
        .into_response()
}

async fn create_article(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    backend.record(Method::POST, "/articles".into(), &headers, Some(body.clone()));
    let n = backend.next_id.fetch_add(1, Ordering::SeqCst) + 1;
    (
        StatusCode::CREATED,
        envelope(article_json(&format!("article-{n}"), &body)),
    )
        .into_response()
}

async fn update_article(
    State(backend): State<Backend>,
    Path(key): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    backend.record(Method::PUT, format!("/articles/{key}"), &headers, Some(body.clone()));
    if backend.fail_updates.load(Ordering::SeqCst) {
        return error_envelope(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "database unavailable",
        );
    }
    envelope(article_json(&key, &body)).into_response()
}

async fn get_article(
    State(backend): State<Backend>,
    Path(key): Path<String>,
    headers: HeaderMap,
) -> Response {
    backend.record(Method::GET, format!("/articles/{key}"), &headers, None);
    match key.as_str() {
        "missing" => error_envelope(StatusCode::NOT_FOUND, "NOT_FOUND", "Article not found"),
        "broken" => (StatusCode::BAD_GATEWAY, "bad gateway").into_response(),
        _ => envelope(article_json(
            "article-42",
            &json!({ "title": "Stored", "content": "<p>Stored body</p>", "status": "published" }),
        ))
        .into_response(),
    }
}

async fn delete_article(
    State(backend): State<Backend>,
    Path(key): Path<String>,
    headers: HeaderMap,
) -> StatusCode {
    backend.record(Method::DELETE, format!("/articles/{key}"), &headers, None);
    StatusCode::NO_CONTENT
}
