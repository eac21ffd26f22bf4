#![allow(dead_code)]

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

#[derive(Default)]
pub struct Backend {
    pub excuse_calls: AtomicUsize,
    pub css_hits: AtomicUsize,
    pub history_delay_ms: AtomicU64,
    pub saved: Mutex<Vec<(String, String)>>,
    pub last_body: Mutex<Option<Value>>,
}

impl Backend {
    pub fn excuse_calls(&self) -> usize {
        self.excuse_calls.load(Ordering::SeqCst)
    }

    pub fn css_hits(&self) -> usize {
        self.css_hits.load(Ordering::SeqCst)
    }

    pub fn delay_history(&self, delay: Duration) {
        self.history_delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn saved(&self) -> Vec<(String, String)> {
        self.saved.lock().unwrap().clone()
    }
}

fn record(backend: &Backend, endpoint: &str, body: &Value) {
    backend
        .saved
        .lock()
        .unwrap()
        .push((endpoint.to_string(), body["text"].as_str().unwrap_or_default().to_string()));
}

pub fn backend_router(backend: Arc<Backend>) -> Router {
    Router::new()
        .route(
            "/api/history",
            get(|State(backend): State<Arc<Backend>>| async move {
                let delay = backend.history_delay_ms.load(Ordering::SeqCst);
                if delay > 0 {
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
                Json(json!({ "history": [{ "text": "Missed the bus", "time": "2026-01-05 08:10" }] }))
            }),
        )
        .route(
            "/api/favorites",
            get(|| async { Json(json!({ "favorites": ["Dog ate homework", "<b>bold</b>"] })) }),
        )
        .route(
            "/api/rankings",
            get(|| async {
                Json(json!([
                    { "text": "a", "score": 5, "count": 5 },
                    { "text": "b" },
                    { "text": "c", "score": 9 }
                ]))
            }),
        )
        .route("/api/top-apologies", get(|| async { Json(json!([])) }))
        .route(
            "/api/calendar",
            get(|| async {
                Json(json!([
                    { "text": "first", "date": "2026-01-05", "time": "09:00 AM" },
                    { "text": "elsewhere", "date": "2026-01-04", "time": "11:00 AM" },
                    { "text": "second", "date": "2026-01-05", "time": "10:30 AM" }
                ]))
            }),
        )
        .route("/api/apology-calendar", get(|| async { "<html>gateway timeout</html>" }))
        .route(
            "/api/excuse",
            post(|State(backend): State<Arc<Backend>>, Json(body): Json<Value>| async move {
                backend.excuse_calls.fetch_add(1, Ordering::SeqCst);
                *backend.last_body.lock().unwrap() = Some(body.clone());
                Json(json!({
                    "english": format!("Stuck because of {}.", body["scenario"].as_str().unwrap_or_default()),
                    "translated": "Atascado."
                }))
            }),
        )
        .route("/api/apology", post(|| async { Json(json!({ "message": "I am truly sorry." })) }))
        .route(
            "/api/adjust-tone",
            post(|Json(body): Json<Value>| async move {
                Json(json!({ "adjusted": format!("[{}] {}", body["tone"].as_str().unwrap_or_default(), body["sentence"].as_str().unwrap_or_default()) }))
            }),
        )
        .route(
            "/api/complete-apology",
            post(|Json(body): Json<Value>| async move {
                Json(json!({ "completed": format!("{} ({})", body["start"].as_str().unwrap_or_default(), body["tone"].as_str().unwrap_or_default()) }))
            }),
        )
        .route(
            "/api/guilt-score",
            post(|Json(_body): Json<Value>| async { Json(json!({ "feedback": "42/100 – mild" })) }),
        )
        .route(
            "/api/screenshot-excuse",
            post(|| async { ([(header::CONTENT_TYPE, "image/png")], PNG_BYTES.to_vec()) }),
        )
        .route("/api/screenshot-apology", post(|| async { Json(json!({ "url": "null" })) }))
        .route("/api/favorite", post(|| async { Json(json!({ "message": "✅ Excuse added to favourites!" })) }))
        .route("/api/clear-rankings", post(|| async { Json(json!({ "message": "Smart rankings cleared." })) }))
        .route(
            "/api/memory",
            get(|Query(query): Query<HashMap<String, String>>| async move {
                let q = query.get("q").cloned().unwrap_or_default();
                Json(json!({ "matches": [format!("matched {q}")] }))
            }),
        )
        .route("/api/emergency", post(|| async { Json(json!({ "status": "ok" })) }))
        .route(
            "/api/schedule",
            post(|Json(body): Json<Value>| async move {
                Json(json!({ "message": format!("🚨 Emergency scheduled for {} {}", body["date"].as_str().unwrap_or_default(), body["time"].as_str().unwrap_or_default()) }))
            }),
        )
        .route(
            "/api/save-apology-history",
            post(|State(backend): State<Arc<Backend>>, Json(body): Json<Value>| async move {
                record(&backend, "/api/save-apology-history", &body);
                Json(json!({ "message": "Saved" }))
            }),
        )
        .route(
            "/api/update-latest-apology",
            post(|State(backend): State<Arc<Backend>>, Json(body): Json<Value>| async move {
                record(&backend, "/api/update-latest-apology", &body);
                Json(json!({ "status": "ok" }))
            }),
        )
        .route(
            "/static/style.css",
            get(|State(backend): State<Arc<Backend>>| async move {
                backend.css_hits.fetch_add(1, Ordering::SeqCst);
                ([(header::CONTENT_TYPE, "text/css")], "body { margin: 0; }").into_response()
            }),
        )
        .with_state(backend)
}

pub async fn spawn_backend() -> (String, Arc<Backend>) {
    let backend = Arc::new(Backend::default());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind backend");
    let addr = listener.local_addr().unwrap();
    let app = backend_router(Arc::clone(&backend));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), backend)
}

pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}
