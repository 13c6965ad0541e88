use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use tv_catalog::config::presets;
use tv_catalog::{app, AppState, MemoryStore};

fn actors_app() -> Router {
    let state = AppState::new(Arc::new(MemoryStore::new("id")), presets::actors()).unwrap();
    app(state, 64 * 1024)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, axum::http::HeaderMap, String) {
    let body = match body {
        Some(v) => Body::from(v.to_string()),
        None => Body::empty(),
    };
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_crud_over_http() {
    let app = actors_app();

    let (status, headers, body) = send(&app, "POST", "/actors", Some(json!({"id": "a1", "name": "X"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(headers["content-type"], "application/json");
    assert_eq!(headers["access-control-allow-origin"], "*");
    let created: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(created["name"], json!("X"));

    let (status, _, body) = send(&app, "GET", "/actors/a1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), created);

    let (status, _, body) = send(&app, "PUT", "/actors/a1", Some(json!({"name": "Y"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap()["name"], json!("Y"));

    let (status, _, body) = send(&app, "GET", "/actors", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap()["count"], json!(1));

    let (status, headers, body) = send(&app, "DELETE", "/actors/a1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert!(body.is_empty());

    let (status, _, _) = send(&app, "GET", "/actors/a1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unmatched_method_and_paths() {
    let app = actors_app();

    let (status, _, body) = send(&app, "PATCH", "/actors", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({"message": "no route for PATCH /actors"}));

    let (status, _, body) = send(&app, "GET", "/actors/a1/shows", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap(),
        json!({"message": "no route for GET /actors/a1/shows"})
    );

    let (status, _, _) = send(&app, "GET", "/shows", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_table_name_is_server_fault() {
    let app = app(AppState::unconfigured(), 1024);
    let (status, _, body) = send(&app, "GET", "/actors", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({"message": "internal server error"}));

    let (status, _, _) = send(&app, "GET", "/ready", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_common_routes() {
    let app = actors_app();
    let (status, _, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({"status": "ok"}));

    let (status, _, body) = send(&app, "GET", "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap()["collection"], json!("actors"));

    let (status, _, body) = send(&app, "GET", "/version", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap()["name"], json!("tv-catalog"));
}

#[tokio::test]
async fn test_post_without_body() {
    let app = actors_app();
    let (status, _, body) = send(&app, "POST", "/actors", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({"message": "request body is required"}));
}

#[tokio::test]
async fn test_oversized_body_gets_json_envelope() {
    let state = AppState::new(Arc::new(MemoryStore::new("id")), presets::actors()).unwrap();
    let app = app(state, 16);
    let payload = json!({"id": "a1", "name": "Someone With A Long Name"}).to_string();
    let request = Request::builder()
        .method("POST")
        .uri("/actors")
        .header("content-type", "application/json")
        .header("content-length", payload.len())
        .body(Body::from(payload))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(response.headers()["content-type"], "application/json");
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));

    let (status, headers, _) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["access-control-allow-origin"], "*");
}
