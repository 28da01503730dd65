#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use clickboard_gateway::{
    app_state::AppState,
    config::{AppConfig, Landing},
    obs::ServiceMetrics,
    router,
    store::MemoryClickStore,
};

struct Harness {
    app: Router,
    store: Arc<MemoryClickStore>,
    metrics: Arc<ServiceMetrics>,
}

fn harness_with(cfg: AppConfig) -> Harness {
    let store = Arc::new(MemoryClickStore::new());
    let metrics = Arc::new(ServiceMetrics::default());
    let state = AppState::new(cfg, store.clone(), Arc::clone(&metrics));
    Harness { app: router::build_router(state), store, metrics }
}

fn harness() -> Harness {
    harness_with(AppConfig::default())
}

async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, Vec<u8>) {
    let req = Request::builder().method(method).uri(uri).body(Body::empty()).unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn send_json(app: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let (status, body) = send(app, method, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn click_then_read_back() {
    let h = harness();

    let (status, body) = send_json(&h.app, Method::POST, "/log-click/Mbappe").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "success"}));

    let (status, body) = send_json(&h.app, Method::GET, "/clicks").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["button_id"], "Mbappe");
    let ts = body[0]["clicked_at"].as_str().unwrap();
    assert_eq!(ts.len(), "YYYY-MM-DD HH:MM:SS".len());
    assert_eq!(&ts[4..5], "-");
    assert_eq!(&ts[10..11], " ");

    let (status, body) = send_json(&h.app, Method::GET, "/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().contains(&json!({"button_id": "Mbappe", "count": 1})));
}

#[tokio::test]
async fn newest_click_comes_first() {
    let h = harness();
    send(&h.app, Method::POST, "/log-click/Neymar").await;
    send(&h.app, Method::POST, "/log-click/Messi").await;

    let (_, body) = send_json(&h.app, Method::GET, "/clicks").await;
    let ids: Vec<&str> = body.as_array().unwrap().iter().map(|c| c["button_id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["Messi", "Neymar"]);
}

#[tokio::test]
async fn clicks_capped_at_ten() {
    let h = harness();
    for i in 0..15 {
        send(&h.app, Method::POST, &format!("/log-click/p{i}")).await;
    }
    let (_, body) = send_json(&h.app, Method::GET, "/clicks").await;
    assert_eq!(body.as_array().unwrap().len(), 10);
    assert_eq!(body[0]["button_id"], "p14");
}

#[tokio::test]
async fn empty_table_gives_empty_arrays() {
    let h = harness();
    let (_, clicks) = send_json(&h.app, Method::GET, "/clicks").await;
    let (_, stats) = send_json(&h.app, Method::GET, "/stats").await;
    assert_eq!(clicks, json!([]));
    assert_eq!(stats, json!([]));
}

#[tokio::test]
async fn stats_count_each_button() {
    let h = harness();
    for _ in 0..3 {
        send(&h.app, Method::POST, "/log-click/Messi").await;
    }
    send(&h.app, Method::POST, "/log-click/Neymar").await;

    let (_, body) = send_json(&h.app, Method::GET, "/stats").await;
    assert_eq!(
        body,
        json!([
            {"button_id": "Messi", "count": 3},
            {"button_id": "Neymar", "count": 1},
        ])
    );
}

#[tokio::test]
async fn arbitrary_button_ids_are_accepted() {
    let h = harness();
    let (status, _) = send(&h.app, Method::POST, "/log-click/not%20a%20player").await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send_json(&h.app, Method::GET, "/stats").await;
    assert_eq!(body[0]["button_id"], "not a player");
}

#[tokio::test]
async fn storage_failure_is_500() {
    let h = harness();
    h.store.set_available(false);

    let (status, body) = send_json(&h.app, Method::POST, "/log-click/Messi").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"status": "error"}));

    let (status, _) = send(&h.app, Method::GET, "/clicks").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let (status, _) = send(&h.app, Method::GET, "/stats").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn health_follows_store_availability() {
    let h = harness();
    let (status, body) = send_json(&h.app, Method::GET, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy"}));

    h.store.set_available(false);
    let (status, body) = send_json(&h.app, Method::GET, "/health").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"status": "unhealthy"}));

    h.store.set_available(true);
    let (status, _) = send(&h.app, Method::GET, "/health").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn landing_serves_page_by_default() {
    let h = harness();
    let (status, body) = send(&h.app, Method::GET, "/").await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("logClick('Mbappe')"));
}

#[tokio::test]
async fn landing_can_serve_json() {
    let mut cfg = AppConfig::default();
    cfg.server.landing = Landing::Json;
    let h = harness_with(cfg);

    let (status, body) = send_json(&h.app, Method::GET, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Balloon de Oro API"}));
}

#[tokio::test]
async fn request_counter_matches_request_count() {
    let h = harness();
    for _ in 0..4 {
        send(&h.app, Method::GET, "/stats").await;
    }
    for id in ["Messi", "Neymar"] {
        send(&h.app, Method::POST, &format!("/log-click/{id}")).await;
    }

    let stats = [("endpoint", "/stats"), ("method", "GET"), ("status", "200")];
    assert_eq!(h.metrics.http_requests.get(&stats), 4);
    assert_eq!(h.metrics.http_duration.count(&[("endpoint", "/stats"), ("method", "GET")]), 4);
    assert_eq!(h.metrics.http_summary.count(&[("endpoint", "/stats"), ("method", "GET")]), 4);

    // path parameters collapse into the route template
    let clicks = [("endpoint", "/log-click/:button_id"), ("method", "POST"), ("status", "200")];
    assert_eq!(h.metrics.http_requests.get(&clicks), 2);
}

#[tokio::test]
async fn failed_requests_are_counted_by_status() {
    let h = harness();
    h.store.set_available(false);
    send(&h.app, Method::GET, "/health").await;

    let labels = [("endpoint", "/health"), ("method", "GET"), ("status", "500")];
    assert_eq!(h.metrics.http_requests.get(&labels), 1);
}

#[tokio::test]
async fn unmatched_route_is_recorded_as_unknown() {
    let h = harness();
    let (status, _) = send(&h.app, Method::GET, "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let labels = [("endpoint", "unknown"), ("method", "GET"), ("status", "404")];
    assert_eq!(h.metrics.http_requests.get(&labels), 1);
}

#[tokio::test]
async fn metrics_endpoint_exposes_text_format() {
    let h = harness();
    send(&h.app, Method::GET, "/clicks").await;
    send(&h.app, Method::GET, "/clicks").await;

    let req = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
    let resp = h.app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[header::CONTENT_TYPE],
        "text/plain; version=0.0.4; charset=utf-8"
    );

    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("# TYPE http_requests_total counter"));
    assert!(text.contains("http_requests_total{endpoint=\"/clicks\",method=\"GET\",status=\"200\"} 2"));
    assert!(text.contains("# TYPE http_request_duration_seconds histogram"));
    assert!(text.contains("http_request_duration_seconds_bucket{endpoint=\"/clicks\",method=\"GET\",le=\"+Inf\"} 2"));
    assert!(text.contains("# TYPE http_request_summary_seconds summary"));
    assert!(text.contains("http_request_summary_seconds_count{endpoint=\"/clicks\",method=\"GET\"} 2"));
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let h = harness();
    let req = Request::builder()
        .uri("/stats")
        .header(header::ORIGIN, "http://example.com")
        .body(Body::empty())
        .unwrap();
    let resp = h.app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}
