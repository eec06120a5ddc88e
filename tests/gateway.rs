//! End-to-end tests through the gateway's HTTP surface.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tokio::net::TcpListener;

use beatbooks_gateway::{GatewayConfig, GatewayServer, Shutdown};

mod common;

async fn spawn_gateway(config: GatewayConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let server = GatewayServer::new(config).unwrap();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    (addr, shutdown)
}

fn http() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

#[tokio::test]
async fn health_answers_without_any_upstream() {
    let (addr, shutdown) = spawn_gateway(GatewayConfig::default()).await;

    let response = http()
        .get(format!("http://{addr}/"))
        .send()
        .await
        .expect("gateway unreachable");

    assert_eq!(response.status(), 200);
    assert!(response.headers().contains_key("x-request-id"));
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "beatbooks-gateway");

    shutdown.trigger();
}

#[tokio::test]
async fn forwards_path_query_and_request_id_to_upstream() {
    let seen = Arc::new(Mutex::new(Vec::<String>::new()));
    let capture = seen.clone();
    let upstream = common::start_upstream(move |head| {
        let capture = capture.clone();
        async move {
            capture.lock().unwrap().push(head);
            (200, r#"{"data":[]}"#.to_string())
        }
    })
    .await;

    let mut config = GatewayConfig::default();
    config.upstreams.data.base_url = format!("http://{upstream}");
    let (addr, shutdown) = spawn_gateway(config).await;

    let response = http()
        .get(format!("http://{addr}/odds/live?sport=nfl"))
        .header("x-request-id", "test-123")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["x-request-id"], "test-123");
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"data": []}));

    let heads = seen.lock().unwrap();
    assert_eq!(heads.len(), 1);
    let head = heads[0].to_lowercase();
    assert!(head.contains("get /odds/live?sport=nfl"), "head: {head}");
    assert!(head.contains("x-request-id: test-123"), "head: {head}");

    shutdown.trigger();
}

#[tokio::test]
async fn upstream_client_error_passes_through_verbatim() {
    let upstream = common::start_upstream(|_| async {
        (404, r#"{"error":"team not found"}"#.to_string())
    })
    .await;

    let mut config = GatewayConfig::default();
    config.upstreams.data.base_url = format!("http://{upstream}");
    let (addr, shutdown) = spawn_gateway(config).await;

    let response = http()
        .get(format!("http://{addr}/teams/XYZ/stats?season=2024"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "team not found"}));

    shutdown.trigger();
}

#[tokio::test]
async fn circuit_open_surfaces_machine_readable_code() {
    let upstream = common::start_upstream(|_| async {
        (503, r#"{"error":"unavailable"}"#.to_string())
    })
    .await;

    let mut config = GatewayConfig::default();
    config.upstreams.data.base_url = format!("http://{upstream}");
    config.circuit_breaker.failure_threshold = 1;
    config.retries.max_attempts = 1;
    let (addr, shutdown) = spawn_gateway(config).await;

    // First call trips the breaker and surfaces the upstream 503.
    let first = http()
        .get(format!("http://{addr}/games"))
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), 503);
    let body: Value = first.json().await.unwrap();
    assert_eq!(body, json!({"error": "unavailable"}));

    // Second call fast-fails with the circuit-open code.
    let second = http()
        .get(format!("http://{addr}/games"))
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), 503);
    let body: Value = second.json().await.unwrap();
    assert_eq!(body["error"]["code"], "CIRCUIT_OPEN");

    shutdown.trigger();
}

#[tokio::test]
async fn predictions_route_delegates_to_model_service() {
    let upstream = common::start_upstream(|head| async move {
        assert!(
            head.to_lowercase().contains("get /predict?team1=kc&team2=sf"),
            "head: {head}"
        );
        (200, r#"{"winner":"KC","confidence":0.73}"#.to_string())
    })
    .await;

    let mut config = GatewayConfig::default();
    config.upstreams.model.base_url = format!("http://{upstream}");
    let (addr, shutdown) = spawn_gateway(config).await;

    let response = http()
        .get(format!(
            "http://{addr}/predictions/predict?team1=KC&team2=SF"
        ))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["winner"], "KC");

    shutdown.trigger();
}

#[tokio::test]
async fn scrape_excel_posts_to_data_service() {
    let seen = Arc::new(Mutex::new(Vec::<String>::new()));
    let capture = seen.clone();
    let upstream = common::start_upstream(move |head| {
        let capture = capture.clone();
        async move {
            capture.lock().unwrap().push(head);
            (200, r#"{"queued":true}"#.to_string())
        }
    })
    .await;

    let mut config = GatewayConfig::default();
    config.upstreams.data.base_url = format!("http://{upstream}");
    let (addr, shutdown) = spawn_gateway(config).await;

    let response = http()
        .post(format!("http://{addr}/scrape/excel"))
        .json(&json!({"file": "week1.xlsx"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["queued"], true);

    let heads = seen.lock().unwrap();
    let head = heads[0].to_lowercase();
    assert!(head.contains("post /scrape/excel"), "head: {head}");
    assert!(head.contains("content-type: application/json"), "head: {head}");

    shutdown.trigger();
}

#[tokio::test]
async fn wildcard_cors_origin_is_skipped_without_panicking() {
    // Bypassing load_config (and with it validation), a wildcard origin must
    // not bring the server down; it is dropped from the CORS allow list.
    let mut config = GatewayConfig::default();
    config.cors.allowed_origins = vec!["*".to_string(), "http://localhost:3000".to_string()];
    let (addr, shutdown) = spawn_gateway(config).await;

    let response = http()
        .get(format!("http://{addr}/"))
        .header("origin", "http://localhost:3000")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:3000"
    );

    shutdown.trigger();
}

#[tokio::test]
async fn rate_limit_rejects_burst_overflow() {
    let mut config = GatewayConfig::default();
    config.rate_limit.enabled = true;
    config.rate_limit.requests_per_second = 1;
    config.rate_limit.burst_size = 1;
    let (addr, shutdown) = spawn_gateway(config).await;

    let client = http();
    let first = client.get(format!("http://{addr}/")).send().await.unwrap();
    assert_eq!(first.status(), 200);

    let second = client.get(format!("http://{addr}/")).send().await.unwrap();
    assert_eq!(second.status(), 429);
    let body: Value = second.json().await.unwrap();
    assert_eq!(body["error"]["code"], "RATE_LIMITED");

    shutdown.trigger();
}
