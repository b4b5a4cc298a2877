//! HTTP tests against the router with in-memory stores.
//!
//! Run with: cargo test --test api_test

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use sensor_registry::common::AppState;
use sensor_registry::config::{Config, Deployment, StoreBackend};
use sensor_registry::routes::build_router;
use sensor_registry::services::SensorService;
use sensor_registry::store::memory::{
    MemoryIdentityStore, MemoryMetadataStore, MemoryReadingCache,
};
use sensor_registry::store::IdentityStore;

fn test_config() -> Config {
    Config {
        store_backend: StoreBackend::Memory,
        database_url: String::new(),
        mongodb_url: String::new(),
        mongodb_database: "sensors".to_string(),
        redis_url: String::new(),
        api_host: "127.0.0.1".to_string(),
        api_port: 0,
        disable_rate_limiting: true,
        rate_limit_per_second: 10,
        rate_limit_burst: 60,
        deployment: Deployment::Local,
    }
}

fn app() -> Router {
    build_router(AppState::in_memory(test_config()))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

fn sensor_body(name: &str, latitude: f64, longitude: f64, sensor_type: &str) -> Value {
    json!({
        "name": name,
        "latitude": latitude,
        "longitude": longitude,
        "type": sensor_type,
        "mac_address": "00:00:00:00:00:00",
        "manufacturer": "Dummy",
        "model": "Dummy Temp",
        "serial_number": "123456789",
        "firmware_version": "1.0"
    })
}

#[tokio::test]
async fn healthz_returns_ok() {
    let (status, _) = send(&app(), Method::GET, "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn register_record_and_read_back() {
    let app = app();

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/sensors",
        Some(sensor_body("s1", 41.0, 2.0, "Temperature")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "s1");
    assert_eq!(created["type"], "Temperature");
    assert!(created.get("temperature").is_none());
    let id = created["id"].as_i64().unwrap();

    let reading = json!({
        "battery_level": 80,
        "last_seen": "t0",
        "temperature": 21.5,
        "humidity": 40
    });
    let (status, recorded) = send(
        &app,
        Method::POST,
        &format!("/api/sensors/{id}/data"),
        Some(reading),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(recorded["temperature"], 21.5);

    let (status, fetched) = send(&app, Method::GET, &format!("/api/sensors/{id}/data"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["temperature"], 21.5);
    assert_eq!(fetched["humidity"], 40.0);
    assert_eq!(fetched["battery_level"], 80.0);
    assert_eq!(fetched["last_seen"], "t0");
    assert_eq!(fetched["latitude"], 41.0);
    assert!(fetched.get("velocity").is_none());
}

#[tokio::test]
async fn errors_map_to_status_codes() {
    let app = app();

    let (_, created) = send(
        &app,
        Method::POST,
        "/api/sensors",
        Some(sensor_body("v1", 41.0, 2.0, "Velocity")),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    // No reading yet
    let (status, body) = send(&app, Method::GET, &format!("/api/sensors/{id}/data"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    // Temperature data for a velocity sensor
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/sensors/{id}/data"),
        Some(json!({"battery_level": 1, "last_seen": "t", "temperature": 1, "humidity": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Duplicate name
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/sensors",
        Some(sensor_body("v1", 0.0, 0.0, "Velocity")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Unknown sensor
    let (status, _) = send(&app, Method::GET, "/api/sensors/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Negative radius
    let (status, _) = send(
        &app,
        Method::GET,
        "/api/sensors/near?latitude=41&longitude=2&radius=-1",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn near_list_and_delete() {
    let app = app();

    let (_, a) = send(
        &app,
        Method::POST,
        "/api/sensors",
        Some(sensor_body("a", 41.0, 2.0, "Temperature")),
    )
    .await;
    send(
        &app,
        Method::POST,
        "/api/sensors",
        Some(sensor_body("b", 45.0, 2.0, "Velocity")),
    )
    .await;
    let a_id = a["id"].as_i64().unwrap();

    let (status, listed) = send(&app, Method::GET, "/api/sensors?skip=0&limit=10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 2);

    let (status, near) = send(
        &app,
        Method::GET,
        "/api/sensors/near?latitude=41&longitude=2&radius=10",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let near = near.as_array().unwrap();
    assert_eq!(near.len(), 1);
    assert_eq!(near[0]["name"], "a");
    assert!(near[0].get("battery_level").is_none());

    let (status, deleted) = send(&app, Method::DELETE, &format!("/api/sensors/{a_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["name"], "a");

    let (status, _) = send(&app, Method::GET, &format!("/api/sensors/{a_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, near) = send(
        &app,
        Method::GET,
        "/api/sensors/near?latitude=41&longitude=2&radius=10",
        None,
    )
    .await;
    assert!(near.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn list_uses_default_page() {
    let identities = Arc::new(MemoryIdentityStore::new());
    for i in 0..105 {
        identities.create(&format!("sensor-{i}")).await.unwrap();
    }
    let sensors = SensorService::new(
        identities,
        Arc::new(MemoryMetadataStore::new()),
        Arc::new(MemoryReadingCache::new()),
    );
    let app = build_router(AppState::new(test_config(), sensors));

    let (status, listed) = send(&app, Method::GET, "/api/sensors", None).await;
    assert_eq!(status, StatusCode::OK);
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 100);
    assert_eq!(listed[0]["id"], 1);

    let (status, rest) = send(&app, Method::GET, "/api/sensors?skip=100", None).await;
    assert_eq!(status, StatusCode::OK);
    let rest = rest.as_array().unwrap();
    assert_eq!(rest.len(), 5);
    assert_eq!(rest[0]["name"], "sensor-100");
}

#[tokio::test]
async fn rate_limit_rejects_burst_overflow() {
    let config = Config {
        disable_rate_limiting: false,
        rate_limit_per_second: 1,
        rate_limit_burst: 2,
        ..test_config()
    };
    let app = build_router(AppState::in_memory(config));

    for _ in 0..2 {
        let (status, _) = send(&app, Method::GET, "/api/sensors", None).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, _) = send(&app, Method::GET, "/api/sensors", None).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    // Health checks sit outside the limiter
    let (status, _) = send(&app, Method::GET, "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
}
