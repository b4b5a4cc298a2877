pub mod health;
mod rate_limit;
pub mod sensors;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};

use rate_limit::ClientIpKeyExtractor;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::common::AppState;
use crate::models::{SensorCreate, SensorReading, SensorType, TemperatureReading, VelocityReading};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        sensors::register_sensor,
        sensors::list_sensors,
        sensors::sensors_near,
        sensors::get_sensor,
        sensors::deregister_sensor,
        sensors::record_reading,
        sensors::get_reading,
    ),
    components(
        schemas(
            SensorCreate,
            SensorType,
            SensorReading,
            TemperatureReading,
            VelocityReading,
            sensors::SensorResponse,
            sensors::IdentityResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sensors", description = "Sensor registration and lookup"),
        (name = "readings", description = "Latest sensor readings"),
    ),
    info(
        title = "Sensor Registry API",
        description = "Sensor identity, metadata and latest readings",
        version = "0.1.0"
    )
)]
struct ApiDoc;

pub fn build_router(state: AppState) -> Router {
    let config = &state.config;

    let api_routes_base = Router::new()
        .route(
            "/sensors",
            get(sensors::list_sensors).post(sensors::register_sensor),
        )
        .route("/sensors/near", get(sensors::sensors_near))
        .route(
            "/sensors/{sensor_id}",
            get(sensors::get_sensor).delete(sensors::deregister_sensor),
        )
        .route(
            "/sensors/{sensor_id}/data",
            post(sensors::record_reading).get(sensors::get_reading),
        );

    let api_routes = if config.disable_rate_limiting {
        tracing::warn!("Rate limiting DISABLED");
        api_routes_base
    } else {
        tracing::info!(
            rate = %format!("{}/s burst {}", config.rate_limit_per_second, config.rate_limit_burst),
            "Rate limiting configured"
        );

        let limiter = GovernorConfigBuilder::default()
            .key_extractor(ClientIpKeyExtractor)
            .per_second(config.rate_limit_per_second)
            .burst_size(config.rate_limit_burst)
            .finish()
            .expect("Failed to create rate limiter");

        api_routes_base.layer(GovernorLayer {
            config: Arc::new(limiter),
        })
    }
    .layer(RequestBodyLimitLayer::new(64 * 1024)); // 64KB body limit

    // Health check routes (NO rate limiting)
    let health_routes = Router::new().route("/healthz", get(health::healthz));

    // OpenAPI documentation
    let docs_routes = Router::new().merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(docs_routes)
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
