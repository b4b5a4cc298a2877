use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::common::AppState;
use crate::error::AppResult;
use crate::models::{SensorCreate, SensorReading};

use super::types::{IdentityResponse, ListQuery, NearQuery, SensorResponse};

/// Register a sensor
#[utoipa::path(
    post,
    path = "/api/sensors",
    request_body = SensorCreate,
    responses(
        (status = 201, description = "Sensor registered", body = SensorResponse),
        (status = 409, description = "Name already registered or unknown sensor type"),
    ),
    tag = "sensors"
)]
pub async fn register_sensor(
    State(state): State<AppState>,
    Json(request): Json<SensorCreate>,
) -> AppResult<(StatusCode, Json<SensorResponse>)> {
    let sensor = state.sensors.register_sensor(request).await?;
    Ok((StatusCode::CREATED, Json(sensor.into())))
}

/// List registered sensors
#[utoipa::path(
    get,
    path = "/api/sensors",
    params(ListQuery),
    responses(
        (status = 200, description = "Sensors retrieved successfully", body = Vec<IdentityResponse>),
    ),
    tag = "sensors"
)]
pub async fn list_sensors(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<IdentityResponse>>> {
    let identities = state.sensors.list_sensors(query.skip, query.limit).await?;

    Ok(Json(identities.into_iter().map(Into::into).collect()))
}

/// Find sensors around a point
///
/// The radius is converted to degrees (111.12 km per degree) and matched as a
/// lat/lon box. Sensors without a reading are included without reading fields.
#[utoipa::path(
    get,
    path = "/api/sensors/near",
    params(NearQuery),
    responses(
        (status = 200, description = "Sensors in range", body = Vec<SensorResponse>),
        (status = 400, description = "Invalid coordinates or radius"),
    ),
    tag = "sensors"
)]
pub async fn sensors_near(
    State(state): State<AppState>,
    Query(query): Query<NearQuery>,
) -> AppResult<Json<Vec<SensorResponse>>> {
    let sensors = state
        .sensors
        .sensors_near(query.latitude, query.longitude, query.radius)
        .await?;

    Ok(Json(sensors.into_iter().map(Into::into).collect()))
}

/// Get a sensor
#[utoipa::path(
    get,
    path = "/api/sensors/{sensor_id}",
    params(
        ("sensor_id" = i32, Path, description = "Sensor ID"),
    ),
    responses(
        (status = 200, description = "Sensor retrieved successfully", body = SensorResponse),
        (status = 404, description = "Sensor not found"),
    ),
    tag = "sensors"
)]
pub async fn get_sensor(
    State(state): State<AppState>,
    Path(sensor_id): Path<i32>,
) -> AppResult<Json<SensorResponse>> {
    let sensor = state.sensors.resolve_sensor(sensor_id).await?;
    Ok(Json(sensor.into()))
}

/// Deregister a sensor
#[utoipa::path(
    delete,
    path = "/api/sensors/{sensor_id}",
    params(
        ("sensor_id" = i32, Path, description = "Sensor ID"),
    ),
    responses(
        (status = 200, description = "Sensor removed", body = IdentityResponse),
        (status = 404, description = "Sensor not found"),
    ),
    tag = "sensors"
)]
pub async fn deregister_sensor(
    State(state): State<AppState>,
    Path(sensor_id): Path<i32>,
) -> AppResult<Json<IdentityResponse>> {
    let identity = state.sensors.deregister_sensor(sensor_id).await?;
    Ok(Json(identity.into()))
}

/// Record the latest reading of a sensor
#[utoipa::path(
    post,
    path = "/api/sensors/{sensor_id}/data",
    params(
        ("sensor_id" = i32, Path, description = "Sensor ID"),
    ),
    request_body = SensorReading,
    responses(
        (status = 200, description = "Reading stored", body = SensorResponse),
        (status = 404, description = "Sensor not found"),
        (status = 409, description = "Reading does not match the sensor type"),
    ),
    tag = "readings"
)]
pub async fn record_reading(
    State(state): State<AppState>,
    Path(sensor_id): Path<i32>,
    Json(reading): Json<SensorReading>,
) -> AppResult<Json<SensorResponse>> {
    let sensor = state.sensors.record_reading(sensor_id, reading).await?;
    Ok(Json(sensor.into()))
}

/// Get a sensor with its latest reading
#[utoipa::path(
    get,
    path = "/api/sensors/{sensor_id}/data",
    params(
        ("sensor_id" = i32, Path, description = "Sensor ID"),
    ),
    responses(
        (status = 200, description = "Latest reading", body = SensorResponse),
        (status = 404, description = "Sensor not found or no reading recorded"),
        (status = 409, description = "Stored reading does not match the sensor type"),
    ),
    tag = "readings"
)]
pub async fn get_reading(
    State(state): State<AppState>,
    Path(sensor_id): Path<i32>,
) -> AppResult<Json<SensorResponse>> {
    let sensor = state.sensors.get_reading(sensor_id).await?;
    Ok(Json(sensor.into()))
}
