use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::{AssembledSensor, SensorIdentity, SensorReading, SensorType};

fn default_limit() -> u64 {
    100
}

/// Sensor as returned by the API: identity, metadata and, once recorded,
/// the latest reading flattened into the same object.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SensorResponse {
    pub id: i32,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub joined_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub sensor_type: SensorType,
    pub mac_address: String,
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
    pub firmware_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_level: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<String>,
    /// Temperature sensors only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Temperature sensors only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    /// Velocity sensors only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity: Option<f64>,
}

impl From<AssembledSensor> for SensorResponse {
    fn from(s: AssembledSensor) -> Self {
        let mut response = Self {
            id: s.id,
            name: s.name,
            latitude: s.latitude,
            longitude: s.longitude,
            joined_at: s.joined_at,
            sensor_type: s.sensor_type,
            mac_address: s.mac_address,
            manufacturer: s.manufacturer,
            model: s.model,
            serial_number: s.serial_number,
            firmware_version: s.firmware_version,
            battery_level: None,
            last_seen: None,
            temperature: None,
            humidity: None,
            velocity: None,
        };

        match s.reading {
            Some(SensorReading::Temperature(r)) => {
                response.battery_level = Some(r.battery_level);
                response.last_seen = Some(r.last_seen);
                response.temperature = Some(r.temperature);
                response.humidity = Some(r.humidity);
            }
            Some(SensorReading::Velocity(r)) => {
                response.battery_level = Some(r.battery_level);
                response.last_seen = Some(r.last_seen);
                response.velocity = Some(r.velocity);
            }
            None => {}
        }

        response
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IdentityResponse {
    pub id: i32,
    pub name: String,
    pub joined_at: DateTime<Utc>,
}

impl From<SensorIdentity> for IdentityResponse {
    fn from(s: SensorIdentity) -> Self {
        Self {
            id: s.id,
            name: s.name,
            joined_at: s.joined_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListQuery {
    /// Number of sensors to skip (default: 0)
    #[serde(default)]
    pub skip: u64,
    /// Maximum number of sensors to return (default: 100, max: 1000)
    #[serde(default = "default_limit")]
    pub limit: u64,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct NearQuery {
    pub latitude: f64,
    pub longitude: f64,
    /// Search radius in kilometres
    pub radius: f64,
}
