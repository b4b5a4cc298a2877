//! Latest-measurement payloads.
//!
//! Readings carry no type tag on the wire: the field set decides the variant.
//! When reading back from the cache the sensor's declared type picks the
//! variant instead, see [`SensorReading::from_json`].

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::models::SensorType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TemperatureReading {
    pub battery_level: f64,
    pub last_seen: String,
    /// Degrees Celsius
    pub temperature: f64,
    /// Relative humidity, percent
    pub humidity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VelocityReading {
    pub battery_level: f64,
    pub last_seen: String,
    pub velocity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum SensorReading {
    Temperature(TemperatureReading),
    Velocity(VelocityReading),
}

impl SensorReading {
    #[must_use]
    pub fn sensor_type(&self) -> SensorType {
        match self {
            Self::Temperature(_) => SensorType::Temperature,
            Self::Velocity(_) => SensorType::Velocity,
        }
    }

    #[must_use]
    pub fn battery_level(&self) -> f64 {
        match self {
            Self::Temperature(r) => r.battery_level,
            Self::Velocity(r) => r.battery_level,
        }
    }

    #[must_use]
    pub fn last_seen(&self) -> &str {
        match self {
            Self::Temperature(r) => &r.last_seen,
            Self::Velocity(r) => &r.last_seen,
        }
    }

    /// Serialize to the flat JSON object stored in the reading cache.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Serialization` if the payload cannot be encoded.
    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a cached payload as the variant of `sensor_type`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Conflict` when the stored payload does not have the
    /// shape of the declared type.
    pub fn from_json(sensor_type: SensorType, raw: &str) -> AppResult<Self> {
        let parsed = match sensor_type {
            SensorType::Temperature => serde_json::from_str(raw).map(Self::Temperature),
            SensorType::Velocity => serde_json::from_str(raw).map(Self::Velocity),
        };

        parsed.map_err(|e| {
            AppError::Conflict(format!(
                "Stored reading is not {sensor_type} data: {e}"
            ))
        })
    }
}
