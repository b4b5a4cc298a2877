use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::entity::sensors;
use crate::error::{AppError, AppResult};
use crate::models::SensorReading;

/// Identity rows are stored as-is in the relational store.
pub type SensorIdentity = sensors::Model;

/// Declared kind of a sensor. Decides which reading shape it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum SensorType {
    #[serde(alias = "Temperatura")]
    Temperature,
    #[serde(alias = "Velocitat")]
    Velocity,
}

impl SensorType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Temperature => "Temperature",
            Self::Velocity => "Velocity",
        }
    }

    /// Resolve a stored type tag.
    ///
    /// Legacy Catalan tags written by earlier deployments map onto the same
    /// variants.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Conflict` for any tag that is not a known sensor type.
    pub fn from_tag(tag: &str) -> AppResult<Self> {
        match tag {
            "Temperature" | "Temperatura" => Ok(Self::Temperature),
            "Velocity" | "Velocitat" => Ok(Self::Velocity),
            other => Err(AppError::Conflict(format!(
                "Sensor type '{other}' doesn't exist"
            ))),
        }
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registration payload.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SensorCreate {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// `Temperature` or `Velocity`
    #[serde(rename = "type")]
    pub sensor_type: String,
    pub mac_address: String,
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
    pub firmware_version: String,
}

/// Creation-time record kept in the document store, keyed by `name`.
///
/// `sensor_type` stays a raw tag so documents with an unknown type can still
/// be loaded and rejected explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorMetadata {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "type")]
    pub sensor_type: String,
    pub mac_address: String,
    pub manufacturer: String,
    pub model: String,
    #[serde(alias = "serie_number")]
    pub serial_number: String,
    pub firmware_version: String,
}

impl SensorMetadata {
    #[must_use]
    pub fn from_request(request: SensorCreate, sensor_type: SensorType) -> Self {
        Self {
            name: request.name,
            latitude: request.latitude,
            longitude: request.longitude,
            sensor_type: sensor_type.as_str().to_string(),
            mac_address: request.mac_address,
            manufacturer: request.manufacturer,
            model: request.model,
            serial_number: request.serial_number,
            firmware_version: request.firmware_version,
        }
    }
}

/// Identity + metadata, plus the latest reading when one is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledSensor {
    pub id: i32,
    pub name: String,
    pub joined_at: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub sensor_type: SensorType,
    pub mac_address: String,
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
    pub firmware_version: String,
    pub reading: Option<SensorReading>,
}

impl AssembledSensor {
    /// Merge an identity row with its metadata document.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Conflict` if the metadata carries an unknown type tag.
    pub fn merge(identity: &SensorIdentity, metadata: SensorMetadata) -> AppResult<Self> {
        let sensor_type = SensorType::from_tag(&metadata.sensor_type)?;

        Ok(Self {
            id: identity.id,
            name: identity.name.clone(),
            joined_at: identity.joined_at,
            latitude: metadata.latitude,
            longitude: metadata.longitude,
            sensor_type,
            mac_address: metadata.mac_address,
            manufacturer: metadata.manufacturer,
            model: metadata.model,
            serial_number: metadata.serial_number,
            firmware_version: metadata.firmware_version,
            reading: None,
        })
    }

    /// Attach a reading, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Conflict` if the reading variant differs from the
    /// sensor's declared type.
    pub fn with_reading(mut self, reading: SensorReading) -> AppResult<Self> {
        let given = reading.sensor_type();
        if given != self.sensor_type {
            return Err(AppError::Conflict(format!(
                "Sensor {} is of type {} but was given {} data",
                self.id, self.sensor_type, given
            )));
        }
        self.reading = Some(reading);
        Ok(self)
    }
}
