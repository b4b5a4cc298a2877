//! Sensor assembly across the identity, metadata and reading stores.
//!
//! Each operation is a short sequence of store calls run one after another.
//! Nothing here holds state between calls.
//!
//! # Cross-store consistency
//!
//! | Operation | Partial failure |
//! |-----------|-----------------|
//! | `register_sensor` | metadata write fails → identity row removed again |
//! | `deregister_sensor` | no rollback; later steps are skipped |
//! | `record_reading` | single write, nothing to undo |

use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{
    AssembledSensor, SensorCreate, SensorIdentity, SensorMetadata, SensorReading, SensorType,
};
use crate::services::geo::BoundingBox;
use crate::store::{IdentityStore, MetadataStore, ReadingCache};

/// Largest page `list_sensors` will return.
pub const MAX_PAGE_LIMIT: u64 = 1000;

#[derive(Clone)]
pub struct SensorService {
    identities: Arc<dyn IdentityStore>,
    metadata: Arc<dyn MetadataStore>,
    readings: Arc<dyn ReadingCache>,
}

impl SensorService {
    pub fn new(
        identities: Arc<dyn IdentityStore>,
        metadata: Arc<dyn MetadataStore>,
        readings: Arc<dyn ReadingCache>,
    ) -> Self {
        Self {
            identities,
            metadata,
            readings,
        }
    }

    /// Register a new sensor in the identity and metadata stores.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the type tag is unknown or the name is already taken.
    /// - Any store error from the metadata write, after the identity row has
    ///   been removed again.
    pub async fn register_sensor(&self, request: SensorCreate) -> AppResult<AssembledSensor> {
        let sensor_type = SensorType::from_tag(&request.sensor_type)?;

        if self.identities.get_by_name(&request.name).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Sensor '{}' is already registered",
                request.name
            )));
        }

        let identity = self.identities.create(&request.name).await?;
        let metadata = SensorMetadata::from_request(request, sensor_type);

        if let Err(e) = self.metadata.create(&metadata).await {
            tracing::warn!(
                sensor_id = identity.id,
                name = %identity.name,
                error = %e,
                "Metadata write failed, removing identity"
            );
            if let Err(undo) = self.identities.delete_by_id(identity.id).await {
                tracing::error!(
                    sensor_id = identity.id,
                    error = %undo,
                    "Could not remove identity, sensor left orphaned"
                );
            }
            return Err(e);
        }

        tracing::info!(
            sensor_id = identity.id,
            name = %identity.name,
            sensor_type = %sensor_type,
            "Sensor registered"
        );

        AssembledSensor::merge(&identity, metadata)
    }

    /// Page through registered identities.
    ///
    /// # Errors
    ///
    /// Returns a store error if the identity query fails.
    pub async fn list_sensors(&self, skip: u64, limit: u64) -> AppResult<Vec<SensorIdentity>> {
        self.identities.list(skip, limit.min(MAX_PAGE_LIMIT)).await
    }

    /// Identity + metadata for a sensor, without its reading.
    ///
    /// # Errors
    ///
    /// - `NotFound` if there is no identity or no metadata for `id`.
    /// - `Conflict` if the stored type tag is unknown.
    pub async fn resolve_sensor(&self, id: i32) -> AppResult<AssembledSensor> {
        let identity = self
            .identities
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Sensor {id} not found")))?;

        self.assemble(&identity).await
    }

    /// Validate a reading against the sensor's type and store it as the latest.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the sensor does not exist.
    /// - `Conflict` if the reading variant does not match the declared type.
    pub async fn record_reading(
        &self,
        id: i32,
        reading: SensorReading,
    ) -> AppResult<AssembledSensor> {
        let sensor = self.resolve_sensor(id).await?.with_reading(reading)?;

        if let Some(reading) = &sensor.reading {
            self.readings.put(id, &reading.to_json()?).await?;
        }

        tracing::debug!(
            sensor_id = id,
            sensor_type = %sensor.sensor_type,
            "Reading recorded"
        );

        Ok(sensor)
    }

    /// Sensor with its latest reading.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the sensor does not exist or has no reading yet.
    /// - `Conflict` if the stored reading does not fit the declared type.
    pub async fn get_reading(&self, id: i32) -> AppResult<AssembledSensor> {
        let sensor = self.resolve_sensor(id).await?;

        match self.cached_reading(&sensor).await? {
            Some(reading) => sensor.with_reading(reading),
            None => Err(AppError::NotFound(format!("No data recorded for sensor {id}"))),
        }
    }

    /// Remove a sensor from all three stores and return its identity.
    ///
    /// # Errors
    ///
    /// - `NotFound` if there is no identity for `id`.
    /// - Any store error; stores already cleaned up are not restored.
    pub async fn deregister_sensor(&self, id: i32) -> AppResult<SensorIdentity> {
        let identity = self
            .identities
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Sensor {id} not found")))?;

        self.metadata.delete_by_name(&identity.name).await?;
        self.readings.delete(id).await?;
        let deleted = self.identities.delete_by_id(id).await?;

        tracing::info!(sensor_id = id, name = %identity.name, "Sensor deregistered");

        Ok(deleted)
    }

    /// Sensors inside the box of half-width `radius_km` around a point.
    ///
    /// Sensors without a reading are returned bare rather than failing.
    ///
    /// # Errors
    ///
    /// - `BadRequest` for a negative radius or non-finite coordinates.
    /// - `Conflict` if a matching sensor has an unknown type or a reading of
    ///   the wrong shape.
    pub async fn sensors_near(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> AppResult<Vec<AssembledSensor>> {
        if !latitude.is_finite() || !longitude.is_finite() || !radius_km.is_finite() {
            return Err(AppError::BadRequest(
                "latitude, longitude and radius must be finite numbers".to_string(),
            ));
        }
        if radius_km < 0.0 {
            return Err(AppError::BadRequest(format!(
                "radius must not be negative, got {radius_km}"
            )));
        }

        let bounds = BoundingBox::around(latitude, longitude, radius_km);
        let records = self.metadata.find_in_box(&bounds).await?;

        let mut sensors = Vec::with_capacity(records.len());
        for metadata in records {
            let Some(identity) = self.identities.get_by_name(&metadata.name).await? else {
                tracing::warn!(name = %metadata.name, "Metadata without identity, skipping");
                continue;
            };

            let sensor = AssembledSensor::merge(&identity, metadata)?;
            let sensor = match self.cached_reading(&sensor).await? {
                Some(reading) => sensor.with_reading(reading)?,
                None => sensor,
            };
            sensors.push(sensor);
        }

        tracing::debug!(
            latitude,
            longitude,
            radius_km,
            matches = sensors.len(),
            "Proximity query"
        );

        Ok(sensors)
    }

    async fn assemble(&self, identity: &SensorIdentity) -> AppResult<AssembledSensor> {
        let metadata = self
            .metadata
            .find_by_name(&identity.name)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Metadata for sensor '{}' not found", identity.name))
            })?;

        AssembledSensor::merge(identity, metadata)
    }

    async fn cached_reading(&self, sensor: &AssembledSensor) -> AppResult<Option<SensorReading>> {
        match self.readings.get(sensor.id).await? {
            Some(raw) => SensorReading::from_json(sensor.sensor_type, &raw).map(Some),
            None => Ok(None),
        }
    }
}
