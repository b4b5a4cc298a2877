use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::IndexOptions,
    Collection, Database, IndexModel,
};

use crate::error::{AppError, AppResult};
use crate::models::SensorMetadata;
use crate::services::geo::BoundingBox;
use crate::store::MetadataStore;

pub const SENSOR_COLLECTION: &str = "sensors";

/// Server error code for a unique index violation.
const DUPLICATE_KEY: i32 = 11000;

fn is_duplicate_key(e: &MongoError) -> bool {
    matches!(
        e.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY
    )
}

/// Metadata documents in the `sensors` collection, one per sensor name.
#[derive(Clone)]
pub struct MongoMetadataStore {
    collection: Collection<SensorMetadata>,
}

impl MongoMetadataStore {
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(SENSOR_COLLECTION),
        }
    }

    /// Create the unique name index and the location index used by box queries.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Document` if index creation fails.
    pub async fn ensure_indexes(&self) -> AppResult<()> {
        let by_name = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        let by_location = IndexModel::builder()
            .keys(doc! { "latitude": 1, "longitude": 1 })
            .build();

        self.collection.create_indexes([by_name, by_location]).await?;
        tracing::debug!(collection = SENSOR_COLLECTION, "metadata_indexes_ready");
        Ok(())
    }
}

#[async_trait]
impl MetadataStore for MongoMetadataStore {
    async fn create(&self, record: &SensorMetadata) -> AppResult<()> {
        match self.collection.insert_one(record).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => Err(AppError::Conflict(format!(
                "Metadata for sensor '{}' already exists",
                record.name
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<SensorMetadata>> {
        Ok(self.collection.find_one(doc! { "name": name }).await?)
    }

    async fn delete_by_name(&self, name: &str) -> AppResult<()> {
        self.collection.delete_one(doc! { "name": name }).await?;
        Ok(())
    }

    async fn find_in_box(&self, bounds: &BoundingBox) -> AppResult<Vec<SensorMetadata>> {
        let filter = doc! {
            "latitude": { "$gte": bounds.lat_min, "$lte": bounds.lat_max },
            "longitude": { "$gte": bounds.lon_min, "$lte": bounds.lon_max },
        };

        let records: Vec<SensorMetadata> = self.collection.find(filter).await?.try_collect().await?;
        Ok(records)
    }
}
