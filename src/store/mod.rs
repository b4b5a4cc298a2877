//! Adapters over the three backing stores.
//!
//! ```text
//! SensorService
//!   ├─ IdentityStore  → Postgres (sea-orm)   id, name, joined_at
//!   ├─ MetadataStore  → MongoDB              location, type, device info
//!   └─ ReadingCache   → Redis                latest reading JSON per id
//! ```
//!
//! Every adapter has an in-memory counterpart in [`memory`] with the same
//! contract.

mod identity;
pub mod memory;
mod metadata;
mod readings;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{SensorIdentity, SensorMetadata};
use crate::services::geo::BoundingBox;

pub use identity::SeaOrmIdentityStore;
pub use metadata::{MongoMetadataStore, SENSOR_COLLECTION};
pub use readings::{reading_key, RedisReadingCache};

#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Insert a new identity. Fails with `Conflict` if the name is taken.
    async fn create(&self, name: &str) -> AppResult<SensorIdentity>;

    async fn get_by_id(&self, id: i32) -> AppResult<Option<SensorIdentity>>;

    async fn get_by_name(&self, name: &str) -> AppResult<Option<SensorIdentity>>;

    /// Page through identities in id order.
    async fn list(&self, skip: u64, limit: u64) -> AppResult<Vec<SensorIdentity>>;

    /// Remove an identity and return the removed row. Fails with `NotFound`
    /// if there is no such id.
    async fn delete_by_id(&self, id: i32) -> AppResult<SensorIdentity>;
}

#[async_trait]
pub trait MetadataStore: Send + Sync {
    async fn create(&self, record: &SensorMetadata) -> AppResult<()>;

    async fn find_by_name(&self, name: &str) -> AppResult<Option<SensorMetadata>>;

    async fn delete_by_name(&self, name: &str) -> AppResult<()>;

    /// All records inside the box, edges included, in store order.
    async fn find_in_box(&self, bounds: &BoundingBox) -> AppResult<Vec<SensorMetadata>>;
}

/// Latest reading per sensor id. Payloads are opaque JSON strings.
#[async_trait]
pub trait ReadingCache: Send + Sync {
    /// Store a payload, overwriting any previous one.
    async fn put(&self, id: i32, reading: &str) -> AppResult<()>;

    async fn get(&self, id: i32) -> AppResult<Option<String>>;

    /// Remove the payload. A missing entry is not an error.
    async fn delete(&self, id: i32) -> AppResult<()>;
}
