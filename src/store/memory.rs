//! Process-local store implementations.
//!
//! Same contracts as the external adapters: store-generated ids starting at
//! 1, unique names, insertion-ordered scans. Used by the test suite and by
//! `STORE_BACKEND=memory`.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};
use crate::models::{SensorIdentity, SensorMetadata};
use crate::services::geo::BoundingBox;
use crate::store::{IdentityStore, MetadataStore, ReadingCache};

#[derive(Default)]
struct IdentityTable {
    next_id: i32,
    rows: BTreeMap<i32, SensorIdentity>,
}

#[derive(Default)]
pub struct MemoryIdentityStore {
    table: RwLock<IdentityTable>,
}

impl MemoryIdentityStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn create(&self, name: &str) -> AppResult<SensorIdentity> {
        let mut table = self.table.write().await;
        if table.rows.values().any(|row| row.name == name) {
            return Err(AppError::Conflict(format!(
                "Sensor '{name}' is already registered"
            )));
        }

        table.next_id += 1;
        let row = SensorIdentity {
            id: table.next_id,
            name: name.to_string(),
            joined_at: Utc::now(),
        };
        table.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Option<SensorIdentity>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn get_by_name(&self, name: &str) -> AppResult<Option<SensorIdentity>> {
        Ok(self
            .table
            .read()
            .await
            .rows
            .values()
            .find(|row| row.name == name)
            .cloned())
    }

    async fn list(&self, skip: u64, limit: u64) -> AppResult<Vec<SensorIdentity>> {
        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(self
            .table
            .read()
            .await
            .rows
            .values()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn delete_by_id(&self, id: i32) -> AppResult<SensorIdentity> {
        self.table
            .write()
            .await
            .rows
            .remove(&id)
            .ok_or_else(|| AppError::NotFound(format!("Sensor {id} not found")))
    }
}

#[derive(Default)]
pub struct MemoryMetadataStore {
    records: RwLock<Vec<SensorMetadata>>,
}

impl MemoryMetadataStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MetadataStore for MemoryMetadataStore {
    async fn create(&self, record: &SensorMetadata) -> AppResult<()> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.name == record.name) {
            return Err(AppError::Conflict(format!(
                "Metadata for sensor '{}' already exists",
                record.name
            )));
        }
        records.push(record.clone());
        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<SensorMetadata>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .find(|r| r.name == name)
            .cloned())
    }

    async fn delete_by_name(&self, name: &str) -> AppResult<()> {
        let mut records = self.records.write().await;
        if let Some(pos) = records.iter().position(|r| r.name == name) {
            records.remove(pos);
        }
        Ok(())
    }

    async fn find_in_box(&self, bounds: &BoundingBox) -> AppResult<Vec<SensorMetadata>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|r| bounds.contains(r.latitude, r.longitude))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryReadingCache {
    values: RwLock<HashMap<i32, String>>,
}

impl MemoryReadingCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReadingCache for MemoryReadingCache {
    async fn put(&self, id: i32, reading: &str) -> AppResult<()> {
        self.values.write().await.insert(id, reading.to_string());
        Ok(())
    }

    async fn get(&self, id: i32) -> AppResult<Option<String>> {
        Ok(self.values.read().await.get(&id).cloned())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        self.values.write().await.remove(&id);
        Ok(())
    }
}
