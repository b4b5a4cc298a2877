use std::sync::Arc;

use crate::config::Config;
use crate::services::SensorService;
use crate::store::memory::{MemoryIdentityStore, MemoryMetadataStore, MemoryReadingCache};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sensors: SensorService,
}

impl AppState {
    pub fn new(config: Config, sensors: SensorService) -> Self {
        Self {
            config: Arc::new(config),
            sensors,
        }
    }

    /// State backed by empty in-memory stores.
    pub fn in_memory(config: Config) -> Self {
        let sensors = SensorService::new(
            Arc::new(MemoryIdentityStore::new()),
            Arc::new(MemoryMetadataStore::new()),
            Arc::new(MemoryReadingCache::new()),
        );
        Self::new(config, sensors)
    }
}
