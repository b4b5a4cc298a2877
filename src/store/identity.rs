use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, SqlErr,
};

use crate::entity::sensors;
use crate::error::{AppError, AppResult};
use crate::models::SensorIdentity;
use crate::store::IdentityStore;

/// Identity rows in the `sensors` table.
#[derive(Clone)]
pub struct SeaOrmIdentityStore {
    db: DatabaseConnection,
}

impl SeaOrmIdentityStore {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl IdentityStore for SeaOrmIdentityStore {
    async fn create(&self, name: &str) -> AppResult<SensorIdentity> {
        let row = sensors::ActiveModel {
            name: Set(name.to_string()),
            joined_at: Set(Utc::now()),
            ..Default::default()
        };

        match row.insert(&self.db).await {
            Ok(model) => Ok(model),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => Err(
                AppError::Conflict(format!("Sensor '{name}' is already registered")),
            ),
            Err(e) => Err(e.into()),
        }
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Option<SensorIdentity>> {
        Ok(sensors::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn get_by_name(&self, name: &str) -> AppResult<Option<SensorIdentity>> {
        Ok(sensors::Entity::find()
            .filter(sensors::Column::Name.eq(name))
            .one(&self.db)
            .await?)
    }

    async fn list(&self, skip: u64, limit: u64) -> AppResult<Vec<SensorIdentity>> {
        Ok(sensors::Entity::find()
            .order_by_asc(sensors::Column::Id)
            .offset(skip)
            .limit(limit)
            .all(&self.db)
            .await?)
    }

    async fn delete_by_id(&self, id: i32) -> AppResult<SensorIdentity> {
        let existing = sensors::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Sensor {id} not found")))?;

        sensors::Entity::delete_by_id(id).exec(&self.db).await?;

        Ok(existing)
    }
}
