use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands};

use crate::error::AppResult;
use crate::store::ReadingCache;

/// Build a key from a prefix and components joined with `:`.
fn key(prefix: &str, components: &[&str]) -> String {
    let mut key = prefix.to_string();
    for c in components {
        key.push(':');
        key.push_str(c);
    }
    key
}

/// Key holding the latest reading of a sensor.
#[must_use]
pub fn reading_key(id: i32) -> String {
    key("reading", &[&id.to_string()])
}

/// Latest readings in Redis, one string value per sensor.
#[derive(Clone)]
pub struct RedisReadingCache {
    conn: ConnectionManager,
}

impl RedisReadingCache {
    #[must_use]
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl ReadingCache for RedisReadingCache {
    async fn put(&self, id: i32, reading: &str) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let () = conn.set(reading_key(id), reading).await?;
        Ok(())
    }

    async fn get(&self, id: i32) -> AppResult<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(reading_key(id)).await?;
        Ok(value)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let _removed: i64 = conn.del(reading_key(id)).await?;
        Ok(())
    }
}
