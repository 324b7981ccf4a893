use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::models::reading::{NewReading, Snapshot};

/// Append-only store of sensor snapshots.
///
/// Implementations assign `created_at` themselves and define "latest" as the
/// maximum timestamp, ties going to the most recently inserted row.
#[async_trait]
pub trait ReadingStore: Send + Sync {
    /// Appends exactly one snapshot.
    async fn insert(&self, reading: &NewReading) -> Result<(), sqlx::Error>;

    /// Returns the latest snapshot, or `None` when nothing has been stored yet.
    async fn latest(&self) -> Result<Option<Snapshot>, sqlx::Error>;
}

/// `ReadingStore` backed by the `sensor_data` table.
#[derive(Clone)]
pub struct MySqlReadingStore {
    pool: MySqlPool,
}

impl MySqlReadingStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReadingStore for MySqlReadingStore {
    async fn insert(&self, reading: &NewReading) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO sensor_data (mq2, mq135, lm35dz, dm436, relay) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(reading.mq2.as_deref())
        .bind(reading.mq135.as_deref())
        .bind(reading.lm35dz.as_deref())
        .bind(reading.dm436.as_deref())
        .bind(reading.relay.as_deref())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn latest(&self) -> Result<Option<Snapshot>, sqlx::Error> {
        // TIMESTAMP has second resolution; `id` orders rows written within the same second.
        sqlx::query_as::<_, Snapshot>(
            r#"
            SELECT mq2, mq135, lm35dz, dm436, relay, created_at
            FROM sensor_data
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
    }
}
