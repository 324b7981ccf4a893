//! In-process `ReadingStore` used by handler tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, DurationRound, TimeDelta, Utc};

use crate::models::reading::{NewReading, Snapshot};
use crate::readings::store::ReadingStore;

/// Mirrors MySQL's behaviour closely enough for the endpoint contract:
/// second-resolution timestamps assigned on insert and an insertion counter as tie-breaker.
#[derive(Default)]
pub struct MemoryReadingStore {
    rows: Mutex<Vec<(u64, Snapshot)>>,
    offline: AtomicBool,
}

impl MemoryReadingStore {
    /// Makes every subsequent call fail the way an unreachable server would.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Inserts with a caller-chosen timestamp so ordering can be tested deterministically.
    pub fn insert_at(&self, reading: &NewReading, created_at: DateTime<Utc>) {
        let mut rows = self.rows.lock().unwrap();
        let id = rows.len() as u64 + 1;
        rows.push((id, reading.clone().into_snapshot(created_at)));
    }

    fn check_online(&self) -> Result<(), sqlx::Error> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(())
    }
}

#[async_trait]
impl ReadingStore for MemoryReadingStore {
    async fn insert(&self, reading: &NewReading) -> Result<(), sqlx::Error> {
        self.check_online()?;
        let now = Utc::now()
            .duration_trunc(TimeDelta::seconds(1))
            .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;
        self.insert_at(reading, now);
        Ok(())
    }

    async fn latest(&self) -> Result<Option<Snapshot>, sqlx::Error> {
        self.check_online()?;
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .max_by_key(|(id, snapshot)| (snapshot.created_at, *id))
            .map(|(_, snapshot)| snapshot.clone()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn reading(mq2: &str) -> NewReading {
        NewReading {
            mq2: Some(mq2.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_empty_store_has_no_latest() {
        let store = MemoryReadingStore::default();
        assert_eq!(store.latest().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_same_second_favors_later_insert() {
        let store = MemoryReadingStore::default();
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        store.insert_at(&reading("a"), ts);
        store.insert_at(&reading("b"), ts);

        let latest = store.latest().await.unwrap().unwrap();
        assert_eq!(latest.mq2.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn test_later_timestamp_beats_later_insert() {
        let store = MemoryReadingStore::default();
        let early = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 5).unwrap();
        store.insert_at(&reading("late"), late);
        store.insert_at(&reading("early"), early);

        let latest = store.latest().await.unwrap().unwrap();
        assert_eq!(latest.mq2.as_deref(), Some("late"));
    }
}
