//! In-memory counter store - used as fallback when Redis is unavailable.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use rategate_core::domain::QuotaRecord;
use rategate_core::ports::{CounterStore, StoreError};

/// In-memory counter store using a HashMap behind an async RwLock.
///
/// The window expiry doubles as the backend TTL (they coincide by
/// construction), checked lazily on every access; lapsed entries are
/// removed and reported absent. Limits are per-process, not distributed
/// across instances. Note: state is lost on process restart.
pub struct MemoryCounterStore {
    records: RwLock<HashMap<String, QuotaRecord>>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    fn now() -> i64 {
        Utc::now().timestamp()
    }
}

impl Default for MemoryCounterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn get_rate_info(&self, key: &str) -> Result<Option<QuotaRecord>, StoreError> {
        // Lookup, expiry check, and reap happen under one write lock, as
        // in limit_rate: reaping after re-acquiring a lock could remove a
        // record another caller has recreated in the meantime.
        let mut records = self.records.write().await;
        let Some(record) = records.get(key) else {
            return Ok(None);
        };

        if record.is_expired(Self::now()) {
            records.remove(key);
            return Ok(None);
        }

        Ok(Some(record.clone()))
    }

    async fn create_rate(
        &self,
        key: &str,
        limit: i64,
        period: u64,
    ) -> Result<QuotaRecord, StoreError> {
        let record = QuotaRecord::fresh(key, limit, Self::now() + period as i64);
        let mut records = self.records.write().await;
        records.insert(key.to_string(), record.clone());
        Ok(record)
    }

    async fn limit_rate(&self, key: &str) -> Result<Option<QuotaRecord>, StoreError> {
        // Lookup, expiry check, and increment happen under one write
        // lock: the linearization point for concurrent callers.
        let mut records = self.records.write().await;
        let Some(record) = records.get_mut(key) else {
            return Ok(None);
        };

        if record.is_expired(Self::now()) {
            records.remove(key);
            return Ok(None);
        }

        record.calls += 1;
        Ok(Some(record.clone()))
    }

    async fn reset_rate(&self, key: &str) -> Result<bool, StoreError> {
        let mut records = self.records.write().await;
        Ok(records.remove(key).is_some())
    }

    async fn set_block(
        &self,
        record: &mut QuotaRecord,
        block_period: u64,
    ) -> Result<bool, StoreError> {
        record.blocked = true;
        record.reset_at = Self::now() + block_period as i64;

        let mut records = self.records.write().await;
        records.insert(record.key.clone(), record.clone());
        Ok(true)
    }
}
