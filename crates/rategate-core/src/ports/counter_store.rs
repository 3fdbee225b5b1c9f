//! Counter store port - abstraction over quota storage backends.

use async_trait::async_trait;

use crate::domain::QuotaRecord;

/// Counter store trait - the contract every quota backend must honor.
///
/// All shared mutable state lives behind this trait; the engine holds no
/// in-process state, so the backend is the single point of serialization
/// per key. `limit_rate` in particular must increment and read in one
/// indivisible backend operation: two concurrent callers on the same key
/// must never both observe a pre-increment count.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Fetch the record for `key`, or `None` if absent. A stored record
    /// with missing or unparseable fields is reported as absent, not as
    /// an error.
    async fn get_rate_info(&self, key: &str) -> Result<Option<QuotaRecord>, StoreError>;

    /// Unconditionally (re)initialize the record for `key` with one call
    /// counted and a backend expiry of `period` seconds. Overwrites any
    /// stale record under the same key.
    async fn create_rate(&self, key: &str, limit: i64, period: u64)
    -> Result<QuotaRecord, StoreError>;

    /// Atomically increment the call count and return the updated record,
    /// or `None` if the key is absent (the caller then calls
    /// [`create_rate`](CounterStore::create_rate)).
    async fn limit_rate(&self, key: &str) -> Result<Option<QuotaRecord>, StoreError>;

    /// Delete the record. Returns whether a record existed.
    async fn reset_rate(&self, key: &str) -> Result<bool, StoreError>;

    /// Mark the record blocked with a reset of now + `block_period`,
    /// leaving the call count unchanged and setting the backend expiry to
    /// `block_period`. Mutates `record` in place so the caller sees the
    /// transition immediately.
    async fn set_block(&self, record: &mut QuotaRecord, block_period: u64)
    -> Result<bool, StoreError>;
}

/// Counter store errors. Backend unavailability must surface here so the
/// engine can apply its fail-open or fail-closed policy instead of
/// silently treating the key as absent.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Operation failed: {0}")]
    Operation(String),
}
