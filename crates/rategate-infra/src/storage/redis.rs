//! Redis counter store - the distributed backend.
//!
//! Records are stored as hashes with the fields `limit`, `calls`,
//! `reset`, and `blocked` (0/1). The increment-and-read of `limit_rate`
//! runs as a Lua script so two concurrent callers on the same key can
//! never both observe a pre-increment count; create and block writes are
//! MULTI pipelines that also set the key TTL to the window or block
//! duration, letting stale keys self-clean.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, Script};

use rategate_core::domain::QuotaRecord;
use rategate_core::ports::{CounterStore, StoreError};

/// Redis connection configuration.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis URL (e.g., redis://localhost:6379)
    pub url: String,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Prefix prepended to every quota key
    pub key_prefix: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            connect_timeout: Duration::from_secs(5),
            key_prefix: "rategate".to_string(),
        }
    }
}

impl RedisConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            connect_timeout: Duration::from_secs(
                std::env::var("REDIS_CONNECT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
            key_prefix: std::env::var("RATEGATE_KEY_PREFIX")
                .unwrap_or_else(|_| "rategate".to_string()),
        }
    }
}

/// Redis-backed counter store.
///
/// Uses a connection manager for automatic reconnection and pooling.
pub struct RedisCounterStore {
    conn: ConnectionManager,
    config: RedisConfig,
    /// Lua script for the atomic increment-and-read of `limit_rate`
    increment_script: Script,
}

impl RedisCounterStore {
    pub async fn new(config: RedisConfig) -> Result<Self, StoreError> {
        let client =
            Client::open(config.url.as_str()).map_err(|e| StoreError::Connection(e.to_string()))?;

        // Use timeout to prevent hanging if Redis is unreachable
        let conn_manager_fut = ConnectionManager::new(client);
        let conn = tokio::time::timeout(config.connect_timeout, conn_manager_fut)
            .await
            .map_err(|_| StoreError::Connection("Connection timed out".to_string()))?
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        // Missing fields come back as empty strings rather than nils so
        // the reply table is never truncated.
        let increment_script = Script::new(
            r#"
            if redis.call('EXISTS', KEYS[1]) == 0 then
                return false
            end

            local calls = redis.call('HINCRBY', KEYS[1], 'calls', 1)
            local fields = redis.call('HMGET', KEYS[1], 'limit', 'reset', 'blocked')
            return {calls, fields[1] or '', fields[2] or '', fields[3] or '0'}
            "#,
        );

        tracing::info!(url = %config.url, "Connected to Redis counter store");

        Ok(Self {
            conn,
            config,
            increment_script,
        })
    }

    /// Create from environment configuration.
    pub async fn from_env() -> Result<Self, StoreError> {
        Self::new(RedisConfig::from_env()).await
    }

    fn make_key(&self, key: &str) -> String {
        format!("{}:{}", self.config.key_prefix, key)
    }

    fn parse_record(
        key: &str,
        calls: i64,
        limit: &str,
        reset: &str,
        blocked: &str,
    ) -> Option<QuotaRecord> {
        let (Ok(limit), Ok(reset_at)) = (limit.parse(), reset.parse()) else {
            tracing::warn!(key = %key, "Malformed quota record, treating as absent");
            return None;
        };
        Some(QuotaRecord {
            key: key.to_string(),
            limit,
            calls,
            reset_at,
            blocked: blocked == "1",
        })
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn get_rate_info(&self, key: &str) -> Result<Option<QuotaRecord>, StoreError> {
        let redis_key = self.make_key(key);
        let mut conn = self.conn.clone();

        let fields: HashMap<String, String> = conn
            .hgetall(&redis_key)
            .await
            .map_err(|e| StoreError::Operation(e.to_string()))?;

        if fields.is_empty() {
            return Ok(None);
        }

        let field = |name: &str| fields.get(name).cloned().unwrap_or_default();
        let Ok(calls) = field("calls").parse() else {
            tracing::warn!(key = %key, "Malformed quota record, treating as absent");
            return Ok(None);
        };
        Ok(Self::parse_record(
            key,
            calls,
            &field("limit"),
            &field("reset"),
            &field("blocked"),
        ))
    }

    async fn create_rate(
        &self,
        key: &str,
        limit: i64,
        period: u64,
    ) -> Result<QuotaRecord, StoreError> {
        let redis_key = self.make_key(key);
        let mut conn = self.conn.clone();
        let reset_at = Utc::now().timestamp() + period as i64;

        redis::pipe()
            .atomic()
            .del(&redis_key)
            .ignore()
            .hset_multiple(
                &redis_key,
                &[("limit", limit), ("calls", 1), ("reset", reset_at), ("blocked", 0)],
            )
            .ignore()
            .expire(&redis_key, period as i64)
            .ignore()
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| StoreError::Operation(e.to_string()))?;

        Ok(QuotaRecord::fresh(key, limit, reset_at))
    }

    async fn limit_rate(&self, key: &str) -> Result<Option<QuotaRecord>, StoreError> {
        let redis_key = self.make_key(key);
        let mut conn = self.conn.clone();

        let result: Option<(i64, String, String, String)> = self
            .increment_script
            .key(&redis_key)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| StoreError::Operation(e.to_string()))?;

        let Some((calls, limit, reset, blocked)) = result else {
            return Ok(None);
        };
        Ok(Self::parse_record(key, calls, &limit, &reset, &blocked))
    }

    async fn reset_rate(&self, key: &str) -> Result<bool, StoreError> {
        let redis_key = self.make_key(key);
        let mut conn = self.conn.clone();

        let removed: i64 = conn
            .del(&redis_key)
            .await
            .map_err(|e| StoreError::Operation(e.to_string()))?;
        Ok(removed > 0)
    }

    async fn set_block(
        &self,
        record: &mut QuotaRecord,
        block_period: u64,
    ) -> Result<bool, StoreError> {
        let redis_key = self.make_key(&record.key);
        let mut conn = self.conn.clone();
        let reset_at = Utc::now().timestamp() + block_period as i64;

        redis::pipe()
            .atomic()
            .hset_multiple(
                &redis_key,
                &[
                    ("limit", record.limit),
                    ("calls", record.calls),
                    ("reset", reset_at),
                    ("blocked", 1),
                ],
            )
            .ignore()
            .expire(&redis_key, block_period as i64)
            .ignore()
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| StoreError::Operation(e.to_string()))?;

        record.blocked = true;
        record.reset_at = reset_at;
        Ok(true)
    }
}
