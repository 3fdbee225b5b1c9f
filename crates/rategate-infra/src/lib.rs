//! # Rategate Infrastructure
//!
//! Concrete implementations of the ports defined in `rategate-core`:
//! quota counter stores and the declarative path-rule provider.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All backends enabled
//! - `minimal` - In-memory only
//! - `redis` - Redis counter store

pub mod rules;
pub mod storage;

pub use rules::{PathLimit, PathLimits};
pub use storage::MemoryCounterStore;

#[cfg(feature = "redis")]
pub use storage::{RedisConfig, RedisCounterStore};
