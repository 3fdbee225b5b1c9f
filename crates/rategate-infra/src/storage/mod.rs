//! Counter store implementations - Redis and in-memory fallback.

mod memory;

pub use memory::MemoryCounterStore;

#[cfg(feature = "redis")]
mod redis;
#[cfg(feature = "redis")]
pub use self::redis::{RedisConfig, RedisCounterStore};
