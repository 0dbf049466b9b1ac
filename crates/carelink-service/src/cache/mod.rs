//! Caching infrastructure for the service layer.
//!
//! A JSON-string cache abstraction with a Redis implementation and an
//! in-process one. Only the profile and master-data caches talk to it.

mod cache_health;
mod cache_interface;
pub mod cache_keys;
mod memory_cache;
mod redis_cache;

pub use cache_health::CacheHealth;
pub use cache_interface::{CacheExt, CacheInterface};
pub use memory_cache::InMemoryCache;
pub use redis_cache::{RedisCacheService, RedisCacheServiceParameters};
