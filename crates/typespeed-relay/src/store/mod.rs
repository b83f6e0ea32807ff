//! Metric store clients.
//!
//! The scheduler writes and the HTTP handler reads through `MetricStore`;
//! the store is the only state the two share. Implementations must be safe
//! for concurrent use without extra locking.

pub mod memory;
pub mod redis_store;

use std::sync::Arc;

use async_trait::async_trait;
use typespeed_core::error::Result;

use crate::config::{StoreBackend, StoreSection};

pub use memory::MemoryStore;
pub use redis_store::RedisStore;

/// Single-key string store: overwrite, conditional seed, read.
#[async_trait]
pub trait MetricStore: Send + Sync {
    /// Connectivity check.
    async fn ping(&self) -> Result<()>;

    /// Unconditional overwrite, no expiry.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Write only when `key` is absent. Returns whether the write happened.
    async fn set_if_absent(&self, key: &str, value: &str) -> Result<bool>;

    /// Read `key`; absent keys are `NotFound`.
    async fn get(&self, key: &str) -> Result<String>;
}

pub type SharedStore = Arc<dyn MetricStore>;

/// Connect the configured backend and verify it answers.
pub async fn connect(cfg: &StoreSection) -> Result<SharedStore> {
    let store: SharedStore = match cfg.backend {
        StoreBackend::Redis => Arc::new(RedisStore::connect(&cfg.redis_url()).await?),
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    };
    store.ping().await?;
    Ok(store)
}
