//! In-process store backed by `DashMap`, for local runs and tests.

use async_trait::async_trait;
use dashmap::DashMap;

use typespeed_core::error::{Result, TypeSpeedError};

use super::MetricStore;

#[derive(Default)]
pub struct MemoryStore {
    map: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            map: DashMap::new(),
        }
    }
}

#[async_trait]
impl MetricStore for MemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str) -> Result<bool> {
        let mut inserted = false;
        self.map.entry(key.to_string()).or_insert_with(|| {
            inserted = true;
            value.to_string()
        });
        Ok(inserted)
    }

    async fn get(&self, key: &str) -> Result<String> {
        self.map
            .get(key)
            .map(|v| v.value().clone())
            .ok_or_else(|| TypeSpeedError::NotFound(key.to_string()))
    }
}
