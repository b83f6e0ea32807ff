//! Redis-backed store.
//!
//! Uses a `ConnectionManager`: one multiplexed connection, cloned per call,
//! reconnecting on its own after the initial handshake. The handshake itself
//! is a single bounded attempt; the manager's retry schedule only applies to
//! later reconnects.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use typespeed_core::error::{Result, TypeSpeedError};

use super::MetricStore;

/// Upper bound on the startup connect + PING.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Open the client, check it answers once, then establish the managed
    /// connection. An unreachable server fails within `CONNECT_TIMEOUT`.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| TypeSpeedError::ConnectFailure(format!("{url}: {e}")))?;

        tokio::time::timeout(CONNECT_TIMEOUT, probe(&client))
            .await
            .map_err(|_| {
                TypeSpeedError::ConnectFailure(format!(
                    "{url}: no answer within {}s",
                    CONNECT_TIMEOUT.as_secs()
                ))
            })?
            .map_err(|e| TypeSpeedError::ConnectFailure(format!("{url}: {e}")))?;

        let conn = tokio::time::timeout(CONNECT_TIMEOUT, ConnectionManager::new(client))
            .await
            .map_err(|_| TypeSpeedError::ConnectFailure(format!("{url}: manager setup timed out")))?
            .map_err(|e| TypeSpeedError::ConnectFailure(format!("{url}: {e}")))?;
        Ok(Self { conn })
    }
}

async fn probe(client: &redis::Client) -> redis::RedisResult<()> {
    let mut conn = client.get_multiplexed_async_connection().await?;
    let _: String = redis::cmd("PING").query_async(&mut conn).await?;
    Ok(())
}

#[async_trait]
impl MetricStore for RedisStore {
    async fn ping(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| TypeSpeedError::ConnectFailure(e.to_string()))?;
        tracing::debug!(reply = %pong, "redis ping");
        Ok(())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, value)
            .await
            .map_err(|e| TypeSpeedError::StoreWrite(e.to_string()))
    }

    async fn set_if_absent(&self, key: &str, value: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        conn.set_nx::<_, _, bool>(key, value)
            .await
            .map_err(|e| TypeSpeedError::StoreWrite(e.to_string()))
    }

    async fn get(&self, key: &str) -> Result<String> {
        let mut conn = self.conn.clone();
        let value = conn
            .get::<_, Option<String>>(key)
            .await
            .map_err(|e| TypeSpeedError::StoreRead(e.to_string()))?;
        value.ok_or_else(|| TypeSpeedError::NotFound(key.to_string()))
    }
}
