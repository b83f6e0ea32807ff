use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;
use typespeed_core::error::{Result, TypeSpeedError};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub store: StoreSection,

    #[serde(default)]
    pub upstream: UpstreamSection,

    #[serde(default)]
    pub schedule: ScheduleSection,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            store: StoreSection::default(),
            upstream: UpstreamSection::default(),
            schedule: ScheduleSection::default(),
        }
    }
}

impl RelayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(TypeSpeedError::Config(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.server.validate()?;
        self.store.validate()?;
        self.upstream.validate()?;
        self.schedule.validate()?;

        Ok(())
    }

    /// Overlay environment variables. `lookup` is injected so tests never
    /// touch the process environment.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("REDIS_ADDR") {
            self.store.addr = v;
        }
        if let Some(v) = lookup("STORE_BACKEND") {
            self.store.backend = v.parse()?;
        }
        if let Some(v) = lookup("API_URL") {
            self.upstream.url = v;
        }
        if let Some(v) = lookup("APE_KEY") {
            self.upstream.api_key = v;
        }
        if let Some(v) = lookup("LISTEN_ADDR") {
            self.server.listen = v;
        }
        if let Some(v) = lookup("FETCH_INTERVAL_SECS") {
            self.schedule.interval_secs = v.trim().parse().map_err(|_| {
                TypeSpeedError::Config(format!("FETCH_INTERVAL_SECS must be an integer: {v}"))
            })?;
        }
        if let Some(v) = lookup("ON_FETCH_FAILURE") {
            self.schedule.on_failure = v.parse()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|_| {
            TypeSpeedError::Config(format!(
                "server.listen must be a valid socket address: {}",
                self.listen
            ))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Redis,
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = TypeSpeedError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(StoreBackend::Redis),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(TypeSpeedError::Config(format!(
                "store.backend must be redis or memory: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSection {
    #[serde(default)]
    pub backend: StoreBackend,

    #[serde(default = "default_redis_addr")]
    pub addr: String,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            addr: default_redis_addr(),
        }
    }
}

impl StoreSection {
    pub fn validate(&self) -> Result<()> {
        if self.backend == StoreBackend::Redis && self.addr.trim().is_empty() {
            return Err(TypeSpeedError::Config("store.addr must not be empty".into()));
        }
        Ok(())
    }

    /// Connection URL for the redis client; bare `host:port` gets a scheme.
    pub fn redis_url(&self) -> String {
        if self.addr.contains("://") {
            self.addr.clone()
        } else {
            format!("redis://{}", self.addr)
        }
    }
}

fn default_redis_addr() -> String {
    "redis:6379".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamSection {
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_auth_scheme")]
    pub auth_scheme: String,
}

impl Default for UpstreamSection {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            auth_scheme: default_auth_scheme(),
        }
    }
}

impl UpstreamSection {
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(TypeSpeedError::Config(
                "upstream.url must be set (API_URL)".into(),
            ));
        }
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(TypeSpeedError::Config(format!(
                "upstream.url must be an http(s) url: {}",
                self.url
            )));
        }
        if self.auth_scheme.trim().is_empty() {
            return Err(TypeSpeedError::Config(
                "upstream.auth_scheme must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Value for the `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("{} {}", self.auth_scheme, self.api_key)
    }
}

fn default_auth_scheme() -> String {
    "ApeKey".into()
}

/// What a failed tick does to the cached value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Leave the previous value in place.
    #[default]
    Keep,
    /// Overwrite with `0`.
    Reset,
}

impl std::str::FromStr for FailurePolicy {
    type Err = TypeSpeedError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keep" => Ok(FailurePolicy::Keep),
            "reset" => Ok(FailurePolicy::Reset),
            other => Err(TypeSpeedError::Config(format!(
                "schedule.on_failure must be keep or reset: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleSection {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    #[serde(default)]
    pub on_failure: FailurePolicy,
}

impl Default for ScheduleSection {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            on_failure: FailurePolicy::default(),
        }
    }
}

impl ScheduleSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=86_400).contains(&self.interval_secs) {
            return Err(TypeSpeedError::Config(
                "schedule.interval_secs must be between 1 and 86400".into(),
            ));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

fn default_interval_secs() -> u64 {
    5
}
