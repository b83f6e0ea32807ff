//! Relay config loader (strict YAML, then environment overrides).

pub mod schema;

use std::{fs, path::Path};

use typespeed_core::error::{Result, TypeSpeedError};

pub use schema::{
    FailurePolicy, RelayConfig, ScheduleSection, ServerSection, StoreBackend, StoreSection,
    UpstreamSection,
};

/// Default config file, optional.
pub const DEFAULT_CONFIG_PATH: &str = "typespeed.yaml";

/// Env var naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "TYPESPEED_CONFIG";

/// Build the effective config from `.env`, the YAML file, and the process env.
pub fn load() -> Result<RelayConfig> {
    // .env is optional; only a malformed one is worth a warning.
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            tracing::warn!(error = %e, ".env could not be loaded");
        }
    }

    let mut cfg = match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) => load_from_file(&path)?,
        Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => load_from_file(DEFAULT_CONFIG_PATH)?,
        Err(_) => RelayConfig::default(),
    };

    cfg.apply_env(|k| std::env::var(k).ok())?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_from_file(path: &str) -> Result<RelayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| TypeSpeedError::Config(format!("read {path} failed: {e}")))?;
    parse_yaml(&s)
}

/// Parse YAML without validating; env overrides may still fill gaps.
pub fn parse_yaml(s: &str) -> Result<RelayConfig> {
    serde_yaml::from_str(s).map_err(|e| TypeSpeedError::Config(format!("invalid yaml: {e}")))
}

/// Parse and validate a complete YAML document.
pub fn load_from_str(s: &str) -> Result<RelayConfig> {
    let cfg = parse_yaml(s)?;
    cfg.validate()?;
    Ok(cfg)
}
