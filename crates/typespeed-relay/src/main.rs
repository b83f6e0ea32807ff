//! typespeed relay
//!
//! - polls the typing-speed API on a fixed interval
//! - caches the latest value under `type_speed`
//! - serves it as `{"wpm": "..."}` on `/`

use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use typespeed_relay::{app, config};

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let cfg = match config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(kind = e.kind().as_str(), error = %e, "config load failed");
            return ExitCode::FAILURE;
        }
    };

    match app::run(cfg).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(kind = e.kind().as_str(), error = %e, "typespeed-relay stopped");
            ExitCode::FAILURE
        }
    }
}
