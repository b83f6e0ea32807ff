//! Process supervisor.
//!
//! Connects the store, seeds the metric key, then owns two tasks (HTTP
//! listener, scheduler) until a termination signal arrives or one of them
//! ends on its own. There is no drain: on a signal both tasks are aborted.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use typespeed_core::error::{Result, TypeSpeedError};
use typespeed_core::{METRIC_KEY, RESET_VALUE};

use crate::app_state::AppState;
use crate::config::RelayConfig;
use crate::fetcher::ApiFetcher;
use crate::router::build_router;
use crate::scheduler::Scheduler;
use crate::store::{self, SharedStore};

/// Handles to the two background tasks.
pub struct Tasks {
    pub server: JoinHandle<Result<()>>,
    pub scheduler: JoinHandle<()>,
}

impl Tasks {
    pub fn abort(&self) {
        self.server.abort();
        self.scheduler.abort();
    }
}

/// Seed the key when absent so the endpoint answers before the first tick.
pub async fn seed(store: &SharedStore) -> Result<()> {
    if store.set_if_absent(METRIC_KEY, RESET_VALUE).await? {
        tracing::info!(key = METRIC_KEY, value = RESET_VALUE, "metric key seeded");
    }
    Ok(())
}

/// Bind the listener and spawn both tasks.
pub async fn start(cfg: &RelayConfig, store: SharedStore) -> Result<Tasks> {
    let listen = cfg.server.listen_addr()?;
    let listener = TcpListener::bind(listen)
        .await
        .map_err(|e| TypeSpeedError::Internal(format!("bind {listen} failed: {e}")))?;

    let fetcher = Arc::new(ApiFetcher::new(&cfg.upstream)?);
    let scheduler = Scheduler::new(fetcher, store.clone(), &cfg.schedule)?;

    let app = build_router(AppState::new(store));
    tracing::info!(%listen, "http server starting");
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .map_err(|e| TypeSpeedError::Internal(format!("server failed: {e}")))
    });
    let scheduler = tokio::spawn(scheduler.run());

    Ok(Tasks { server, scheduler })
}

/// Full lifecycle: connect, seed, start, wait.
pub async fn run(cfg: RelayConfig) -> Result<()> {
    tracing::info!(backend = ?cfg.store.backend, addr = %cfg.store.addr, "connecting to store");
    let store = store::connect(&cfg.store).await?;
    seed(&store).await?;

    let mut tasks = start(&cfg, store).await?;

    let outcome = tokio::select! {
        _ = shutdown_signal() => {
            tracing::info!("termination signal received");
            Ok(())
        }
        res = &mut tasks.server => {
            Err(TypeSpeedError::Internal(match res {
                Ok(Ok(())) => "http server exited".into(),
                Ok(Err(e)) => e.to_string(),
                Err(e) => format!("http server task failed: {e}"),
            }))
        }
        res = &mut tasks.scheduler => {
            Err(TypeSpeedError::Internal(match res {
                Ok(()) => "scheduler exited".into(),
                Err(e) => format!("scheduler task failed: {e}"),
            }))
        }
    };

    tasks.abort();
    outcome
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "ctrl-c handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
