//! Fixed-interval fetch-and-store loop.
//!
//! Ticks run one after another inside a single task: a slow fetch delays the
//! next tick rather than overlapping it. Missed ticks are skipped. Nothing in
//! a tick is fatal.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};

use typespeed_core::error::Result;
use typespeed_core::{METRIC_KEY, RESET_VALUE};

use crate::config::{FailurePolicy, ScheduleSection};
use crate::fetcher::MetricSource;
use crate::store::SharedStore;

/// What a single tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Fetched and stored this value.
    Stored(String),
    /// Fetch failed, store untouched.
    Skipped,
    /// Fetch failed, store reset to `0`.
    Reset,
    /// Fetch succeeded but the write did not.
    WriteFailed,
}

pub struct Scheduler {
    source: Arc<dyn MetricSource>,
    store: SharedStore,
    period: Duration,
    on_failure: FailurePolicy,
}

impl Scheduler {
    /// Rejects schedules `config::load` would reject (e.g. a zero interval).
    pub fn new(
        source: Arc<dyn MetricSource>,
        store: SharedStore,
        cfg: &ScheduleSection,
    ) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            source,
            store,
            period: cfg.interval(),
            on_failure: cfg.on_failure,
        })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Run one fetch and apply its result to the store.
    pub async fn tick(&self) -> TickOutcome {
        match self.source.fetch().await {
            Ok(value) => match self.store.set(METRIC_KEY, &value).await {
                Ok(()) => {
                    tracing::info!(key = METRIC_KEY, value = %value, "tick stored");
                    TickOutcome::Stored(value)
                }
                Err(e) => {
                    tracing::error!(kind = e.kind().as_str(), error = %e, "tick write failed");
                    TickOutcome::WriteFailed
                }
            },
            Err(e) => {
                tracing::error!(kind = e.kind().as_str(), error = %e, "upstream fetch failed");
                match self.on_failure {
                    FailurePolicy::Keep => TickOutcome::Skipped,
                    FailurePolicy::Reset => match self.store.set(METRIC_KEY, RESET_VALUE).await {
                        Ok(()) => TickOutcome::Reset,
                        Err(e) => {
                            tracing::error!(kind = e.kind().as_str(), error = %e, "reset write failed");
                            TickOutcome::WriteFailed
                        }
                    },
                }
            }
        }
    }

    /// Tick forever. The first tick fires immediately.
    pub async fn run(self) {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(period_secs = self.period.as_secs(), on_failure = ?self.on_failure, "scheduler started");
        loop {
            ticker.tick().await;
            self.tick().await;
        }
    }
}
