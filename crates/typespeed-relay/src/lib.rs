//! typespeed relay library entry.
//!
//! Wires the upstream fetcher, the scheduler, the metric store, and the HTTP
//! surface into one service. Consumed by the binary (`main.rs`) and by
//! integration tests.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod app;
pub mod app_state;
pub mod config;
pub mod fetcher;
pub mod http;
pub mod router;
pub mod scheduler;
pub mod store;
