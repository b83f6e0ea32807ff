//! typespeed core: the shared error surface and metric extraction.
//!
//! This crate turns an upstream typing-speed response into the string value
//! that gets cached. It carries no transport, store, or runtime dependencies
//! so the extraction rules can be tested on plain bytes.
//!
//! Panics, `unwrap`, and `expect` are compile-denied here; every fallible
//! path surfaces as a `TypeSpeedError`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod metric;

/// Shared result type.
pub use error::{ErrorKind, Result, TypeSpeedError};
pub use metric::{extract_wpm, METRIC_KEY, RESET_VALUE};
