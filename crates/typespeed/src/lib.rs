//! Top-level facade crate for typespeed.
//!
//! Re-exports the core types and the relay library so users can depend on a single crate.

pub mod core {
    pub use typespeed_core::*;
}

pub mod relay {
    pub use typespeed_relay::*;
}
