//! End-to-end scenarios.
//!
//! Every test drives a fully wired [`crate::App`] over the in-memory stores
//! through [`crate::api::dispatch`], the same path the stdin loop uses. Time
//! comes from a manual clock so resume and daily reset windows can be crossed.
//!
//! ```bash
//! cargo test -p deepdelve-engine --lib e2e_tests
//! ```

mod combat_flow_tests;
mod e2e_helpers;

pub use e2e_helpers::*;
