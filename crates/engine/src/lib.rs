//! Deepdelve Engine library.
//!
//! Runs adventure sessions for the dungeon crawl: loading, gating and
//! committing session state around the pure rules in `deepdelve-domain`.
//!
//! ## Structure
//!
//! - `entities/` - The session gate that loads, routes and commits adventures
//! - `use_cases/` - One orchestrator per player intent
//! - `infrastructure/` - Ports, in-memory stores, clock and settings
//! - `api/` - Intent dispatch
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod entities;
pub mod infrastructure;
pub mod use_cases;

/// Shared records and wiring for tests.
#[cfg(test)]
pub mod test_fixtures;

/// Multi-step scenarios against the fully wired in-memory engine.
#[cfg(test)]
mod e2e_tests;

pub use app::App;
