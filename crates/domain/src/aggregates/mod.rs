//! Aggregate roots - the two records every intent mutates
//!
//! - [`AdventureSession`]: one per (player, dungeon); position, party, items,
//!   loot, torch and delegation.
//! - [`AdventureCombat`]: one per encounter, linked to its session while
//!   `in_combat` is set.
//!
//! Fields are private. Mutations validate first and return outcome values
//! from `crate::events`.

pub mod adventure_combat;
pub mod adventure_session;

pub use adventure_combat::{AdventureCombat, CombatAction};
pub use adventure_session::{
    AdventureSession, CrewMark, RESET_INTERVAL_SECONDS, RESUME_WINDOW_SECONDS,
};
