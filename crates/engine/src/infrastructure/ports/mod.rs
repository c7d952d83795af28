//! Port traits for infrastructure boundaries.
//!
//! These are the only abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Canonical storage (sessions, combats, heroes, dungeons)
//! - The delegate execution domain
//! - Commit notices
//! - Clock (for testing)

mod error;
mod external;
mod repos;
mod testing;

pub use error::RepoError;
pub use external::CommitPublisher;
pub use repos::{AdventureStore, CombatWrite, CommitBatch, DelegateCopy, DelegateStore};
pub use testing::ClockPort;

#[cfg(test)]
pub use external::MockCommitPublisher;
#[cfg(test)]
pub use repos::{MockAdventureStore, MockDelegateStore};
#[cfg(test)]
pub use testing::MockClockPort;
