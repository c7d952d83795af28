//! Outcomes returned from aggregate mutations.
//!
//! Aggregates do not publish anything themselves; they return these values so
//! the engine can log them and hand them back to callers.

pub mod combat_events;
pub mod session_events;

pub use combat_events::*;
pub use session_events::*;
