//! Use cases - one struct per user story, grouped by area.
//!
//! Each use case opens its session through the [`Adventures`](crate::entities::Adventures)
//! gate, applies one domain transition and writes the result back in a single batch.

pub mod combat;
pub mod delegation;
pub mod inventory;
pub mod movement;
pub mod session;

pub use combat::{CombatError, CombatUseCases};
pub use delegation::{DelegationError, DelegationUseCases};
pub use inventory::{InventoryError, InventoryUseCases};
pub use movement::{MovementError, MovementUseCases};
pub use session::{SessionError, SessionUseCases};
