//! Value objects: small, copyable, validated building blocks.

pub mod authority;
pub mod bounded;
pub mod item;
pub mod position;
pub mod quantity;
pub mod rng;
pub mod status;
pub mod torch;

pub use authority::SessionAuthority;
pub use bounded::BoundedVec;
pub use item::{ItemEffect, ItemKey, ItemSlot, UseContext};
pub use position::{Direction, DungeonPoint};
pub use quantity::{checked_stack_add, QuantityChangeResult};
pub use rng::{fold_seed, next_draw, CombatRng, Mulberry32};
pub use status::{
    StatusApplication, StatusApplied, StatusEffect, StatusInstance, StatusSet,
    MAX_STATUS_PER_COMBATANT,
};
pub use torch::{Torch, TorchBand};
