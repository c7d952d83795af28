//! Inventory and loot use cases.

mod items;
mod loot;

pub use items::{DropItem, PickupItem, SwapItem, UseItem};
pub use loot::{OpenChest, TakeLoot};

use std::sync::Arc;

use deepdelve_domain::DomainError;

use crate::entities::GateError;
use crate::infrastructure::ports::RepoError;

/// Container for inventory use cases.
pub struct InventoryUseCases {
    pub pickup: Arc<PickupItem>,
    pub drop: Arc<DropItem>,
    pub swap: Arc<SwapItem>,
    pub use_item: Arc<UseItem>,
    pub open_chest: Arc<OpenChest>,
    pub take_loot: Arc<TakeLoot>,
}

impl InventoryUseCases {
    pub fn new(
        pickup: Arc<PickupItem>,
        drop: Arc<DropItem>,
        swap: Arc<SwapItem>,
        use_item: Arc<UseItem>,
        open_chest: Arc<OpenChest>,
        take_loot: Arc<TakeLoot>,
    ) -> Self {
        Self {
            pickup,
            drop,
            swap,
            use_item,
            open_chest,
            take_loot,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error(transparent)]
    Gate(#[from] GateError),
    #[error("Validation error: {0}")]
    Domain(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl InventoryError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Gate(e) => e.code(),
            Self::Domain(e) => e.code(),
            Self::Repo(e) => e.code(),
        }
    }
}
