//! Loot use cases: open a chest, then take from what it offered.

use std::sync::Arc;

use deepdelve_domain::{AuthorityKey, ItemSlot, PendingLoot, SessionKey};

use crate::entities::Adventures;

use super::InventoryError;

/// Open the chest under the party and offer its contents as pending loot.
pub struct OpenChest {
    adventures: Arc<Adventures>,
}

impl OpenChest {
    pub fn new(adventures: Arc<Adventures>) -> Self {
        Self { adventures }
    }

    pub async fn execute(
        &self,
        caller: AuthorityKey,
        key: SessionKey,
        chest: u8,
    ) -> Result<PendingLoot, InventoryError> {
        let mut working = self.adventures.open(key).await?;
        let offer = working.session.open_chest(caller, chest)?.clone();
        self.adventures.save(working, Vec::new()).await?;

        tracing::info!(session = %key, chest, slots = offer.slots().len(), "Chest opened");
        Ok(offer)
    }
}

/// Take chosen pending slots, dropping items first to make room.
/// Whatever is not taken is discarded.
pub struct TakeLoot {
    adventures: Arc<Adventures>,
}

impl TakeLoot {
    pub fn new(adventures: Arc<Adventures>) -> Self {
        Self { adventures }
    }

    pub async fn execute(
        &self,
        caller: AuthorityKey,
        key: SessionKey,
        take: &[u8],
        drops: &[ItemSlot],
    ) -> Result<Vec<ItemSlot>, InventoryError> {
        let mut working = self.adventures.open(key).await?;
        let taken = working.session.take_loot(caller, take, drops)?;
        self.adventures.save(working, Vec::new()).await?;

        tracing::info!(
            session = %key,
            taken = taken.len(),
            dropped = drops.len(),
            "Loot taken"
        );
        Ok(taken)
    }
}
