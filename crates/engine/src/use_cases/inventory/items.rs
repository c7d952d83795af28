//! Item use cases: pickup, drop, swap and use.
//!
//! All of them operate on the session inventory of six stacks. Every change
//! is all-or-nothing.

use std::sync::Arc;

use deepdelve_domain::{
    AuthorityKey, ItemKey, PickupOutcome, QuantityChangeResult, SessionKey,
};

use crate::entities::Adventures;

use super::InventoryError;

pub struct PickupItem {
    adventures: Arc<Adventures>,
}

impl PickupItem {
    pub fn new(adventures: Arc<Adventures>) -> Self {
        Self { adventures }
    }

    pub async fn execute(
        &self,
        caller: AuthorityKey,
        key: SessionKey,
        item: ItemKey,
        quantity: u16,
    ) -> Result<PickupOutcome, InventoryError> {
        let mut working = self.adventures.open(key).await?;
        let outcome = working.session.pickup_item(caller, item, quantity)?;
        self.adventures.save(working, Vec::new()).await?;

        tracing::debug!(session = %key, item = ?item, quantity, outcome = ?outcome, "Item picked up");
        Ok(outcome)
    }
}

pub struct DropItem {
    adventures: Arc<Adventures>,
}

impl DropItem {
    pub fn new(adventures: Arc<Adventures>) -> Self {
        Self { adventures }
    }

    pub async fn execute(
        &self,
        caller: AuthorityKey,
        key: SessionKey,
        item: ItemKey,
        quantity: u16,
    ) -> Result<QuantityChangeResult, InventoryError> {
        let mut working = self.adventures.open(key).await?;
        let change = working.session.drop_item(caller, item, quantity)?;
        self.adventures.save(working, Vec::new()).await?;

        tracing::debug!(session = %key, item = ?item, quantity, change = ?change, "Item dropped");
        Ok(change)
    }
}

/// Drop one stack and pick up another in a single step.
pub struct SwapItem {
    adventures: Arc<Adventures>,
}

impl SwapItem {
    pub fn new(adventures: Arc<Adventures>) -> Self {
        Self { adventures }
    }

    pub async fn execute(
        &self,
        caller: AuthorityKey,
        key: SessionKey,
        drop: (ItemKey, u16),
        pickup: (ItemKey, u16),
    ) -> Result<(), InventoryError> {
        let mut working = self.adventures.open(key).await?;
        working
            .session
            .swap_item(caller, drop.0, drop.1, pickup.0, pickup.1)?;
        self.adventures.save(working, Vec::new()).await?;

        tracing::debug!(
            session = %key,
            dropped = ?drop.0,
            picked_up = ?pickup.0,
            "Items swapped"
        );
        Ok(())
    }
}

/// Use one item while exploring. Torches refuel the party torch and ignore
/// the hero index.
pub struct UseItem {
    adventures: Arc<Adventures>,
}

impl UseItem {
    pub fn new(adventures: Arc<Adventures>) -> Self {
        Self { adventures }
    }

    pub async fn execute(
        &self,
        caller: AuthorityKey,
        key: SessionKey,
        item: ItemKey,
        hero_index: u8,
    ) -> Result<(), InventoryError> {
        let mut working = self.adventures.open(key).await?;
        working.session.use_item(caller, item, hero_index)?;
        let torch = working.session.torch().value();
        self.adventures.save(working, Vec::new()).await?;

        tracing::debug!(session = %key, item = ?item, hero_index, torch, "Item used");
        Ok(())
    }
}
