//! Party inventory and the pending-loot buffer.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{
    checked_stack_add, BoundedVec, ItemKey, ItemSlot, QuantityChangeResult,
};

/// Item stacks a party can carry.
pub const MAX_ITEMS: usize = 6;

/// Outcome of adding items to the inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupOutcome {
    /// Merged into an existing stack, which now holds `total`
    Stacked { total: u16 },
    /// Opened a new stack
    NewStack,
}

/// Up to six stacks, at most one per item key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    slots: BoundedVec<ItemSlot, MAX_ITEMS>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starting inventory. More than six entries is `TooManyItems`; repeated
    /// keys merge under the normal stacking rules.
    pub fn from_slots(items: &[ItemSlot]) -> Result<Self, DomainError> {
        if items.len() > MAX_ITEMS {
            return Err(DomainError::TooManyItems { max: MAX_ITEMS });
        }
        let mut inventory = Self::new();
        for slot in items {
            inventory.pickup(slot.item_key(), slot.quantity())?;
        }
        Ok(inventory)
    }

    pub fn slots(&self) -> &[ItemSlot] {
        &self.slots
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn quantity_of(&self, key: ItemKey) -> u16 {
        self.slots
            .iter()
            .find(|s| s.item_key() == key)
            .map_or(0, ItemSlot::quantity)
    }

    pub fn pickup(&mut self, key: ItemKey, quantity: u16) -> Result<PickupOutcome, DomainError> {
        if quantity == 0 {
            return Err(DomainError::InvalidItemQuantity);
        }
        if let Some(slot) = self.slots.iter_mut().find(|s| s.item_key() == key) {
            let total = checked_stack_add(slot.quantity(), quantity, key.max_stack())?;
            slot.set_quantity(total);
            return Ok(PickupOutcome::Stacked { total });
        }
        let fresh = ItemSlot::new(key, quantity)?;
        if self.slots.is_full() {
            return Err(DomainError::InventoryFull);
        }
        self.slots.try_push(fresh, "items")?;
        Ok(PickupOutcome::NewStack)
    }

    pub fn drop_item(
        &mut self,
        key: ItemKey,
        quantity: u16,
    ) -> Result<QuantityChangeResult, DomainError> {
        let idx = self
            .slots
            .iter()
            .position(|s| s.item_key() == key)
            .ok_or(DomainError::ItemNotFound)?;
        let change = QuantityChangeResult::subtract(self.slots[idx].quantity(), quantity)?;
        match change {
            QuantityChangeResult::Depleted => {
                self.slots.remove(idx);
            }
            QuantityChangeResult::Updated(rest) => self.slots[idx].set_quantity(rest),
        }
        Ok(change)
    }

    /// Drop one stack and pick up another as one step. Either both apply or
    /// the inventory is left untouched.
    pub fn swap(
        &mut self,
        drop_key: ItemKey,
        drop_quantity: u16,
        pickup_key: ItemKey,
        pickup_quantity: u16,
    ) -> Result<(), DomainError> {
        let mut staged = self.clone();
        staged.drop_item(drop_key, drop_quantity)?;
        staged.pickup(pickup_key, pickup_quantity)?;
        *self = staged;
        Ok(())
    }

    /// Apply compensating drops, then takes, as a single transaction.
    /// Capacity is judged on the end state, never mid-way.
    pub fn apply_transaction(
        &mut self,
        drops: &[ItemSlot],
        takes: &[ItemSlot],
    ) -> Result<(), DomainError> {
        let mut staged = self.clone();
        for slot in drops {
            staged.drop_item(slot.item_key(), slot.quantity())?;
        }
        for slot in takes {
            staged.pickup(slot.item_key(), slot.quantity())?;
        }
        *self = staged;
        Ok(())
    }
}

/// Where the pending loot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LootSource {
    Chest(u8),
    Combat,
}

/// Loot offered to the party but not yet taken.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingLoot {
    source: Option<LootSource>,
    slots: BoundedVec<ItemSlot, MAX_ITEMS>,
}

impl PendingLoot {
    pub fn new(source: LootSource) -> Self {
        Self {
            source: Some(source),
            slots: BoundedVec::new(),
        }
    }

    #[inline]
    pub fn source(&self) -> Option<LootSource> {
        self.source
    }

    pub fn slots(&self) -> &[ItemSlot] {
        &self.slots
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Add rolled loot: top up partial stacks of the same key, then open new
    /// slots while room remains. Whatever does not fit is discarded.
    pub fn push(&mut self, key: ItemKey, mut quantity: u16) {
        let max = key.max_stack();
        for slot in self.slots.iter_mut().filter(|s| s.item_key() == key) {
            if quantity == 0 {
                break;
            }
            let add = quantity.min(slot.headroom());
            slot.set_quantity(slot.quantity() + add);
            quantity -= add;
        }
        while quantity > 0 && !self.slots.is_full() {
            let chunk = quantity.min(max);
            if let Ok(slot) = ItemSlot::new(key, chunk) {
                if self.slots.try_push(slot, "pending loot").is_err() {
                    break;
                }
            }
            quantity -= chunk;
        }
    }

    /// Resolve which slots the caller takes. Indices must be distinct and present.
    pub fn select(&self, indices: &[u8]) -> Result<Vec<ItemSlot>, DomainError> {
        if self.is_empty() {
            return Err(DomainError::LootNotAvailable);
        }
        let mut taken = Vec::with_capacity(indices.len());
        for (pos, idx) in indices.iter().enumerate() {
            if indices[..pos].contains(idx) {
                return Err(DomainError::LootNotAvailable);
            }
            let slot = self
                .slots
                .get(usize::from(*idx))
                .copied()
                .ok_or(DomainError::LootNotAvailable)?;
            taken.push(slot);
        }
        Ok(taken)
    }

    pub fn clear(&mut self) {
        self.source = None;
        self.slots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(key: ItemKey, qty: u16) -> ItemSlot {
        ItemSlot::new(key, qty).unwrap()
    }

    fn full_inventory() -> Inventory {
        Inventory::from_slots(&[
            slot(ItemKey::PouchGold, 5),
            slot(ItemKey::StressTonic, 1),
            slot(ItemKey::MinorTorch, 1),
            slot(ItemKey::HealingSalve, 2),
            slot(ItemKey::MysteryRelic, 1),
            slot(ItemKey::CalmingIncense, 1),
        ])
        .unwrap()
    }

    mod stacking {
        use super::*;

        #[test]
        fn seventh_key_reports_inventory_full_and_changes_nothing() {
            let mut inv = full_inventory();
            let before = inv.clone();
            assert_eq!(
                inv.pickup(ItemKey::PhoenixFeather, 1),
                Err(DomainError::InventoryFull)
            );
            assert_eq!(inv, before);
        }

        #[test]
        fn existing_key_stacks_even_when_full() {
            let mut inv = full_inventory();
            assert_eq!(
                inv.pickup(ItemKey::PouchGold, 3),
                Ok(PickupOutcome::Stacked { total: 8 })
            );
        }

        #[test]
        fn stack_overflow_is_an_error() {
            let mut inv = Inventory::new();
            inv.pickup(ItemKey::CalmingIncense, 2).unwrap();
            assert_eq!(
                inv.pickup(ItemKey::CalmingIncense, 2),
                Err(DomainError::ItemStackOverflow { max: 3 })
            );
            assert_eq!(inv.quantity_of(ItemKey::CalmingIncense), 2);
        }

        #[test]
        fn starting_list_over_capacity_is_too_many_items() {
            let items = vec![slot(ItemKey::StressTonic, 1); 7];
            assert_eq!(
                Inventory::from_slots(&items),
                Err(DomainError::TooManyItems { max: MAX_ITEMS })
            );
        }
    }

    mod dropping {
        use super::*;

        #[test]
        fn drop_to_zero_frees_the_slot() {
            let mut inv = full_inventory();
            assert!(inv.drop_item(ItemKey::HealingSalve, 2).unwrap().should_remove());
            assert_eq!(inv.len(), 5);
        }

        #[test]
        fn drop_missing_or_too_much() {
            let mut inv = Inventory::new();
            assert_eq!(
                inv.drop_item(ItemKey::StressTonic, 1),
                Err(DomainError::ItemNotFound)
            );
            inv.pickup(ItemKey::StressTonic, 1).unwrap();
            assert_eq!(
                inv.drop_item(ItemKey::StressTonic, 2),
                Err(DomainError::InsufficientItemQuantity)
            );
        }
    }

    mod swapping {
        use super::*;

        #[test]
        fn swap_changes_both_stacks() {
            let mut inv = full_inventory();
            inv.swap(ItemKey::MysteryRelic, 1, ItemKey::PhoenixFeather, 1)
                .unwrap();
            assert_eq!(inv.quantity_of(ItemKey::MysteryRelic), 0);
            assert_eq!(inv.quantity_of(ItemKey::PhoenixFeather), 1);
        }

        #[test]
        fn failed_pickup_rolls_back_the_drop() {
            let mut inv = full_inventory();
            let before = inv.clone();
            // dropping part of a stack frees no slot, so the new key cannot fit
            let err = inv
                .swap(ItemKey::PouchGold, 1, ItemKey::PhoenixFeather, 1)
                .unwrap_err();
            assert_eq!(err, DomainError::InventoryFull);
            assert_eq!(inv, before);
        }

        #[test]
        fn failed_drop_changes_nothing() {
            let mut inv = full_inventory();
            let before = inv.clone();
            assert_eq!(
                inv.swap(ItemKey::PhoenixFeather, 1, ItemKey::PouchGold, 1),
                Err(DomainError::ItemNotFound)
            );
            assert_eq!(inv, before);
        }
    }

    mod loot {
        use super::*;

        #[test]
        fn push_splits_single_stack_items() {
            let mut loot = PendingLoot::new(LootSource::Combat);
            loot.push(ItemKey::PhoenixFeather, 2);
            loot.push(ItemKey::PouchGold, 50);
            loot.push(ItemKey::PouchGold, 60);
            let slots = loot.slots();
            assert_eq!(slots.len(), 4);
            assert_eq!(slots[2].quantity(), 99);
            assert_eq!(slots[3].quantity(), 11);
        }

        #[test]
        fn transaction_checks_capacity_after_drops() {
            let mut inv = full_inventory();
            let drops = [slot(ItemKey::MysteryRelic, 1)];
            let takes = [slot(ItemKey::PhoenixFeather, 1)];
            inv.apply_transaction(&drops, &takes).unwrap();
            assert_eq!(inv.len(), MAX_ITEMS);
            assert_eq!(inv.quantity_of(ItemKey::PhoenixFeather), 1);
        }

        #[test]
        fn selection_rejects_duplicates_and_missing_indices() {
            let mut loot = PendingLoot::new(LootSource::Chest(0));
            loot.push(ItemKey::StressTonic, 1);
            assert!(loot.select(&[0]).is_ok());
            assert_eq!(loot.select(&[0, 0]), Err(DomainError::LootNotAvailable));
            assert_eq!(loot.select(&[3]), Err(DomainError::LootNotAvailable));
            assert_eq!(
                PendingLoot::default().select(&[]),
                Err(DomainError::LootNotAvailable)
            );
        }
    }
}
