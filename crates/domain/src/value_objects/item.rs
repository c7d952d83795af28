//! Item catalogue and inventory stacks.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Catalogue key of an item. Serialized as its numeric key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum ItemKey {
    PouchGold = 0,
    StressTonic = 1,
    MinorTorch = 2,
    HealingSalve = 3,
    MysteryRelic = 4,
    CalmingIncense = 5,
    PhoenixFeather = 6,
}

/// What using an item does to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemEffect {
    ReduceStress(u16),
    RestoreHp(u16),
    RefuelTorch(u8),
    /// Reduce stress and clear the first negative status.
    Calm { stress: u16 },
    /// Bring a downed hero back at a percentage of max hp.
    Revive { percent: u8 },
}

/// Where an item is being used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseContext {
    Exploration,
    Combat,
}

impl ItemKey {
    pub const ALL: [ItemKey; 7] = [
        Self::PouchGold,
        Self::StressTonic,
        Self::MinorTorch,
        Self::HealingSalve,
        Self::MysteryRelic,
        Self::CalmingIncense,
        Self::PhoenixFeather,
    ];

    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Largest quantity a single stack of this item may hold.
    pub const fn max_stack(self) -> u16 {
        match self {
            Self::PouchGold => 99,
            Self::StressTonic | Self::MinorTorch | Self::HealingSalve => 10,
            Self::MysteryRelic => 5,
            Self::CalmingIncense => 3,
            Self::PhoenixFeather => 1,
        }
    }

    /// Items that can only be found inside a dungeon, never brought in.
    pub const fn is_loot_only(self) -> bool {
        matches!(self, Self::PouchGold | Self::MysteryRelic)
    }

    pub const fn effect(self) -> Option<ItemEffect> {
        match self {
            Self::StressTonic => Some(ItemEffect::ReduceStress(20)),
            Self::MinorTorch => Some(ItemEffect::RefuelTorch(25)),
            Self::HealingSalve => Some(ItemEffect::RestoreHp(30)),
            Self::CalmingIncense => Some(ItemEffect::Calm { stress: 30 }),
            Self::PhoenixFeather => Some(ItemEffect::Revive { percent: 50 }),
            Self::PouchGold | Self::MysteryRelic => None,
        }
    }

    pub fn usable_in(self, context: UseContext) -> bool {
        match (self.effect(), context) {
            (None, _) => false,
            (Some(ItemEffect::RefuelTorch(_)), UseContext::Combat) => false,
            (Some(_), _) => true,
        }
    }
}

impl TryFrom<u8> for ItemKey {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(DomainError::InvalidItemKey(value))
    }
}

impl From<ItemKey> for u8 {
    fn from(value: ItemKey) -> Self {
        value.as_u8()
    }
}

/// A non-empty stack of one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSlot {
    item_key: ItemKey,
    quantity: u16,
}

impl ItemSlot {
    /// Validated stack: quantity must be in `1..=max_stack`.
    pub fn new(item_key: ItemKey, quantity: u16) -> Result<Self, DomainError> {
        if quantity == 0 {
            return Err(DomainError::InvalidItemQuantity);
        }
        if quantity > item_key.max_stack() {
            return Err(DomainError::ItemStackOverflow {
                max: item_key.max_stack(),
            });
        }
        Ok(Self { item_key, quantity })
    }

    /// Parse a raw `(key, quantity)` pair from the wire.
    pub fn from_raw(item_key: u8, quantity: u16) -> Result<Self, DomainError> {
        Self::new(ItemKey::try_from(item_key)?, quantity)
    }

    #[inline]
    pub fn item_key(&self) -> ItemKey {
        self.item_key
    }

    #[inline]
    pub fn quantity(&self) -> u16 {
        self.quantity
    }

    /// Room left before the stack hits its maximum.
    pub fn headroom(&self) -> u16 {
        self.item_key.max_stack().saturating_sub(self.quantity)
    }

    pub(crate) fn set_quantity(&mut self, quantity: u16) {
        self.quantity = quantity;
    }
}
