//! Unified error type for the adventure domain.
//!
//! Every variant carries a stable machine-readable code (`code()`) and a
//! human-readable message (`Display`). Callers see both; nothing is retried or
//! silently corrected inside the domain.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Taxonomy bucket an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Authorization,
    SessionState,
    Movement,
    Combat,
    Inventory,
    Loot,
    Input,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    // Authorization
    #[error("Caller is not authorized to mutate this session")]
    Unauthorized,
    #[error("Adventure does not belong to this player")]
    AdventureOwnerMismatch,
    #[error("Hero is not owned by the caller")]
    HeroNotOwned,
    #[error("Hero lock is held by a different owner")]
    HeroLockOwnerMismatch,
    #[error("Delegate mismatch: {0}")]
    DelegateMismatch(&'static str),

    // Session state
    #[error("Adventure already has heroes inside")]
    AdventureAlreadyActive,
    #[error("Adventure is not active")]
    AdventureNotActive,
    #[error("Reset is blocked while heroes are inside")]
    ResetBlocked,
    #[error("Dungeon is not ready")]
    DungeonNotReady,
    #[error("Dungeon seed has not been initialized")]
    DungeonSeedMissing,
    #[error("Invalid dungeon layout: {0}")]
    InvalidDungeonLayout(String),
    #[error("Party must contain between 1 and {max} heroes, got {count}")]
    InvalidHeroCount { count: usize, max: usize },
    #[error("Hero appears more than once in the party")]
    DuplicateHero,
    #[error("Hero is already active in another adventure")]
    HeroAlreadyActive,
    #[error("Hero is unavailable")]
    HeroUnavailable,
    #[error("Hero index {index} is out of range")]
    HeroIndexOutOfRange { index: u8 },

    // Movement
    #[error("Movement would leave the dungeon bounds")]
    MovementOutOfBounds,
    #[error("Movement is blocked by a wall")]
    MovementIntoWall,
    #[error("Movement is blocked while in combat")]
    MovementBlockedInCombat,
    #[error("No portal at the party position")]
    NoPortalAtPosition,
    #[error("No chest at the party position")]
    NoChestAtPosition,

    // Combat
    #[error("Combat is already active")]
    CombatAlreadyActive,
    #[error("Combat is not active")]
    CombatNotActive,
    #[error("No pending encounter")]
    NoPendingEncounter,
    #[error("It is not this hero's turn")]
    NotHeroTurn,
    #[error("Hero is not alive")]
    HeroNotAlive,
    #[error("Insufficient action points: need {required}, have {available}")]
    InsufficientActionPoints { required: u8, available: u8 },
    #[error("Invalid target")]
    InvalidTarget,
    #[error("Combat has not been resolved yet")]
    CombatNotResolved,
    #[error("Escape is blocked while damage is pending")]
    EscapeBlocked,

    // Inventory
    #[error("Too many items: at most {max} stacks allowed")]
    TooManyItems { max: usize },
    #[error("Invalid item key {0}")]
    InvalidItemKey(u8),
    #[error("Invalid item quantity")]
    InvalidItemQuantity,
    #[error("Item stack would exceed its maximum of {max}")]
    ItemStackOverflow { max: u16 },
    #[error("Inventory is full")]
    InventoryFull,
    #[error("Item not found in inventory")]
    ItemNotFound,
    #[error("Insufficient item quantity")]
    InsufficientItemQuantity,
    #[error("Item cannot be used here")]
    ItemNotUsable,

    // Loot
    #[error("Chest has already been opened")]
    ChestAlreadyOpened,
    #[error("Loot is not available")]
    LootNotAvailable,

    // Input
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    #[error("Capacity exceeded: {what} holds at most {max}")]
    CapacityExceeded { what: &'static str, max: usize },
}

impl DomainError {
    /// Stable code surfaced to callers alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::AdventureOwnerMismatch => "ADVENTURE_OWNER_MISMATCH",
            Self::HeroNotOwned => "HERO_NOT_OWNED",
            Self::HeroLockOwnerMismatch => "HERO_LOCK_OWNER_MISMATCH",
            Self::DelegateMismatch(_) => "DELEGATE_MISMATCH",
            Self::AdventureAlreadyActive => "ADVENTURE_ALREADY_ACTIVE",
            Self::AdventureNotActive => "ADVENTURE_NOT_ACTIVE",
            Self::ResetBlocked => "RESET_BLOCKED",
            Self::DungeonNotReady => "DUNGEON_NOT_READY",
            Self::DungeonSeedMissing => "DUNGEON_SEED_MISSING",
            Self::InvalidDungeonLayout(_) => "INVALID_DUNGEON_LAYOUT",
            Self::InvalidHeroCount { .. } => "INVALID_HERO_COUNT",
            Self::DuplicateHero => "DUPLICATE_HERO",
            Self::HeroAlreadyActive => "HERO_ALREADY_ACTIVE",
            Self::HeroUnavailable => "HERO_UNAVAILABLE",
            Self::HeroIndexOutOfRange { .. } => "HERO_INDEX_OUT_OF_RANGE",
            Self::MovementOutOfBounds => "MOVEMENT_OUT_OF_BOUNDS",
            Self::MovementIntoWall => "MOVEMENT_INTO_WALL",
            Self::MovementBlockedInCombat => "MOVEMENT_BLOCKED_IN_COMBAT",
            Self::NoPortalAtPosition => "NO_PORTAL_AT_POSITION",
            Self::NoChestAtPosition => "NO_CHEST_AT_POSITION",
            Self::CombatAlreadyActive => "COMBAT_ALREADY_ACTIVE",
            Self::CombatNotActive => "COMBAT_NOT_ACTIVE",
            Self::NoPendingEncounter => "NO_PENDING_ENCOUNTER",
            Self::NotHeroTurn => "NOT_HERO_TURN",
            Self::HeroNotAlive => "HERO_NOT_ALIVE",
            Self::InsufficientActionPoints { .. } => "INSUFFICIENT_ACTION_POINTS",
            Self::InvalidTarget => "INVALID_TARGET",
            Self::CombatNotResolved => "COMBAT_NOT_RESOLVED",
            Self::EscapeBlocked => "ESCAPE_BLOCKED",
            Self::TooManyItems { .. } => "TOO_MANY_ITEMS",
            Self::InvalidItemKey(_) => "INVALID_ITEM_KEY",
            Self::InvalidItemQuantity => "INVALID_ITEM_QUANTITY",
            Self::ItemStackOverflow { .. } => "ITEM_STACK_OVERFLOW",
            Self::InventoryFull => "INVENTORY_FULL",
            Self::ItemNotFound => "ITEM_NOT_FOUND",
            Self::InsufficientItemQuantity => "INSUFFICIENT_ITEM_QUANTITY",
            Self::ItemNotUsable => "ITEM_NOT_USABLE",
            Self::ChestAlreadyOpened => "CHEST_ALREADY_OPENED",
            Self::LootNotAvailable => "LOOT_NOT_AVAILABLE",
            Self::InvalidKey(_) => "INVALID_KEY",
            Self::CapacityExceeded { .. } => "CAPACITY_EXCEEDED",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Unauthorized
            | Self::AdventureOwnerMismatch
            | Self::HeroNotOwned
            | Self::HeroLockOwnerMismatch
            | Self::DelegateMismatch(_) => ErrorCategory::Authorization,
            Self::AdventureAlreadyActive
            | Self::AdventureNotActive
            | Self::ResetBlocked
            | Self::DungeonNotReady
            | Self::DungeonSeedMissing
            | Self::InvalidDungeonLayout(_)
            | Self::InvalidHeroCount { .. }
            | Self::DuplicateHero
            | Self::HeroAlreadyActive
            | Self::HeroUnavailable
            | Self::HeroIndexOutOfRange { .. } => ErrorCategory::SessionState,
            Self::MovementOutOfBounds
            | Self::MovementIntoWall
            | Self::MovementBlockedInCombat
            | Self::NoPortalAtPosition
            | Self::NoChestAtPosition => ErrorCategory::Movement,
            Self::CombatAlreadyActive
            | Self::CombatNotActive
            | Self::NoPendingEncounter
            | Self::NotHeroTurn
            | Self::HeroNotAlive
            | Self::InsufficientActionPoints { .. }
            | Self::InvalidTarget
            | Self::CombatNotResolved
            | Self::EscapeBlocked => ErrorCategory::Combat,
            Self::TooManyItems { .. }
            | Self::InvalidItemKey(_)
            | Self::InvalidItemQuantity
            | Self::ItemStackOverflow { .. }
            | Self::InventoryFull
            | Self::ItemNotFound
            | Self::InsufficientItemQuantity
            | Self::ItemNotUsable => ErrorCategory::Inventory,
            Self::ChestAlreadyOpened | Self::LootNotAvailable => ErrorCategory::Loot,
            Self::InvalidKey(_) | Self::CapacityExceeded { .. } => ErrorCategory::Input,
        }
    }

    /// Create an invalid key error
    pub fn invalid_key(msg: impl Into<String>) -> Self {
        Self::InvalidKey(msg.into())
    }

    /// Create an invalid layout error
    pub fn invalid_layout(msg: impl Into<String>) -> Self {
        Self::InvalidDungeonLayout(msg.into())
    }

    /// Create a capacity error for a fixed-size collection
    pub fn capacity(what: &'static str, max: usize) -> Self {
        Self::CapacityExceeded { what, max }
    }
}
