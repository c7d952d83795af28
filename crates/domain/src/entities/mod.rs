//! Entities owned by the adventure aggregates.

pub mod combatant;
pub mod dungeon;
pub mod hero;
pub mod initiative;
pub mod inventory;

pub use combatant::{
    CombatStats, CombatantCore, DamageOutcome, EnemyCombatant, HealOutcome, HeroCombatant,
    ENEMY_AP_MAX, HERO_AP_MAX, MAX_ENEMIES,
};
pub use dungeon::{
    DungeonMap, DungeonRecord, DungeonStatus, Room, MAX_CHESTS, MAX_DOORS, MAX_GENERATED_SIDE,
    MAX_PORTALS, MAX_ROOMS, MIN_GENERATED_SIDE, TILE_FLOOR, TILE_WALL,
};
pub use hero::{
    HeroClass, HeroLock, HeroRecord, HeroSnapshot, HeroStats, MAX_PARTY, STATUS_INCAPACITATED,
    TRAIT_SLOTS,
};
pub use initiative::{InitiativeEntry, InitiativeSlot, InitiativeTable, Occupant, MAX_COMBATANTS};
pub use inventory::{Inventory, LootSource, PendingLoot, PickupOutcome, MAX_ITEMS};
