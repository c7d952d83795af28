pub mod aggregates;
pub mod entities;
pub mod error;
pub mod events;
pub mod game_systems;
pub mod ids;
pub mod value_objects;

pub use aggregates::{
    AdventureCombat, AdventureSession, CombatAction, CrewMark, RESET_INTERVAL_SECONDS,
    RESUME_WINDOW_SECONDS,
};

pub use entities::{
    CombatStats, CombatantCore, DungeonMap, DungeonRecord, DungeonStatus, EnemyCombatant,
    HeroClass, HeroCombatant, HeroLock, HeroRecord, HeroSnapshot, HeroStats, InitiativeSlot,
    InitiativeTable, Inventory, LootSource, Occupant, PendingLoot, PickupOutcome, Room,
    ENEMY_AP_MAX, HERO_AP_MAX, MAX_COMBATANTS, MAX_ENEMIES, MAX_ITEMS, MAX_PARTY,
};

pub use error::{DomainError, ErrorCategory};

pub use events::{
    ActionReport, CombatEvent, CombatResolution, ConcludeOutcome, ExitOutcome, MoveOutcome,
    StartOutcome, TileInteraction,
};

pub use game_systems::{HeroAction, TargetSelector};

pub use ids::{AuthorityKey, DungeonId, HeroId, SessionKey, KEY_LEN};

pub use value_objects::{
    BoundedVec, Direction, DungeonPoint, ItemEffect, ItemKey, ItemSlot, QuantityChangeResult,
    SessionAuthority, StatusEffect, StatusSet, Torch, TorchBand,
};
