//! Rules tables and rolls shared by the session and combat aggregates.
//!
//! - `abilities`: hero skills by class and enemy ability sets
//! - `damage`: damage, heal and status landing rolls
//! - `encounters`: portal encounter rolls
//! - `enemies`: enemy catalogue, roster selection and experience
//! - `loot`: chest offers and combat spoils

pub mod abilities;
pub mod damage;
pub mod encounters;
pub mod enemies;
pub mod loot;

pub use abilities::{
    enemy_abilities, enemy_ability, hero_ability, Ability, DamageKind, EnemyAbilitySet,
    HeroAction, TargetSelector, GUARD,
};
pub use damage::{
    crit_chance_bps, roll_damage, roll_heal, status_chance_bps, tick_statuses, try_apply_status,
    DamageRoll, TurnStart,
};
pub use encounters::roll_encounter;
pub use enemies::{
    enemy_definition, experience_reward, select_enemy_party, EnemyDefinition, EnemyParty,
    ENEMY_KINDS,
};
pub use loot::{chest_offer, chest_seed, combat_spoils, effective_luck, MAX_CHEST_ITEMS};
