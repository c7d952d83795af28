//! Combat outcomes
//!
//! Each submitted action returns an [`ActionReport`] listing everything that
//! happened until control returned to a hero or the fight ended.

use serde::{Deserialize, Serialize};

use crate::entities::Occupant;
use crate::value_objects::{ItemKey, StatusEffect};

/// Where an encounter stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatResolution {
    #[default]
    Active,
    Victory,
    Defeat,
    Escape,
}

impl CombatResolution {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CombatEvent {
    TurnStarted {
        actor: Occupant,
        round: u16,
    },
    StatusTick {
        actor: Occupant,
        damage: u16,
    },
    GuardBroken {
        actor: Occupant,
    },
    Damaged {
        source: Occupant,
        target: Occupant,
        amount: u16,
        critical: bool,
    },
    Healed {
        source: Occupant,
        target: Occupant,
        amount: u16,
    },
    StatusInflicted {
        target: Occupant,
        effect: StatusEffect,
    },
    ItemUsed {
        source: Occupant,
        target: Occupant,
        item: ItemKey,
    },
    Revived {
        target: Occupant,
    },
    Defeated {
        target: Occupant,
    },
    Escaped,
}

/// Everything that followed one submitted action.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionReport {
    pub events: Vec<CombatEvent>,
    pub resolution: CombatResolution,
    pub round: u16,
    /// Hero whose turn it is now, while the fight continues.
    pub next_hero: Option<u8>,
}

/// Rewards and penalties applied when a resolved fight is closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcludeOutcome {
    pub resolution: CombatResolution,
    pub experience_awarded: u32,
    pub loot_slots: usize,
    pub traits_gained: u8,
}
