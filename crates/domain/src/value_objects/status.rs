//! Status effects carried by combatants.

use serde::{Deserialize, Serialize};

use super::bounded::BoundedVec;

/// Status slots per combatant.
pub const MAX_STATUS_PER_COMBATANT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusEffect {
    Poison,
    Bleed,
    Burn,
    /// Blocks action point regeneration.
    Chill,
    /// Mitigates incoming damage.
    Guard,
}

impl StatusEffect {
    pub const fn max_stacks(self) -> u8 {
        match self {
            Self::Poison => 5,
            Self::Bleed | Self::Chill => 3,
            Self::Burn => 2,
            Self::Guard => 1,
        }
    }

    pub const fn is_negative(self) -> bool {
        !matches!(self, Self::Guard)
    }

    pub const fn deals_damage(self) -> bool {
        matches!(self, Self::Poison | Self::Bleed | Self::Burn)
    }
}

/// Status an ability tries to inflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusApplication {
    pub effect: StatusEffect,
    pub duration: u8,
    /// Shifts the landing chance by this many percentage points.
    pub resist_modifier: i8,
}

impl StatusApplication {
    pub const fn new(effect: StatusEffect, duration: u8) -> Self {
        Self {
            effect,
            duration,
            resist_modifier: 0,
        }
    }

    pub const fn with_resist_modifier(mut self, modifier: i8) -> Self {
        self.resist_modifier = modifier;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusInstance {
    pub effect: StatusEffect,
    pub duration: u8,
    pub stacks: u8,
}

/// How an application landed in the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusApplied {
    Added,
    Stacked { stacks: u8 },
    /// Set was full; the shortest-lived status was evicted.
    Replaced { evicted: StatusEffect },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusSet {
    slots: BoundedVec<StatusInstance, MAX_STATUS_PER_COMBATANT>,
}

impl StatusSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusInstance> {
        self.slots.iter()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn stacks_of(&self, effect: StatusEffect) -> u8 {
        self.slots
            .iter()
            .find(|s| s.effect == effect)
            .map_or(0, |s| s.stacks)
    }

    pub fn has(&self, effect: StatusEffect) -> bool {
        self.stacks_of(effect) > 0
    }

    pub fn has_damage_over_time(&self) -> bool {
        self.slots.iter().any(|s| s.effect.deals_damage())
    }

    /// Existing effects gain a stack (capped) and keep the longer duration.
    /// New effects take a free slot, or evict the one closest to expiry.
    pub fn apply(&mut self, effect: StatusEffect, duration: u8) -> StatusApplied {
        if let Some(existing) = self.slots.iter_mut().find(|s| s.effect == effect) {
            existing.stacks = existing.stacks.saturating_add(1).min(effect.max_stacks());
            existing.duration = existing.duration.max(duration);
            return StatusApplied::Stacked {
                stacks: existing.stacks,
            };
        }

        let fresh = StatusInstance {
            effect,
            duration,
            stacks: 1,
        };
        if self.slots.try_push(fresh, "statuses").is_ok() {
            return StatusApplied::Added;
        }

        let weakest = self
            .slots
            .iter()
            .enumerate()
            .min_by_key(|(_, s)| s.duration)
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        let evicted = self.slots[weakest].effect;
        self.slots[weakest] = fresh;
        StatusApplied::Replaced { evicted }
    }

    pub fn remove(&mut self, effect: StatusEffect) -> bool {
        let before = self.slots.len();
        self.slots.retain(|s| s.effect != effect);
        self.slots.len() != before
    }

    pub fn clear_first_negative(&mut self) -> Option<StatusEffect> {
        let idx = self.slots.iter().position(|s| s.effect.is_negative())?;
        self.slots.remove(idx).map(|s| s.effect)
    }

    /// Damage dealt by damage-over-time effects at the start of a turn.
    pub fn tick_damage(&self) -> u16 {
        self.slots
            .iter()
            .map(|s| {
                let stacks = u16::from(s.stacks);
                match s.effect {
                    StatusEffect::Poison => stacks * 2,
                    StatusEffect::Bleed => stacks * 3,
                    StatusEffect::Burn => 4 + stacks,
                    StatusEffect::Chill | StatusEffect::Guard => 0,
                }
            })
            .sum()
    }

    /// End-of-turn decay: durations drop by one and expired statuses fall off.
    pub fn decay(&mut self) {
        for status in self.slots.iter_mut() {
            status.duration = status.duration.saturating_sub(1);
        }
        self.slots.retain(|s| s.duration > 0);
    }
}
