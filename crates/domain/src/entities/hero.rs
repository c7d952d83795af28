//! Heroes: the canonical home record and the per-run snapshot.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{AuthorityKey, HeroId, SessionKey};
use crate::value_objects::ItemEffect;

/// Heroes per party.
pub const MAX_PARTY: usize = 4;
/// Trait slots per polarity.
pub const TRAIT_SLOTS: usize = 3;
/// `status_flags` bit set when a hero was downed in a lost fight.
pub const STATUS_INCAPACITATED: u8 = 0b0000_0001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeroClass {
    Archer,
    Axeman,
    Knight,
    Templar,
    Priest,
    Soldier,
    Swordsman,
    Wizard,
}

/// Raw attributes as stored on the hero. Combat converts them to its own scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroStats {
    pub max_hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub magic: u16,
    pub resistance: u16,
    pub speed: u16,
    pub luck: u16,
}

/// Marks a hero as busy inside one adventure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroLock {
    /// Player that took the lock; `None` until first locked.
    pub owner: Option<AuthorityKey>,
    pub adventure: Option<SessionKey>,
    pub is_active: bool,
    pub updated_at: i64,
}

/// Canonical hero record, reconciled from a snapshot when a run ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroRecord {
    pub id: HeroId,
    pub owner: AuthorityKey,
    pub class: HeroClass,
    pub level: u8,
    pub experience: u64,
    pub stats: HeroStats,
    pub stress: u16,
    pub stress_max: u16,
    pub positive_traits: [u8; TRAIT_SLOTS],
    pub negative_traits: [u8; TRAIT_SLOTS],
    pub burned: bool,
    #[serde(default)]
    pub lock: HeroLock,
}

impl HeroRecord {
    /// Can `player` take this hero into `session`?
    pub fn ensure_available(
        &self,
        player: AuthorityKey,
        session: SessionKey,
    ) -> Result<(), DomainError> {
        if self.owner != player {
            return Err(DomainError::HeroNotOwned);
        }
        if self.burned {
            return Err(DomainError::HeroUnavailable);
        }
        if let Some(lock_owner) = self.lock.owner {
            if lock_owner != player {
                return Err(DomainError::HeroLockOwnerMismatch);
            }
        }
        if self.lock.is_active && self.lock.adventure != Some(session) {
            return Err(DomainError::HeroAlreadyActive);
        }
        Ok(())
    }

    pub fn lock_for(&mut self, player: AuthorityKey, session: SessionKey, now: i64) {
        self.lock = HeroLock {
            owner: Some(player),
            adventure: Some(session),
            is_active: true,
            updated_at: now,
        };
    }

    pub fn unlock(&mut self, now: i64) {
        self.lock.adventure = None;
        self.lock.is_active = false;
        self.lock.updated_at = now;
    }

    /// Run-scoped copy taken when the party enters. Heroes start at full health.
    pub fn snapshot(&self) -> HeroSnapshot {
        HeroSnapshot {
            hero_id: self.id,
            class: self.class,
            level: self.level,
            experience: self.experience,
            max_hp: self.stats.max_hp,
            current_hp: self.stats.max_hp,
            attack: self.stats.attack,
            defense: self.stats.defense,
            magic: self.stats.magic,
            resistance: self.stats.resistance,
            speed: self.stats.speed,
            luck: self.stats.luck,
            stress: self.stress.min(self.stress_max),
            stress_max: self.stress_max,
            positive_traits: self.positive_traits,
            negative_traits: self.negative_traits,
            status_flags: 0,
        }
    }

    /// Fold the run's progress back into the home record.
    pub fn reconcile(&mut self, snapshot: &HeroSnapshot) {
        self.experience = snapshot.experience;
        self.level = snapshot.level;
        self.stress = snapshot.stress.min(self.stress_max);
        self.positive_traits = snapshot.positive_traits;
        self.negative_traits = snapshot.negative_traits;
    }
}

/// Point-in-time copy of a hero owned by the session for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroSnapshot {
    pub hero_id: HeroId,
    pub class: HeroClass,
    pub level: u8,
    pub experience: u64,
    pub max_hp: u16,
    pub current_hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub magic: u16,
    pub resistance: u16,
    pub speed: u16,
    pub luck: u16,
    pub stress: u16,
    pub stress_max: u16,
    pub positive_traits: [u8; TRAIT_SLOTS],
    pub negative_traits: [u8; TRAIT_SLOTS],
    pub status_flags: u8,
}

impl HeroSnapshot {
    #[inline]
    pub fn is_down(&self) -> bool {
        self.current_hp == 0
    }

    #[inline]
    pub fn is_incapacitated(&self) -> bool {
        self.status_flags & STATUS_INCAPACITATED != 0
    }

    pub fn incapacitate(&mut self) {
        self.current_hp = 0;
        self.status_flags |= STATUS_INCAPACITATED;
    }

    /// Record a trait in the first free slot. Returns false when it is already
    /// present or no slot is free.
    pub fn add_trait(&mut self, value: u8, positive: bool) -> bool {
        let slots = if positive {
            &mut self.positive_traits
        } else {
            &mut self.negative_traits
        };
        if value == 0 || slots.contains(&value) {
            return false;
        }
        match slots.iter_mut().find(|slot| **slot == 0) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Apply an item outside of combat.
    pub fn apply_item(&mut self, effect: ItemEffect) -> Result<(), DomainError> {
        match effect {
            ItemEffect::ReduceStress(amount) | ItemEffect::Calm { stress: amount } => {
                self.stress = self.stress.saturating_sub(amount);
            }
            ItemEffect::RestoreHp(amount) => {
                if self.is_down() {
                    return Err(DomainError::HeroNotAlive);
                }
                self.current_hp = self.current_hp.saturating_add(amount).min(self.max_hp);
            }
            ItemEffect::Revive { percent } => {
                if !self.is_down() {
                    return Err(DomainError::InvalidTarget);
                }
                let restored = u32::from(self.max_hp) * u32::from(percent) / 100;
                self.current_hp = (restored as u16).max(1);
                self.status_flags &= !STATUS_INCAPACITATED;
            }
            ItemEffect::RefuelTorch(_) => return Err(DomainError::ItemNotUsable),
        }
        Ok(())
    }
}
