//! Combat-scale participants built from hero snapshots and enemy definitions.

use serde::{Deserialize, Serialize};

use crate::entities::hero::{HeroClass, HeroSnapshot};
use crate::error::DomainError;
use crate::game_systems::enemies::enemy_definition;
use crate::value_objects::{StatusSet, Torch, TorchBand};

pub const HERO_AP_MAX: u8 = 3;
pub const ENEMY_AP_MAX: u8 = 2;
pub const MAX_ENEMIES: usize = 4;

/// Offensive and defensive ratings on the combat scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CombatStats {
    pub attack: u16,
    pub defense: u16,
    pub magic: u16,
    pub resistance: u16,
    pub speed: u16,
    pub luck: u16,
}

/// Result of dealing damage to a combatant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DamageOutcome {
    /// Target was already down; nothing happened
    AlreadyDead,
    /// Target took damage and is still standing
    Wounded { damage_dealt: u16, remaining_hp: u16 },
    /// Target was brought to zero
    Killed { damage_dealt: u16 },
}

/// Result of healing a combatant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HealOutcome {
    Healed { amount: u16, hp: u16 },
    /// Dead combatants cannot be healed, only revived
    NoEffect,
}

/// State shared by heroes and enemies in an encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatantCore {
    pub hp: u16,
    pub max_hp: u16,
    pub stats: CombatStats,
    pub action_points: u8,
    pub statuses: StatusSet,
    pub alive: bool,
}

impl CombatantCore {
    pub fn new(hp: u16, max_hp: u16, stats: CombatStats, action_points: u8) -> Self {
        let hp = hp.min(max_hp);
        Self {
            hp,
            max_hp,
            stats,
            action_points,
            statuses: StatusSet::new(),
            alive: hp > 0,
        }
    }

    pub fn take_damage(&mut self, amount: u16) -> DamageOutcome {
        if !self.alive {
            return DamageOutcome::AlreadyDead;
        }
        let damage_dealt = amount.min(self.hp);
        self.hp -= damage_dealt;
        if self.hp == 0 {
            self.alive = false;
            DamageOutcome::Killed { damage_dealt }
        } else {
            DamageOutcome::Wounded {
                damage_dealt,
                remaining_hp: self.hp,
            }
        }
    }

    pub fn heal(&mut self, amount: u16) -> HealOutcome {
        if !self.alive {
            return HealOutcome::NoEffect;
        }
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
        HealOutcome::Healed {
            amount: self.hp - before,
            hp: self.hp,
        }
    }

    /// Bring a downed combatant back at `percent` of max hp (at least 1).
    pub fn revive(&mut self, percent: u8) {
        let restored = u32::from(self.max_hp) * u32::from(percent) / 100;
        self.hp = (restored as u16).clamp(1, self.max_hp.max(1));
        self.alive = true;
        self.statuses = StatusSet::new();
    }

    pub fn spend_ap(&mut self, cost: u8) -> Result<(), DomainError> {
        if cost > self.action_points {
            return Err(DomainError::InsufficientActionPoints {
                required: cost,
                available: self.action_points,
            });
        }
        self.action_points -= cost;
        Ok(())
    }

    pub fn regen_ap(&mut self, max: u8) {
        self.action_points = self.action_points.saturating_add(1).min(max);
    }
}

/// `v` raised by `percent`, always by at least one point.
pub(crate) fn scale_up(value: u16, percent: u16) -> u16 {
    let bonus = (u32::from(value) * u32::from(percent) / 100).max(1);
    (u32::from(value) + bonus).min(u32::from(u16::MAX)) as u16
}

/// Keep `percent` of `value`, never below one.
pub(crate) fn scale_down(value: u16, percent: u16) -> u16 {
    ((u32::from(value) * u32::from(percent) / 100) as u16).max(1)
}

fn combat_hp(raw: u16, level: u8) -> u16 {
    let scaled = 18 + u32::from(level) * 6 + u32::from(raw) * 4 / 5;
    scaled.min(u32::from(u16::MAX)) as u16
}

fn combat_stat(raw: u16) -> u16 {
    8 + raw / 5
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroCombatant {
    pub hero_index: u8,
    pub class: HeroClass,
    pub core: CombatantCore,
    pub stress: u16,
    pub kill_streak: u8,
    pub pending_positive_traits: u8,
    pub pending_negative_traits: u8,
}

impl HeroCombatant {
    pub fn new(hero_index: u8, class: HeroClass, core: CombatantCore) -> Self {
        Self {
            hero_index,
            class,
            core,
            stress: 0,
            kill_streak: 0,
            pending_positive_traits: 0,
            pending_negative_traits: 0,
        }
    }

    /// Convert a run snapshot to combat scale, with darkness bonuses.
    pub fn from_snapshot(snapshot: &HeroSnapshot, hero_index: u8, torch: Torch) -> Self {
        let mut stats = CombatStats {
            attack: combat_stat(snapshot.attack),
            defense: combat_stat(snapshot.defense),
            magic: combat_stat(snapshot.magic),
            resistance: combat_stat(snapshot.resistance),
            speed: combat_stat(snapshot.speed),
            luck: combat_stat(snapshot.luck),
        };
        let bonus = match torch.band() {
            TorchBand::Dark => Some([15, 12, 15, 12, 10, 10]),
            TorchBand::Dim => Some([8, 6, 8, 6, 5, 5]),
            TorchBand::Bright => None,
        };
        if let Some([atk, def, mag, res, spd, lck]) = bonus {
            stats.attack = scale_up(stats.attack, atk);
            stats.defense = scale_up(stats.defense, def);
            stats.magic = scale_up(stats.magic, mag);
            stats.resistance = scale_up(stats.resistance, res);
            stats.speed = scale_up(stats.speed, spd);
            stats.luck = scale_up(stats.luck, lck);
        }

        let max_hp = combat_hp(snapshot.max_hp, snapshot.level);
        let hp = if snapshot.is_down() {
            0
        } else {
            combat_hp(snapshot.current_hp, snapshot.level)
        };
        let mut hero = Self::new(
            hero_index,
            snapshot.class,
            CombatantCore::new(hp, max_hp, stats, HERO_AP_MAX),
        );
        hero.stress = snapshot.stress;
        hero
    }

    /// Copy health and stress back to the run snapshot, mapping combat hp to
    /// the snapshot's scale proportionally.
    pub fn write_back(&self, snapshot: &mut HeroSnapshot) {
        snapshot.current_hp = if self.core.alive && self.core.max_hp > 0 {
            let ratio = u32::from(snapshot.max_hp) * u32::from(self.core.hp)
                / u32::from(self.core.max_hp);
            (ratio as u16).clamp(1, snapshot.max_hp.max(1))
        } else {
            0
        };
        snapshot.stress = self.stress.min(snapshot.stress_max);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyCombatant {
    pub kind: u8,
    pub core: CombatantCore,
}

impl EnemyCombatant {
    pub fn new(kind: u8, core: CombatantCore) -> Self {
        Self { kind, core }
    }

    /// Instantiate an enemy definition, scaled by darkness and then damped.
    pub fn spawn(kind: u8, torch: Torch) -> Self {
        let def = enemy_definition(kind);
        let t = torch.value();
        let mut max_hp = def.max_hp;
        if t <= 20 {
            max_hp = scale_up(max_hp, 18);
        } else if t <= 50 {
            max_hp = scale_up(max_hp, 8);
        }
        let (offense, defense) = match torch.band() {
            TorchBand::Dark => (Some(18), Some(12)),
            TorchBand::Dim => (Some(10), Some(6)),
            TorchBand::Bright => (None, None),
        };
        let lift = |v: u16, pct: Option<u16>| pct.map_or(v, |p| scale_up(v, p));
        let speed = if t <= 33 {
            scale_up(def.speed, 12)
        } else {
            def.speed
        };
        let luck = if t <= 20 { scale_up(def.luck, 14) } else { def.luck };

        // Enemies fight at three quarters of their listed strength.
        let stats = CombatStats {
            attack: scale_down(lift(def.attack, offense), 75),
            defense: scale_down(lift(def.defense, defense), 75),
            magic: scale_down(lift(def.magic, offense), 75),
            resistance: scale_down(lift(def.resistance, defense), 75),
            speed,
            luck,
        };
        let max_hp = scale_down(max_hp, 75);
        Self::new(def.kind, CombatantCore::new(max_hp, max_hp, stats, ENEMY_AP_MAX))
    }
}
