//! Hero and enemy ability tables.
//!
//! Heroes pick an action per turn; enemies roll one of three abilities.
//! Both resolve through the same [`Ability`] shape so damage and status
//! application are shared.

use serde::{Deserialize, Serialize};

use crate::entities::hero::HeroClass;
use crate::value_objects::{StatusApplication, StatusEffect};

/// Which offensive stat (and which mitigation) an ability uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageKind {
    /// attack vs defense
    Physical,
    /// magic vs resistance
    Magical,
    /// restores an ally instead of hurting an enemy
    Heal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ability {
    pub cost: u8,
    pub kind: DamageKind,
    /// Percentage of the offensive stat dealt as base damage.
    pub power: u16,
    pub status: Option<StatusApplication>,
}

impl Ability {
    const fn physical(cost: u8, power: u16) -> Self {
        Self {
            cost,
            kind: DamageKind::Physical,
            power,
            status: None,
        }
    }

    const fn magical(cost: u8, power: u16) -> Self {
        Self {
            cost,
            kind: DamageKind::Magical,
            power,
            status: None,
        }
    }

    const fn heal(cost: u8) -> Self {
        Self {
            cost,
            kind: DamageKind::Heal,
            power: 160,
            status: None,
        }
    }

    const fn inflicting(mut self, status: StatusApplication) -> Self {
        self.status = Some(status);
        self
    }

    pub const fn targets_allies(&self) -> bool {
        matches!(self.kind, DamageKind::Heal)
    }
}

/// Something a hero can do on their turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeroAction {
    Attack,
    Skill1,
    Skill2,
    /// Grant Guard to self or an ally.
    Defend,
    UseItem,
    Escape,
}

impl HeroAction {
    /// Action points required, before any class-specific lookup.
    pub const fn base_cost(self) -> u8 {
        match self {
            Self::Defend => 0,
            Self::Attack | Self::UseItem | Self::Escape => 1,
            Self::Skill1 => 2,
            Self::Skill2 => 3,
        }
    }
}

/// Who an action is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "side", content = "index", rename_all = "snake_case")]
pub enum TargetSelector {
    #[default]
    None,
    Ally(u8),
    Enemy(u8),
}

/// Guard granted by Defend.
pub const GUARD: StatusApplication = StatusApplication::new(StatusEffect::Guard, 2);
/// Flat variance added to a heal.
pub const HEAL_VARIANCE: (u16, u16) = (8, 18);

const BASIC_ATTACK: Ability = Ability::physical(1, 135);

const POISON: StatusApplication = StatusApplication::new(StatusEffect::Poison, 4);
const BLEED: StatusApplication =
    StatusApplication::new(StatusEffect::Bleed, 3).with_resist_modifier(-5);
const BURN_HARSH: StatusApplication =
    StatusApplication::new(StatusEffect::Burn, 3).with_resist_modifier(-5);
const BURN: StatusApplication = StatusApplication::new(StatusEffect::Burn, 3);
const CHILL: StatusApplication = StatusApplication::new(StatusEffect::Chill, 2);

/// Damage or heal ability behind an offensive hero action. `None` for
/// Defend, UseItem and Escape, which are resolved separately.
pub fn hero_ability(class: HeroClass, action: HeroAction) -> Option<Ability> {
    let (skill1, skill2) = match class {
        HeroClass::Archer => (
            Ability::physical(2, 165),
            Ability::physical(3, 150).inflicting(POISON),
        ),
        HeroClass::Axeman => (
            Ability::physical(2, 175),
            Ability::physical(3, 185).inflicting(BLEED),
        ),
        HeroClass::Knight => (
            Ability::physical(2, 170),
            Ability::physical(3, 180).inflicting(BURN_HARSH),
        ),
        HeroClass::Templar => (
            Ability::physical(2, 180),
            Ability::physical(3, 190).inflicting(BLEED),
        ),
        HeroClass::Priest => (Ability::magical(2, 160), Ability::heal(3)),
        HeroClass::Soldier => (
            Ability::physical(2, 170),
            Ability::physical(3, 180).inflicting(POISON),
        ),
        HeroClass::Swordsman => (Ability::physical(2, 180), Ability::physical(3, 205)),
        HeroClass::Wizard => (
            Ability::magical(2, 170).inflicting(CHILL),
            Ability::magical(3, 190).inflicting(BURN),
        ),
    };
    match action {
        HeroAction::Attack => Some(BASIC_ATTACK),
        HeroAction::Skill1 => Some(skill1),
        HeroAction::Skill2 => Some(skill2),
        HeroAction::Defend | HeroAction::UseItem | HeroAction::Escape => None,
    }
}

/// Basic and two skills of one enemy kind.
#[derive(Debug, Clone, Copy)]
pub struct EnemyAbilitySet {
    pub basic: Ability,
    pub skill1: Ability,
    pub skill2: Ability,
}

const fn enemy_set(basic: u16, skill1: u16, skill2: u16) -> EnemyAbilitySet {
    EnemyAbilitySet {
        basic: Ability::physical(0, basic),
        skill1: Ability::physical(1, skill1),
        skill2: Ability::physical(2, skill2),
    }
}

const ENEMY_ABILITIES: [EnemyAbilitySet; 11] = [
    {
        let mut set = enemy_set(120, 150, 155);
        set.skill2 = set.skill2.inflicting(CHILL);
        set
    },
    {
        let mut set = enemy_set(125, 160, 165);
        set.skill2 = set.skill2.inflicting(BLEED);
        set
    },
    {
        let mut set = enemy_set(135, 160, 175);
        set.skill2 = set.skill2.inflicting(BLEED);
        set
    },
    enemy_set(125, 165, 170),
    enemy_set(120, 145, 165),
    enemy_set(140, 155, 165),
    enemy_set(120, 145, 160),
    enemy_set(110, 135, 155),
    enemy_set(110, 125, 140),
    enemy_set(140, 165, 175),
    enemy_set(130, 155, 170),
];

pub fn enemy_abilities(kind: u8) -> &'static EnemyAbilitySet {
    &ENEMY_ABILITIES[usize::from(kind) % ENEMY_ABILITIES.len()]
}

/// Pick an enemy ability from a roll: half basic, 30% skill 1, 20% skill 2.
/// Falls back to the basic ability when the enemy cannot pay.
pub fn enemy_ability(kind: u8, roll: u32, action_points: u8) -> Ability {
    let set = enemy_abilities(kind);
    let picked = match roll % 100 {
        0..=49 => set.basic,
        50..=79 => set.skill1,
        _ => set.skill2,
    };
    if picked.cost > action_points {
        set.basic
    } else {
        picked
    }
}
