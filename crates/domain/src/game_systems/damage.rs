//! Damage, healing and status landing rolls.
//!
//! Every roll draws from the encounter's [`CombatRng`], so replaying the same
//! actions from the same state yields the same numbers.

use crate::entities::combatant::CombatStats;
use crate::value_objects::{CombatRng, StatusApplication, StatusApplied, StatusEffect, StatusSet};

use super::abilities::{Ability, DamageKind, HEAL_VARIANCE};

const CRIT_MULTIPLIER_PERCENT: u32 = 150;
const BASE_CRIT_BPS: u16 = 500;
const CRIT_PER_LUCK_BPS: u16 = 50;
const MAX_CRIT_BPS: u16 = 6_000;
const MIN_CRIT_DAMAGE: u16 = 6;
const GUARD_PERCENT: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageRoll {
    pub amount: u16,
    pub critical: bool,
}

pub fn crit_chance_bps(luck: u16) -> u16 {
    BASE_CRIT_BPS
        .saturating_add(luck.saturating_mul(CRIT_PER_LUCK_BPS))
        .min(MAX_CRIT_BPS)
}

fn mitigate(damage: u16, target: &CombatStats, physical: bool, guarded: bool) -> u16 {
    let mitigation = if physical {
        target.defense / 2
    } else {
        target.resistance / 2
    };
    let mut damage = damage.saturating_sub(mitigation);
    if guarded {
        damage = ((u32::from(damage) * GUARD_PERCENT / 100) as u16).max(1);
    }
    damage
}

/// Roll damage for an offensive ability. Heals deal nothing here.
pub fn roll_damage(
    rng: &mut CombatRng,
    ability: &Ability,
    attacker: &CombatStats,
    target: &CombatStats,
    guarded: bool,
) -> DamageRoll {
    let physical = match ability.kind {
        DamageKind::Physical => true,
        DamageKind::Magical => false,
        DamageKind::Heal => {
            return DamageRoll {
                amount: 0,
                critical: false,
            }
        }
    };
    let offensive = if physical {
        attacker.attack
    } else {
        attacker.magic
    };
    let base = (u32::from(offensive) * u32::from(ability.power) / 100).min(u32::from(u16::MAX)) as u16;
    let variance = (offensive / 3).max(4);
    let mut damage = base.saturating_add(rng.range(0, variance));

    let critical = rng.chance(crit_chance_bps(attacker.luck));
    if critical {
        damage = (u32::from(damage) * CRIT_MULTIPLIER_PERCENT / 100).min(u32::from(u16::MAX)) as u16;
        if physical {
            damage = damage.saturating_add(offensive / 4);
        }
        damage = damage.max(MIN_CRIT_DAMAGE);
    }

    DamageRoll {
        amount: mitigate(damage, target, physical, guarded).max(1),
        critical,
    }
}

/// Heal amount for a healing ability cast with `magic`.
pub fn roll_heal(rng: &mut CombatRng, ability: &Ability, magic: u16) -> u16 {
    let base = (u32::from(magic) * u32::from(ability.power) / 100).min(u32::from(u16::MAX)) as u16;
    base.saturating_add(rng.range(HEAL_VARIANCE.0, HEAL_VARIANCE.1))
}

/// Landing chance for a negative status, in basis points.
pub fn status_chance_bps(application: &StatusApplication, resist: u16, attacker_luck: u16) -> u16 {
    let chance = 6_500
        + i32::from(application.resist_modifier) * 100
        + i32::from(attacker_luck) * 50
        - i32::from(resist) * 45;
    chance.clamp(1_200, 9_800) as u16
}

/// Try to land a status. Guard always lands; anything else rolls against
/// the target's resistance.
pub fn try_apply_status(
    rng: &mut CombatRng,
    statuses: &mut StatusSet,
    application: &StatusApplication,
    resist: u16,
    attacker_luck: u16,
) -> Option<StatusApplied> {
    if application.effect != StatusEffect::Guard
        && !rng.chance(status_chance_bps(application, resist, attacker_luck))
    {
        return None;
    }
    Some(statuses.apply(application.effect, application.duration))
}

/// Start-of-turn status effects on one combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TurnStart {
    pub damage: u16,
    pub chilled: bool,
    pub guard_stripped: bool,
}

/// Resolve damage over time and chill. Burn has a quarter chance to strip an
/// active guard.
pub fn tick_statuses(rng: &mut CombatRng, statuses: &mut StatusSet) -> TurnStart {
    let mut start = TurnStart {
        damage: statuses.tick_damage(),
        chilled: statuses.has(StatusEffect::Chill),
        guard_stripped: false,
    };
    if statuses.has(StatusEffect::Burn) && statuses.has(StatusEffect::Guard) && rng.chance(2_500) {
        statuses.remove(StatusEffect::Guard);
        start.guard_stripped = true;
    }
    start
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_systems::abilities::{hero_ability, HeroAction};
    use crate::entities::hero::HeroClass;

    fn stats(attack: u16, defense: u16) -> CombatStats {
        CombatStats {
            attack,
            defense,
            magic: attack,
            resistance: defense,
            speed: 10,
            luck: 0,
        }
    }

    #[test]
    fn damage_is_at_least_base_minus_mitigation() {
        let attack = hero_ability(HeroClass::Soldier, HeroAction::Attack).unwrap();
        let mut rng = CombatRng::new(11);
        for _ in 0..200 {
            let roll = roll_damage(&mut rng, &attack, &stats(10, 0), &stats(0, 0), false);
            assert!(roll.amount >= 13);
        }
    }

    #[test]
    fn heavy_armour_still_takes_one() {
        let attack = hero_ability(HeroClass::Soldier, HeroAction::Attack).unwrap();
        let mut rng = CombatRng::new(5);
        let roll = roll_damage(&mut rng, &attack, &stats(1, 0), &stats(0, 500), false);
        assert_eq!(roll.amount, 1);
    }

    #[test]
    fn guard_reduces_damage() {
        let attack = hero_ability(HeroClass::Soldier, HeroAction::Attack).unwrap();
        let open = roll_damage(&mut CombatRng::new(3), &attack, &stats(40, 0), &stats(0, 0), false);
        let guarded = roll_damage(&mut CombatRng::new(3), &attack, &stats(40, 0), &stats(0, 0), true);
        assert!(guarded.amount < open.amount);
    }

    #[test]
    fn crit_chance_is_capped() {
        assert_eq!(crit_chance_bps(0), 500);
        assert_eq!(crit_chance_bps(10), 1_000);
        assert_eq!(crit_chance_bps(500), 6_000);
    }

    #[test]
    fn status_chance_clamps() {
        let bleed = StatusApplication::new(StatusEffect::Bleed, 3).with_resist_modifier(-5);
        assert_eq!(status_chance_bps(&bleed, 0, 0), 6_000);
        assert_eq!(status_chance_bps(&bleed, 1_000, 0), 1_200);
        assert_eq!(status_chance_bps(&bleed, 0, 1_000), 9_800);
    }

    #[test]
    fn guard_always_lands() {
        let mut set = StatusSet::new();
        let guard = StatusApplication::new(StatusEffect::Guard, 2);
        assert!(try_apply_status(&mut CombatRng::new(1), &mut set, &guard, 9_999, 0).is_some());
        assert!(set.has(StatusEffect::Guard));
    }

    #[test]
    fn ticks_report_chill_and_dot() {
        let mut set = StatusSet::new();
        set.apply(StatusEffect::Poison, 3);
        set.apply(StatusEffect::Chill, 2);
        let start = tick_statuses(&mut CombatRng::new(1), &mut set);
        assert_eq!(start.damage, 2);
        assert!(start.chilled);
    }
}
