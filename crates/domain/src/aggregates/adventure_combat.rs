//! AdventureCombat aggregate - one encounter fought by a session's party
//!
//! # Invariants
//!
//! - While `resolution` is `Active`, the turn cursor rests on a living hero.
//!   Enemy turns are resolved automatically as soon as they come up.
//! - A terminal resolution rejects every further action.
//! - `submit` either applies an action completely or leaves the combat (and
//!   the inventory it was given) untouched.
//! - Every roll draws from `rng_state`; nothing reads a clock or global RNG.

use serde::{Deserialize, Serialize};

use crate::entities::{
    DamageOutcome, EnemyCombatant, HealOutcome, HeroCombatant, HeroSnapshot, InitiativeEntry,
    InitiativeTable, Inventory, Occupant, ENEMY_AP_MAX, HERO_AP_MAX, MAX_ENEMIES, MAX_PARTY,
};
use crate::error::DomainError;
use crate::events::{ActionReport, CombatEvent, CombatResolution};
use crate::game_systems::{
    enemy_ability, hero_ability, roll_damage, roll_heal, select_enemy_party, tick_statuses,
    try_apply_status, Ability, DamageKind, HeroAction, TargetSelector, GUARD,
};
use crate::ids::SessionKey;
use crate::value_objects::{
    BoundedVec, CombatRng, ItemEffect, ItemKey, StatusEffect, Torch, UseContext,
};

/// Kill streak at which a hero may earn a positive trait.
const STREAK_FOR_TRAIT: u8 = 2;
const STREAK_TRAIT_BPS: u16 = 3_000;
const TRAUMA_TRAIT_BPS: u16 = 4_000;
/// Share of max hp a single hit must exceed to count as heavy.
const HEAVY_HIT_PERCENT: u32 = 40;

/// One submitted hero action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatAction {
    pub hero_index: u8,
    pub action: HeroAction,
    #[serde(default)]
    pub target: TargetSelector,
    #[serde(default)]
    pub item: Option<ItemKey>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdventureCombat {
    session: SessionKey,
    round: u16,
    turn_cursor: u8,
    rng_state: u64,
    torch: Torch,
    heroes: BoundedVec<HeroCombatant, MAX_PARTY>,
    enemies: BoundedVec<EnemyCombatant, MAX_ENEMIES>,
    initiative: InitiativeTable,
    resolution: CombatResolution,
    encounter_seed: u64,
    loot_seed: u64,
    last_updated: i64,
    active: bool,
}

impl AdventureCombat {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Open an encounter: roll the enemy roster from `encounter_seed`, bring in
    /// the party and play any enemy turns that come before the first hero.
    pub fn begin(
        session: SessionKey,
        party: &[HeroSnapshot],
        torch: Torch,
        encounter_seed: u64,
        session_seed: u32,
        now: i64,
    ) -> Result<(Self, ActionReport), DomainError> {
        let heroes = party
            .iter()
            .enumerate()
            .map(|(idx, snapshot)| HeroCombatant::from_snapshot(snapshot, idx as u8, torch))
            .collect::<Vec<_>>();
        let roster = select_enemy_party(encounter_seed, torch);
        let mut combat = Self::from_roster(
            session,
            heroes,
            roster.enemies,
            roster.next_rng_state,
            torch,
            now,
        )?;
        combat.encounter_seed = encounter_seed;
        combat.loot_seed = loot_seed(encounter_seed, session_seed);
        let report = combat.open();
        Ok((combat, report))
    }

    /// Build an encounter from explicit combatants. Used by `begin` and by
    /// callers that stage fights directly. The first turn is not played yet;
    /// call [`AdventureCombat::open`].
    pub fn from_roster(
        session: SessionKey,
        heroes: Vec<HeroCombatant>,
        enemies: Vec<EnemyCombatant>,
        rng_state: u64,
        torch: Torch,
        now: i64,
    ) -> Result<Self, DomainError> {
        if heroes.is_empty() || heroes.len() > MAX_PARTY {
            return Err(DomainError::InvalidHeroCount {
                count: heroes.len(),
                max: MAX_PARTY,
            });
        }
        if !heroes.iter().any(|h| h.core.alive) {
            return Err(DomainError::HeroNotAlive);
        }
        if enemies.is_empty() {
            return Err(DomainError::capacity("enemies", MAX_ENEMIES));
        }
        let heroes = BoundedVec::try_from_vec(heroes, "heroes")?;
        let enemies = BoundedVec::try_from_vec(enemies, "enemies")?;

        let mut rng = CombatRng::new(rng_state);
        let entries = heroes
            .iter()
            .map(|h| InitiativeEntry {
                occupant: Occupant::Hero(h.hero_index),
                speed: h.core.stats.speed,
                alive: h.core.alive,
            })
            .chain(enemies.iter().enumerate().map(|(idx, e)| InitiativeEntry {
                occupant: Occupant::Enemy(idx as u8),
                speed: e.core.stats.speed,
                alive: e.core.alive,
            }));
        let initiative = InitiativeTable::build(entries, &mut rng)?;

        Ok(Self {
            session,
            round: 1,
            turn_cursor: 0,
            rng_state: rng.state(),
            torch,
            heroes,
            enemies,
            initiative,
            resolution: CombatResolution::Active,
            encounter_seed: rng_state,
            loot_seed: rng_state,
            last_updated: now,
            active: true,
        })
    }

    /// Start the first turn, auto-playing enemies until a hero is up.
    pub fn open(&mut self) -> ActionReport {
        let mut events = Vec::new();
        let mut rng = CombatRng::new(self.rng_state);
        self.run_until_hero(&mut rng, &mut events, false);
        self.rng_state = rng.state();
        self.report(events)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn session(&self) -> SessionKey {
        self.session
    }

    #[inline]
    pub fn round(&self) -> u16 {
        self.round
    }

    #[inline]
    pub fn turn_cursor(&self) -> u8 {
        self.turn_cursor
    }

    #[inline]
    pub fn rng_state(&self) -> u64 {
        self.rng_state
    }

    #[inline]
    pub fn torch(&self) -> Torch {
        self.torch
    }

    pub fn heroes(&self) -> &[HeroCombatant] {
        &self.heroes
    }

    pub fn enemies(&self) -> &[EnemyCombatant] {
        &self.enemies
    }

    pub fn initiative(&self) -> &InitiativeTable {
        &self.initiative
    }

    #[inline]
    pub fn resolution(&self) -> CombatResolution {
        self.resolution
    }

    #[inline]
    pub fn encounter_seed(&self) -> u64 {
        self.encounter_seed
    }

    #[inline]
    pub fn loot_seed(&self) -> u64 {
        self.loot_seed
    }

    #[inline]
    pub fn last_updated(&self) -> i64 {
        self.last_updated
    }

    /// True until the fight is concluded, even after it is resolved.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Hero whose turn it is, if the fight is still running.
    pub fn current_hero(&self) -> Option<u8> {
        if self.resolution.is_terminal() {
            return None;
        }
        match self.initiative.get(self.turn_cursor)?.occupant {
            Occupant::Hero(idx) => Some(idx),
            Occupant::Enemy(_) => None,
        }
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Apply one hero action, then play enemy turns until a hero is up again
    /// or the fight is decided. On error neither `self` nor `inventory` change.
    pub fn submit(
        &mut self,
        action: CombatAction,
        inventory: &mut Inventory,
        now: i64,
    ) -> Result<ActionReport, DomainError> {
        if !self.active || self.resolution.is_terminal() {
            return Err(DomainError::CombatNotActive);
        }
        let hero_idx = usize::from(action.hero_index);
        if hero_idx >= self.heroes.len() {
            return Err(DomainError::HeroIndexOutOfRange {
                index: action.hero_index,
            });
        }
        if self.current_hero() != Some(action.hero_index) {
            return Err(DomainError::NotHeroTurn);
        }
        if !self.heroes[hero_idx].core.alive {
            return Err(DomainError::HeroNotAlive);
        }

        let mut next = self.clone();
        let mut staged_items = inventory.clone();
        let mut rng = CombatRng::new(next.rng_state);
        let mut events = Vec::new();

        next.apply_hero_action(action, &mut staged_items, &mut rng, &mut events)?;
        next.evaluate();
        if !next.resolution.is_terminal() {
            next.heroes[hero_idx].core.statuses.decay();
            next.run_until_hero(&mut rng, &mut events, true);
        }
        next.rng_state = rng.state();
        next.last_updated = now;

        *self = next;
        *inventory = staged_items;
        Ok(self.report(events))
    }

    /// Close a resolved fight. A second call fails and changes nothing.
    pub fn conclude(&mut self, now: i64) -> Result<CombatResolution, DomainError> {
        if !self.active {
            return Err(DomainError::CombatNotActive);
        }
        if !self.resolution.is_terminal() {
            return Err(DomainError::CombatNotResolved);
        }
        self.active = false;
        self.last_updated = now;
        Ok(self.resolution)
    }

    /// Enemy kinds that were killed, for experience.
    pub fn defeated_kinds(&self) -> impl Iterator<Item = u8> + '_ {
        self.enemies
            .iter()
            .filter(|e| !e.core.alive)
            .map(|e| e.kind)
    }

    // =========================================================================
    // Hero actions
    // =========================================================================

    fn apply_hero_action(
        &mut self,
        action: CombatAction,
        inventory: &mut Inventory,
        rng: &mut CombatRng,
        events: &mut Vec<CombatEvent>,
    ) -> Result<(), DomainError> {
        let hero_idx = usize::from(action.hero_index);
        let actor = Occupant::Hero(action.hero_index);
        let ability = hero_ability(self.heroes[hero_idx].class, action.action);
        let cost = ability.map_or(action.action.base_cost(), |a| a.cost);
        self.heroes[hero_idx].core.spend_ap(cost)?;

        match (action.action, ability) {
            (HeroAction::Attack | HeroAction::Skill1 | HeroAction::Skill2, Some(ability)) => {
                if ability.kind == DamageKind::Heal {
                    let target = self.ally_target(action.hero_index, action.target)?;
                    self.heal_ally(hero_idx, target, &ability, rng, events)?;
                } else {
                    let target = self.enemy_target(action.target)?;
                    self.strike_enemy(hero_idx, target, &ability, rng, events);
                }
            }
            (HeroAction::Defend, _) => {
                let target = self.ally_target(action.hero_index, action.target)?;
                let guarded = &mut self.heroes[target].core;
                if !guarded.alive {
                    return Err(DomainError::InvalidTarget);
                }
                guarded.statuses.apply(GUARD.effect, GUARD.duration);
                events.push(CombatEvent::StatusInflicted {
                    target: Occupant::Hero(target as u8),
                    effect: StatusEffect::Guard,
                });
            }
            (HeroAction::UseItem, _) => {
                let key = action.item.ok_or(DomainError::ItemNotFound)?;
                let target = self.ally_target(action.hero_index, action.target)?;
                self.use_item(actor, key, target, inventory, events)?;
                self.heroes[hero_idx].kill_streak = 0;
            }
            (HeroAction::Escape, _) => {
                let blocked = self
                    .heroes
                    .iter()
                    .any(|h| h.core.alive && h.core.statuses.has_damage_over_time());
                if blocked {
                    return Err(DomainError::EscapeBlocked);
                }
                self.resolution = CombatResolution::Escape;
                events.push(CombatEvent::Escaped);
            }
            // Offensive actions always carry an ability.
            (HeroAction::Attack | HeroAction::Skill1 | HeroAction::Skill2, None) => {
                return Err(DomainError::InvalidTarget)
            }
        }
        Ok(())
    }

    fn enemy_target(&self, target: TargetSelector) -> Result<usize, DomainError> {
        match target {
            TargetSelector::Enemy(idx)
                if self
                    .enemies
                    .get(usize::from(idx))
                    .is_some_and(|e| e.core.alive) =>
            {
                Ok(usize::from(idx))
            }
            _ => Err(DomainError::InvalidTarget),
        }
    }

    /// `None` targets the acting hero.
    fn ally_target(&self, actor: u8, target: TargetSelector) -> Result<usize, DomainError> {
        let idx = match target {
            TargetSelector::None => actor,
            TargetSelector::Ally(idx) => idx,
            TargetSelector::Enemy(_) => return Err(DomainError::InvalidTarget),
        };
        if usize::from(idx) >= self.heroes.len() {
            return Err(DomainError::InvalidTarget);
        }
        Ok(usize::from(idx))
    }

    fn strike_enemy(
        &mut self,
        hero_idx: usize,
        target: usize,
        ability: &Ability,
        rng: &mut CombatRng,
        events: &mut Vec<CombatEvent>,
    ) {
        let source = Occupant::Hero(hero_idx as u8);
        let victim = Occupant::Enemy(target as u8);
        let attacker = self.heroes[hero_idx].core.stats;
        let defender = self.enemies[target].core.stats;
        let guarded = self.enemies[target].core.statuses.has(StatusEffect::Guard);
        let roll = roll_damage(rng, ability, &attacker, &defender, guarded);

        let outcome = self.enemies[target].core.take_damage(roll.amount);
        events.push(CombatEvent::Damaged {
            source,
            target: victim,
            amount: roll.amount,
            critical: roll.critical,
        });

        let hero = &mut self.heroes[hero_idx];
        match outcome {
            DamageOutcome::Killed { .. } => {
                hero.kill_streak = hero.kill_streak.saturating_add(1);
                if hero.kill_streak >= STREAK_FOR_TRAIT && rng.chance(STREAK_TRAIT_BPS) {
                    hero.pending_positive_traits = hero.pending_positive_traits.saturating_add(1);
                }
                self.initiative.set_active(victim, false);
                events.push(CombatEvent::Defeated { target: victim });
            }
            DamageOutcome::Wounded { .. } => hero.kill_streak = 0,
            DamageOutcome::AlreadyDead => {}
        }

        if let Some(status) = ability.status {
            let luck = self.heroes[hero_idx].core.stats.luck;
            let enemy = &mut self.enemies[target].core;
            if enemy.alive {
                let resist = enemy.stats.resistance;
                if try_apply_status(rng, &mut enemy.statuses, &status, resist, luck).is_some() {
                    events.push(CombatEvent::StatusInflicted {
                        target: victim,
                        effect: status.effect,
                    });
                }
            }
        }
    }

    fn heal_ally(
        &mut self,
        hero_idx: usize,
        target: usize,
        ability: &Ability,
        rng: &mut CombatRng,
        events: &mut Vec<CombatEvent>,
    ) -> Result<(), DomainError> {
        if !self.heroes[target].core.alive {
            return Err(DomainError::InvalidTarget);
        }
        let amount = roll_heal(rng, ability, self.heroes[hero_idx].core.stats.magic);
        if let HealOutcome::Healed { amount, .. } = self.heroes[target].core.heal(amount) {
            events.push(CombatEvent::Healed {
                source: Occupant::Hero(hero_idx as u8),
                target: Occupant::Hero(target as u8),
                amount,
            });
        }
        self.heroes[hero_idx].kill_streak = 0;
        Ok(())
    }

    fn use_item(
        &mut self,
        source: Occupant,
        key: ItemKey,
        target: usize,
        inventory: &mut Inventory,
        events: &mut Vec<CombatEvent>,
    ) -> Result<(), DomainError> {
        let effect = key
            .effect()
            .filter(|_| key.usable_in(UseContext::Combat))
            .ok_or(DomainError::ItemNotUsable)?;
        if inventory.quantity_of(key) == 0 {
            return Err(DomainError::ItemNotFound);
        }
        let ally = &mut self.heroes[target];
        match effect {
            ItemEffect::Revive { percent } => {
                if ally.core.alive {
                    return Err(DomainError::InvalidTarget);
                }
                ally.core.revive(percent);
                self.initiative.set_active(Occupant::Hero(target as u8), true);
                events.push(CombatEvent::Revived {
                    target: Occupant::Hero(target as u8),
                });
            }
            _ if !ally.core.alive => return Err(DomainError::HeroNotAlive),
            ItemEffect::RestoreHp(amount) => {
                ally.core.heal(amount);
            }
            ItemEffect::ReduceStress(amount) => {
                ally.stress = ally.stress.saturating_sub(amount);
            }
            ItemEffect::Calm { stress } => {
                ally.stress = ally.stress.saturating_sub(stress);
                ally.core.statuses.clear_first_negative();
            }
            ItemEffect::RefuelTorch(_) => return Err(DomainError::ItemNotUsable),
        }
        inventory.drop_item(key, 1)?;
        events.push(CombatEvent::ItemUsed {
            source,
            target: Occupant::Hero(target as u8),
            item: key,
        });
        Ok(())
    }

    // =========================================================================
    // Turn flow
    // =========================================================================

    /// Advance through initiative, playing enemy turns, until a living hero
    /// holds the cursor or the fight is decided. With `advance_first` unset the
    /// slot under the cursor is started before moving on.
    fn run_until_hero(
        &mut self,
        rng: &mut CombatRng,
        events: &mut Vec<CombatEvent>,
        mut advance_first: bool,
    ) {
        while !self.resolution.is_terminal() {
            if advance_first {
                let Some((next, wrapped)) = self.initiative.next_active(self.turn_cursor) else {
                    self.evaluate();
                    return;
                };
                if wrapped {
                    self.round = self.round.saturating_add(1);
                }
                self.turn_cursor = next;
            }
            advance_first = true;

            let Some(slot) = self.initiative.get(self.turn_cursor).copied() else {
                return;
            };
            if !slot.active {
                continue;
            }
            events.push(CombatEvent::TurnStarted {
                actor: slot.occupant,
                round: self.round,
            });
            if !self.start_turn(slot.occupant, rng, events) {
                self.evaluate();
                continue;
            }
            match slot.occupant {
                Occupant::Hero(_) => return,
                Occupant::Enemy(idx) => {
                    self.enemy_turn(usize::from(idx), rng, events);
                    self.evaluate();
                }
            }
        }
    }

    /// Start-of-turn ticks and AP regeneration. Returns false if the
    /// combatant died from its statuses.
    fn start_turn(
        &mut self,
        actor: Occupant,
        rng: &mut CombatRng,
        events: &mut Vec<CombatEvent>,
    ) -> bool {
        let (core, ap_max) = match actor {
            Occupant::Hero(idx) => (&mut self.heroes[usize::from(idx)].core, HERO_AP_MAX),
            Occupant::Enemy(idx) => (&mut self.enemies[usize::from(idx)].core, ENEMY_AP_MAX),
        };
        let tick = tick_statuses(rng, &mut core.statuses);
        if tick.guard_stripped {
            events.push(CombatEvent::GuardBroken { actor });
        }
        if tick.damage > 0 {
            events.push(CombatEvent::StatusTick {
                actor,
                damage: tick.damage,
            });
            if let DamageOutcome::Killed { .. } = core.take_damage(tick.damage) {
                self.initiative.set_active(actor, false);
                events.push(CombatEvent::Defeated { target: actor });
                return false;
            }
        }
        if !tick.chilled {
            core.regen_ap(ap_max);
        }
        true
    }

    fn enemy_turn(&mut self, enemy_idx: usize, rng: &mut CombatRng, events: &mut Vec<CombatEvent>) {
        let source = Occupant::Enemy(enemy_idx as u8);
        let living: Vec<usize> = self
            .heroes
            .iter()
            .enumerate()
            .filter(|(_, h)| h.core.alive)
            .map(|(idx, _)| idx)
            .collect();
        if living.is_empty() {
            return;
        }

        let roll = rng.next_u32();
        let enemy = &self.enemies[enemy_idx];
        let ability = enemy_ability(enemy.kind, roll, enemy.core.action_points);
        let attacker = enemy.core.stats;
        let target = living[roll as usize % living.len()];
        let victim = Occupant::Hero(target as u8);

        let hero = &mut self.heroes[target];
        let guarded = hero.core.statuses.has(StatusEffect::Guard);
        let damage = roll_damage(rng, &ability, &attacker, &hero.core.stats, guarded);
        let heavy = u32::from(damage.amount) * 100 > u32::from(hero.core.max_hp) * HEAVY_HIT_PERCENT;
        if heavy && rng.chance(TRAUMA_TRAIT_BPS) {
            hero.pending_negative_traits = hero.pending_negative_traits.saturating_add(1);
        }
        let outcome = hero.core.take_damage(damage.amount);
        events.push(CombatEvent::Damaged {
            source,
            target: victim,
            amount: damage.amount,
            critical: damage.critical,
        });

        if let DamageOutcome::Killed { .. } = outcome {
            self.initiative.set_active(victim, false);
            events.push(CombatEvent::Defeated { target: victim });
            for (idx, witness) in self.heroes.iter_mut().enumerate() {
                if idx != target && witness.core.alive && rng.chance(TRAUMA_TRAIT_BPS) {
                    witness.pending_negative_traits =
                        witness.pending_negative_traits.saturating_add(1);
                }
            }
        } else if let Some(status) = ability.status {
            let hero = &mut self.heroes[target].core;
            let resist = hero.stats.resistance;
            if try_apply_status(rng, &mut hero.statuses, &status, resist, attacker.luck).is_some()
            {
                events.push(CombatEvent::StatusInflicted {
                    target: victim,
                    effect: status.effect,
                });
            }
        }

        let core = &mut self.enemies[enemy_idx].core;
        core.action_points = core.action_points.saturating_sub(ability.cost);
        core.statuses.decay();
    }

    fn evaluate(&mut self) {
        if self.resolution.is_terminal() {
            return;
        }
        if self.enemies.iter().all(|e| !e.core.alive) {
            self.resolution = CombatResolution::Victory;
        } else if self.heroes.iter().all(|h| !h.core.alive) {
            self.resolution = CombatResolution::Defeat;
        }
    }

    fn report(&self, events: Vec<CombatEvent>) -> ActionReport {
        ActionReport {
            events,
            resolution: self.resolution,
            round: self.round,
            next_hero: self.current_hero(),
        }
    }
}

/// Loot seed for an encounter; never zero.
fn loot_seed(encounter_seed: u64, session_seed: u32) -> u64 {
    let seed = encounter_seed.rotate_left(17) ^ (u64::from(session_seed) << 11);
    if seed == 0 {
        encounter_seed | 1
    } else {
        seed
    }
}
