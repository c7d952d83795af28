//! AdventureSession aggregate - one player's run through one dungeon
//!
//! # Invariants
//!
//! - `hero_count()` is derived from the snapshots and never stored on its own.
//! - `party_position` is always inside the map and on a floor tile.
//! - `in_combat` is true exactly while this session's combat record is active.
//! - Every mutation validates before it writes. An `Err` leaves the session,
//!   and any hero records passed in, as they were.
//!
//! Each successful mutation bumps `version`; stores use it for optimistic
//! concurrency.

use serde::{Deserialize, Serialize};

use crate::aggregates::adventure_combat::{AdventureCombat, CombatAction};
use crate::entities::{
    DungeonMap, DungeonRecord, HeroRecord, HeroSnapshot, Inventory, PendingLoot, PickupOutcome,
    MAX_ITEMS, MAX_PARTY,
};
use crate::error::DomainError;
use crate::events::{
    ActionReport, CombatResolution, ConcludeOutcome, ExitOutcome, MoveOutcome, StartOutcome,
    TileInteraction,
};
use crate::game_systems::{
    chest_offer, chest_seed, combat_spoils, effective_luck, experience_reward, roll_encounter,
};
use crate::ids::{AuthorityKey, HeroId, SessionKey};
use crate::value_objects::{
    BoundedVec, Direction, DungeonPoint, ItemEffect, ItemKey, ItemSlot, QuantityChangeResult,
    SessionAuthority, Torch, UseContext,
};

/// Opened chests and used portals are cleared once this much time has passed.
pub const RESET_INTERVAL_SECONDS: i64 = 86_400;
/// The same crew re-entering within this window resumes at its exit portal.
pub const RESUME_WINDOW_SECONDS: i64 = 86_400;

/// Trait slot value recorded for traits earned in combat.
const COMBAT_TRAIT: u8 = 1;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// Which heroes last left the dungeon, and when.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrewMark {
    pub hash: u64,
    pub at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdventureSession {
    key: SessionKey,
    authority: SessionAuthority,
    seed: u32,
    map: DungeonMap,
    is_active: bool,
    heroes_inside: bool,
    heroes: BoundedVec<HeroSnapshot, MAX_PARTY>,
    party_position: DungeonPoint,
    items: Inventory,
    pending_loot: PendingLoot,
    /// Bit `i` set once chest `i` has been opened.
    opened_chests: u64,
    /// Bit `i` set once the party left through portal `i`.
    used_portals: u8,
    torch: Torch,
    in_combat: bool,
    pending_encounter_seed: Option<u64>,
    move_count: u32,
    created_at: i64,
    last_started_at: i64,
    last_reset_at: i64,
    last_exit_at: i64,
    last_exit_portal: Option<u8>,
    last_exit_position: Option<DungeonPoint>,
    last_crew: Option<CrewMark>,
    version: u64,
}

impl AdventureSession {
    // =========================================================================
    // Constructor
    // =========================================================================

    /// Empty session for `key`, with the map copied from the dungeon record.
    pub fn new(key: SessionKey, dungeon: &DungeonRecord, now: i64) -> Result<Self, DomainError> {
        let map = dungeon.build_map()?;
        Ok(Self {
            key,
            authority: SessionAuthority::new(key.player),
            seed: dungeon.seed,
            party_position: map.entrance(),
            map,
            is_active: false,
            heroes_inside: false,
            heroes: BoundedVec::new(),
            items: Inventory::new(),
            pending_loot: PendingLoot::default(),
            opened_chests: 0,
            used_portals: 0,
            torch: Torch::full(),
            in_combat: false,
            pending_encounter_seed: None,
            move_count: 0,
            created_at: now,
            last_started_at: 0,
            last_reset_at: now,
            last_exit_at: 0,
            last_exit_portal: None,
            last_exit_position: None,
            last_crew: None,
            version: 0,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn key(&self) -> SessionKey {
        self.key
    }

    #[inline]
    pub fn authority(&self) -> &SessionAuthority {
        &self.authority
    }

    #[inline]
    pub fn delegate(&self) -> Option<AuthorityKey> {
        self.authority.delegate()
    }

    #[inline]
    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn map(&self) -> &DungeonMap {
        &self.map
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    #[inline]
    pub fn heroes_inside(&self) -> bool {
        self.heroes_inside
    }

    pub fn heroes(&self) -> &[HeroSnapshot] {
        &self.heroes
    }

    #[inline]
    pub fn hero_count(&self) -> usize {
        self.heroes.len()
    }

    pub fn hero_ids(&self) -> impl Iterator<Item = HeroId> + '_ {
        self.heroes.iter().map(|h| h.hero_id)
    }

    #[inline]
    pub fn party_position(&self) -> DungeonPoint {
        self.party_position
    }

    pub fn items(&self) -> &Inventory {
        &self.items
    }

    pub fn pending_loot(&self) -> &PendingLoot {
        &self.pending_loot
    }

    pub fn is_chest_opened(&self, index: u8) -> bool {
        index < 64 && self.opened_chests & (1 << index) != 0
    }

    pub fn is_portal_used(&self, index: u8) -> bool {
        index < 8 && self.used_portals & (1 << index) != 0
    }

    #[inline]
    pub fn torch(&self) -> Torch {
        self.torch
    }

    #[inline]
    pub fn in_combat(&self) -> bool {
        self.in_combat
    }

    #[inline]
    pub fn pending_encounter_seed(&self) -> Option<u64> {
        self.pending_encounter_seed
    }

    #[inline]
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    #[inline]
    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    #[inline]
    pub fn last_started_at(&self) -> i64 {
        self.last_started_at
    }

    #[inline]
    pub fn last_reset_at(&self) -> i64 {
        self.last_reset_at
    }

    #[inline]
    pub fn last_exit_at(&self) -> i64 {
        self.last_exit_at
    }

    #[inline]
    pub fn last_exit_portal(&self) -> Option<u8> {
        self.last_exit_portal
    }

    #[inline]
    pub fn last_exit_position(&self) -> Option<DungeonPoint> {
        self.last_exit_position
    }

    #[inline]
    pub fn last_crew(&self) -> Option<CrewMark> {
        self.last_crew
    }

    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Bring a party in. On success each hero record is locked to this session;
    /// the caller persists those records together with the session.
    pub fn start(
        &mut self,
        caller: AuthorityKey,
        heroes: &mut [HeroRecord],
        items: &[ItemSlot],
        now: i64,
    ) -> Result<StartOutcome, DomainError> {
        if caller != self.key.player {
            return Err(DomainError::AdventureOwnerMismatch);
        }
        self.authority.authorize(caller)?;
        if self.heroes_inside {
            return Err(DomainError::AdventureAlreadyActive);
        }
        if heroes.is_empty() || heroes.len() > MAX_PARTY {
            return Err(DomainError::InvalidHeroCount {
                count: heroes.len(),
                max: MAX_PARTY,
            });
        }
        for (idx, hero) in heroes.iter().enumerate() {
            if heroes[..idx].iter().any(|other| other.id == hero.id) {
                return Err(DomainError::DuplicateHero);
            }
            hero.ensure_available(caller, self.key)?;
        }
        if items.len() > MAX_ITEMS {
            return Err(DomainError::TooManyItems { max: MAX_ITEMS });
        }
        if let Some(slot) = items.iter().find(|s| s.item_key().is_loot_only()) {
            return Err(DomainError::InvalidItemKey(slot.item_key().as_u8()));
        }
        let inventory = Inventory::from_slots(items)?;
        let snapshots = BoundedVec::try_from_vec(
            heroes.iter().map(HeroRecord::snapshot).collect(),
            "heroes",
        )?;

        let daily_reset = now.saturating_sub(self.last_reset_at) >= RESET_INTERVAL_SECONDS;
        if daily_reset {
            self.opened_chests = 0;
            self.used_portals = 0;
            self.last_reset_at = now;
        }
        let resume = self.resume_position(crew_hash(heroes.iter().map(|h| h.id)), now);

        for hero in heroes.iter_mut() {
            hero.lock_for(caller, self.key, now);
        }
        self.heroes = snapshots;
        self.items = inventory;
        self.pending_loot.clear();
        self.torch = Torch::full();
        self.in_combat = false;
        self.pending_encounter_seed = None;
        self.is_active = true;
        self.heroes_inside = true;
        self.last_started_at = now;
        self.party_position = resume.unwrap_or_else(|| self.map.entrance());
        self.touch();

        Ok(StartOutcome {
            position: self.party_position,
            resumed: resume.is_some(),
            daily_reset,
        })
    }

    /// Clear per-dungeon progress between runs.
    pub fn reset(&mut self, caller: AuthorityKey, now: i64) -> Result<(), DomainError> {
        self.authority.authorize(caller)?;
        if self.heroes_inside {
            return Err(DomainError::ResetBlocked);
        }
        self.opened_chests = 0;
        self.used_portals = 0;
        self.pending_loot.clear();
        self.pending_encounter_seed = None;
        self.torch = Torch::full();
        self.party_position = self.map.entrance();
        self.last_reset_at = now;
        self.touch();
        Ok(())
    }

    /// Leave through the portal under the party. Snapshots are folded back into
    /// `heroes` (the home records) and their locks released.
    pub fn exit(
        &mut self,
        caller: AuthorityKey,
        heroes: &mut [HeroRecord],
        now: i64,
    ) -> Result<ExitOutcome, DomainError> {
        self.authority.authorize(caller)?;
        self.ensure_exploring()?;
        let portal = self
            .map
            .portal_at(self.party_position)
            .ok_or(DomainError::NoPortalAtPosition)? as u8;
        for snapshot in self.heroes.iter() {
            if !heroes.iter().any(|h| h.id == snapshot.hero_id) {
                return Err(DomainError::HeroUnavailable);
            }
        }

        let mut reconciled = Vec::with_capacity(self.heroes.len());
        for record in heroes.iter_mut() {
            if let Some(snapshot) = self.heroes.iter().find(|s| s.hero_id == record.id) {
                record.reconcile(snapshot);
                record.unlock(now);
                reconciled.push(record.clone());
            }
        }

        self.used_portals |= 1 << portal;
        self.last_exit_portal = Some(portal);
        self.last_exit_position = Some(self.party_position);
        self.last_exit_at = now;
        self.last_crew = Some(CrewMark {
            hash: crew_hash(self.hero_ids()),
            at: now,
        });
        let carried = self.items.slots().to_vec();
        self.items = Inventory::new();
        self.heroes.clear();
        self.pending_loot.clear();
        self.pending_encounter_seed = None;
        self.is_active = false;
        self.heroes_inside = false;
        self.authority.clear_delegate();
        self.touch();

        Ok(ExitOutcome {
            portal,
            reconciled,
            carried,
        })
    }

    // =========================================================================
    // Movement
    // =========================================================================

    pub fn apply_move(
        &mut self,
        caller: AuthorityKey,
        direction: Direction,
    ) -> Result<MoveOutcome, DomainError> {
        self.authority.authorize(caller)?;
        self.ensure_inside()?;
        if self.in_combat {
            return Err(DomainError::MovementBlockedInCombat);
        }
        let target = self
            .party_position
            .step(direction, self.map.width(), self.map.height())
            .ok_or(DomainError::MovementOutOfBounds)?;
        if !self.map.is_traversable(target) {
            return Err(DomainError::MovementIntoWall);
        }

        self.party_position = target;
        self.move_count = self.move_count.saturating_add(1);
        self.torch = self.torch.burn();

        let interaction = self.interaction_at(target);
        let mut encounter = false;
        if let TileInteraction::Portal(idx) = interaction {
            if !self.is_portal_used(idx) && self.pending_encounter_seed.is_none() {
                if let Some(seed) = roll_encounter(self.seed, target, self.move_count, self.torch)
                {
                    self.pending_encounter_seed = Some(seed);
                    encounter = true;
                }
            }
        }
        self.touch();

        Ok(MoveOutcome {
            position: target,
            interaction,
            encounter,
            torch: self.torch.value(),
        })
    }

    fn interaction_at(&self, point: DungeonPoint) -> TileInteraction {
        if let Some(idx) = self.map.chest_at(point) {
            if !self.is_chest_opened(idx as u8) {
                return TileInteraction::Chest(idx as u8);
            }
        }
        if let Some(idx) = self.map.portal_at(point) {
            return TileInteraction::Portal(idx as u8);
        }
        if self.map.is_door(point) {
            return TileInteraction::Door;
        }
        TileInteraction::None
    }

    // =========================================================================
    // Loot
    // =========================================================================

    /// Open the chest the party stands on and offer its contents.
    pub fn open_chest(
        &mut self,
        caller: AuthorityKey,
        index: u8,
    ) -> Result<&PendingLoot, DomainError> {
        self.authority.authorize(caller)?;
        self.ensure_exploring()?;
        let at = self
            .map
            .chests()
            .get(usize::from(index))
            .copied()
            .ok_or(DomainError::NoChestAtPosition)?;
        if at != self.party_position {
            return Err(DomainError::NoChestAtPosition);
        }
        if self.is_chest_opened(index) {
            return Err(DomainError::ChestAlreadyOpened);
        }

        let leader_luck = self.heroes.first().map_or(0, |h| h.luck);
        let seed = chest_seed(self.seed, index, at.x, at.y);
        self.pending_loot = chest_offer(seed, index, effective_luck(leader_luck, self.torch));
        self.opened_chests |= 1 << index;
        self.touch();
        Ok(&self.pending_loot)
    }

    /// Take the chosen pending slots after making room with `drops`. Whatever
    /// is not taken is discarded.
    pub fn take_loot(
        &mut self,
        caller: AuthorityKey,
        take: &[u8],
        drops: &[ItemSlot],
    ) -> Result<Vec<ItemSlot>, DomainError> {
        self.authority.authorize(caller)?;
        self.ensure_inside()?;
        let taken = self.pending_loot.select(take)?;
        self.items.apply_transaction(drops, &taken)?;
        self.pending_loot.clear();
        self.touch();
        Ok(taken)
    }

    // =========================================================================
    // Inventory
    // =========================================================================

    pub fn pickup_item(
        &mut self,
        caller: AuthorityKey,
        key: ItemKey,
        quantity: u16,
    ) -> Result<PickupOutcome, DomainError> {
        self.authority.authorize(caller)?;
        self.ensure_inside()?;
        let outcome = self.items.pickup(key, quantity)?;
        self.touch();
        Ok(outcome)
    }

    pub fn drop_item(
        &mut self,
        caller: AuthorityKey,
        key: ItemKey,
        quantity: u16,
    ) -> Result<QuantityChangeResult, DomainError> {
        self.authority.authorize(caller)?;
        self.ensure_inside()?;
        let change = self.items.drop_item(key, quantity)?;
        self.touch();
        Ok(change)
    }

    pub fn swap_item(
        &mut self,
        caller: AuthorityKey,
        drop_key: ItemKey,
        drop_quantity: u16,
        pickup_key: ItemKey,
        pickup_quantity: u16,
    ) -> Result<(), DomainError> {
        self.authority.authorize(caller)?;
        self.ensure_inside()?;
        self.items
            .swap(drop_key, drop_quantity, pickup_key, pickup_quantity)?;
        self.touch();
        Ok(())
    }

    /// Use one item outside combat. Torch items ignore `hero_index`.
    pub fn use_item(
        &mut self,
        caller: AuthorityKey,
        key: ItemKey,
        hero_index: u8,
    ) -> Result<(), DomainError> {
        self.authority.authorize(caller)?;
        self.ensure_exploring()?;
        let effect = key
            .effect()
            .filter(|_| key.usable_in(UseContext::Exploration))
            .ok_or(DomainError::ItemNotUsable)?;
        let mut items = self.items.clone();
        items.drop_item(key, 1)?;

        match effect {
            ItemEffect::RefuelTorch(amount) => self.torch = self.torch.refuel(amount),
            effect => {
                let idx = usize::from(hero_index);
                let mut hero = *self
                    .heroes
                    .get(idx)
                    .ok_or(DomainError::HeroIndexOutOfRange { index: hero_index })?;
                hero.apply_item(effect)?;
                self.heroes[idx] = hero;
            }
        }
        self.items = items;
        self.touch();
        Ok(())
    }

    // =========================================================================
    // Delegation
    // =========================================================================

    pub fn delegate_to(
        &mut self,
        caller: AuthorityKey,
        delegate: AuthorityKey,
    ) -> Result<(), DomainError> {
        if caller != self.key.player {
            return Err(DomainError::Unauthorized);
        }
        self.authority.delegate_to(caller, delegate)?;
        self.touch();
        Ok(())
    }

    /// Hand control back to the player. Returns the delegate that released.
    pub fn release(&mut self, caller: AuthorityKey) -> Result<AuthorityKey, DomainError> {
        let delegate = self.authority.release(caller)?;
        self.touch();
        Ok(delegate)
    }

    // =========================================================================
    // Combat
    // =========================================================================

    /// Accept the pending encounter. The returned combat is stored alongside
    /// the session and passed back to `submit_combat_action`.
    pub fn begin_encounter(
        &mut self,
        caller: AuthorityKey,
        now: i64,
    ) -> Result<(AdventureCombat, ActionReport), DomainError> {
        self.authority.authorize(caller)?;
        self.ensure_inside()?;
        if self.in_combat {
            return Err(DomainError::CombatAlreadyActive);
        }
        let seed = self
            .pending_encounter_seed
            .ok_or(DomainError::NoPendingEncounter)?;
        let (combat, report) =
            AdventureCombat::begin(self.key, &self.heroes, self.torch, seed, self.seed, now)?;
        self.in_combat = true;
        self.touch();
        Ok((combat, report))
    }

    pub fn decline_encounter(&mut self, caller: AuthorityKey) -> Result<(), DomainError> {
        self.authority.authorize(caller)?;
        self.ensure_exploring()?;
        self.pending_encounter_seed
            .take()
            .ok_or(DomainError::NoPendingEncounter)?;
        self.touch();
        Ok(())
    }

    /// Play one hero action. Items used in combat come out of the session
    /// inventory, and only when the action succeeds.
    pub fn submit_combat_action(
        &mut self,
        caller: AuthorityKey,
        combat: &mut AdventureCombat,
        action: CombatAction,
        now: i64,
    ) -> Result<ActionReport, DomainError> {
        self.authority.authorize(caller)?;
        self.ensure_linked(combat)?;
        let report = combat.submit(action, &mut self.items, now)?;
        self.touch();
        Ok(report)
    }

    /// Close a resolved fight and apply its consequences to the party.
    pub fn conclude_combat(
        &mut self,
        caller: AuthorityKey,
        combat: &mut AdventureCombat,
        now: i64,
    ) -> Result<ConcludeOutcome, DomainError> {
        self.authority.authorize(caller)?;
        self.ensure_linked(combat)?;
        let resolution = combat.conclude(now)?;
        let victory = resolution == CombatResolution::Victory;

        let experience = if victory {
            experience_reward(combat.defeated_kinds(), combat.torch())
        } else {
            0
        };
        let mut traits_gained = 0u8;
        for fighter in combat.heroes() {
            let Some(snapshot) = self.heroes.get_mut(usize::from(fighter.hero_index)) else {
                continue;
            };
            fighter.write_back(snapshot);
            if victory && fighter.core.alive {
                snapshot.experience = snapshot.experience.saturating_add(u64::from(experience));
            }
            if fighter.pending_positive_traits > 0 && snapshot.add_trait(COMBAT_TRAIT, true) {
                traits_gained += 1;
            }
            if fighter.pending_negative_traits > 0 && snapshot.add_trait(COMBAT_TRAIT, false) {
                traits_gained += 1;
            }
        }
        if resolution == CombatResolution::Defeat {
            for snapshot in self.heroes.iter_mut() {
                snapshot.incapacitate();
            }
        }
        let loot_slots = if victory {
            self.pending_loot = combat_spoils(combat.loot_seed(), combat.torch());
            self.pending_loot.slots().len()
        } else {
            0
        };

        self.in_combat = false;
        self.pending_encounter_seed = None;
        self.touch();
        Ok(ConcludeOutcome {
            resolution,
            experience_awarded: experience,
            loot_slots,
            traits_gained,
        })
    }

    // =========================================================================
    // Guards
    // =========================================================================

    fn ensure_inside(&self) -> Result<(), DomainError> {
        if self.is_active && self.heroes_inside {
            Ok(())
        } else {
            Err(DomainError::AdventureNotActive)
        }
    }

    fn ensure_exploring(&self) -> Result<(), DomainError> {
        self.ensure_inside()?;
        if self.in_combat {
            return Err(DomainError::CombatAlreadyActive);
        }
        Ok(())
    }

    fn ensure_linked(&self, combat: &AdventureCombat) -> Result<(), DomainError> {
        self.ensure_inside()?;
        if !self.in_combat || combat.session() != self.key {
            return Err(DomainError::CombatNotActive);
        }
        Ok(())
    }

    fn resume_position(&self, crew: u64, now: i64) -> Option<DungeonPoint> {
        let mark = self.last_crew?;
        self.last_exit_portal?;
        let position = self.last_exit_position?;
        let fresh = now.saturating_sub(mark.at) <= RESUME_WINDOW_SECONDS;
        (mark.hash == crew && fresh && self.map.is_traversable(position)).then_some(position)
    }

    fn touch(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}

/// Order-independent FNV-1a hash of a hero set.
fn crew_hash(ids: impl Iterator<Item = HeroId>) -> u64 {
    let mut ids = ids.collect::<Vec<_>>();
    ids.sort();
    ids.iter()
        .flat_map(|id| id.as_bytes().iter())
        .fold(FNV_OFFSET, |hash, byte| {
            (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
        })
}
