//! Turn order for an encounter.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{BoundedVec, CombatRng};

/// Initiative slots per encounter: a full party plus a full enemy roster.
pub const MAX_COMBATANTS: usize = 8;

/// Who holds an initiative slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "side", content = "index", rename_all = "snake_case")]
pub enum Occupant {
    Hero(u8),
    Enemy(u8),
}

impl Occupant {
    const fn side_rank(self) -> u8 {
        match self {
            Self::Hero(_) => 0,
            Self::Enemy(_) => 1,
        }
    }

    const fn index(self) -> u8 {
        match self {
            Self::Hero(i) | Self::Enemy(i) => i,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiativeSlot {
    pub occupant: Occupant,
    pub value: u16,
    pub tiebreak: u16,
    pub order: u8,
    /// Cleared when the occupant dies.
    pub active: bool,
}

/// One participant fed into [`InitiativeTable::build`].
#[derive(Debug, Clone, Copy)]
pub struct InitiativeEntry {
    pub occupant: Occupant,
    pub speed: u16,
    pub alive: bool,
}

/// Ordering: speed descending, then tiebreak draw descending, heroes before
/// enemies, then lower index. Occupants are unique so the order is total.
fn turn_order(a: &InitiativeSlot, b: &InitiativeSlot) -> Ordering {
    b.value
        .cmp(&a.value)
        .then(b.tiebreak.cmp(&a.tiebreak))
        .then(a.occupant.side_rank().cmp(&b.occupant.side_rank()))
        .then(a.occupant.index().cmp(&b.occupant.index()))
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InitiativeTable {
    slots: BoundedVec<InitiativeSlot, MAX_COMBATANTS>,
}

impl InitiativeTable {
    /// Build the table, drawing one tiebreak per entry in input order.
    pub fn build(
        entries: impl IntoIterator<Item = InitiativeEntry>,
        rng: &mut CombatRng,
    ) -> Result<Self, DomainError> {
        let mut slots = BoundedVec::new();
        for entry in entries {
            slots.try_push(
                InitiativeSlot {
                    occupant: entry.occupant,
                    value: entry.speed,
                    tiebreak: (rng.next_u32() & 0xFFFF) as u16,
                    order: 0,
                    active: entry.alive,
                },
                "initiative",
            )?;
        }
        slots.sort_by(turn_order);
        for (order, slot) in slots.iter_mut().enumerate() {
            slot.order = order as u8;
        }
        Ok(Self { slots })
    }

    pub fn slots(&self) -> &[InitiativeSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, cursor: u8) -> Option<&InitiativeSlot> {
        self.slots.get(usize::from(cursor))
    }

    pub fn set_active(&mut self, occupant: Occupant, active: bool) {
        if let Some(slot) = self.slots.iter_mut().find(|s| s.occupant == occupant) {
            slot.active = active;
        }
    }

    /// Next active slot after `cursor`, and whether the scan wrapped into a
    /// new round. `None` when nobody is active.
    pub fn next_active(&self, cursor: u8) -> Option<(u8, bool)> {
        let len = self.slots.len();
        if len == 0 {
            return None;
        }
        let start = usize::from(cursor);
        (1..=len).find_map(|step| {
            let idx = (start + step) % len;
            self.slots[idx]
                .active
                .then_some((idx as u8, start + step >= len))
        })
    }
}
