//! Chest offers and combat spoils.

use crate::entities::inventory::{LootSource, PendingLoot};
use crate::value_objects::{CombatRng, ItemKey, Mulberry32, Torch};

/// Items a single chest may hold.
pub const MAX_CHEST_ITEMS: u8 = 5;

struct ChestEntry {
    item: ItemKey,
    min_qty: u16,
    max_qty: u16,
}

const fn entry(item: ItemKey, min_qty: u16, max_qty: u16) -> ChestEntry {
    ChestEntry {
        item,
        min_qty,
        max_qty,
    }
}

const CHEST_ENTRIES: [ChestEntry; 7] = [
    entry(ItemKey::PouchGold, 1, 3),
    entry(ItemKey::StressTonic, 1, 2),
    entry(ItemKey::MinorTorch, 1, 2),
    entry(ItemKey::HealingSalve, 1, 1),
    entry(ItemKey::MysteryRelic, 1, 1),
    entry(ItemKey::CalmingIncense, 1, 2),
    entry(ItemKey::PhoenixFeather, 1, 1),
];

/// (item, chance in bps, quantity) rolled once each after a victory.
const COMBAT_LOOT: [(ItemKey, u16, u16); 7] = [
    (ItemKey::PouchGold, 2_500, 50),
    (ItemKey::StressTonic, 800, 1),
    (ItemKey::MinorTorch, 1_500, 1),
    (ItemKey::HealingSalve, 1_200, 1),
    (ItemKey::MysteryRelic, 300, 1),
    (ItemKey::CalmingIncense, 600, 1),
    (ItemKey::PhoenixFeather, 100, 1),
];

/// Seed for a chest's contents. Depends only on the session seed and the
/// chest, so recomputing it yields the same offer.
pub fn chest_seed(session_seed: u32, chest_index: u8, x: u16, y: u16) -> u32 {
    let seed = session_seed
        ^ (u32::from(chest_index) << 16)
        ^ (u32::from(x) << 8)
        ^ u32::from(y);
    if seed == 0 {
        session_seed.wrapping_add(1)
    } else {
        seed
    }
}

/// Luck used for chest rolls: party leader plus darkness, capped at 100.
pub fn effective_luck(leader_luck: u16, torch: Torch) -> u8 {
    leader_luck
        .saturating_add(u16::from(torch.stat_buff()))
        .min(100) as u8
}

fn weighted_choice(rng: &mut Mulberry32, weights: &[u32]) -> usize {
    let total: u64 = weights.iter().map(|w| u64::from(*w)).sum::<u64>().max(1);
    let mut roll = u64::from(rng.next_u32()) % total;
    for (idx, weight) in weights.iter().map(|w| u64::from(*w)).enumerate() {
        if weight == 0 {
            continue;
        }
        if roll < weight {
            return idx;
        }
        roll -= weight;
    }
    weights.len().saturating_sub(1)
}

fn sample_item_count(rng: &mut Mulberry32, luck: u8) -> u8 {
    let mut weights = [100u32, 55, 28, 12, 5];
    let bonus = u32::from(luck) / 5;
    for (idx, weight) in weights.iter_mut().enumerate().skip(1) {
        *weight += bonus * idx as u32;
    }
    weights[0] = weights[0].saturating_sub(bonus * 2).max(20);
    (weighted_choice(rng, &weights) + 1) as u8
}

fn sample_item(rng: &mut Mulberry32, luck: u8) -> usize {
    let luck = u32::from(luck);
    let rare = (luck / 6).max(1);
    let weights = [
        48u32.saturating_sub(luck / 3).max(4),
        26 + luck / 8,
        24 + luck / 8,
        18 + luck / 10,
        10 + rare,
        6 + (rare / 2).max(1),
        2 + (luck / 20).max(1),
    ];
    weighted_choice(rng, &weights)
}

/// Roll the contents of chest `chest_index`.
pub fn chest_offer(seed: u32, chest_index: u8, luck: u8) -> PendingLoot {
    let mut rng = Mulberry32::new(seed);
    let mut loot = PendingLoot::new(LootSource::Chest(chest_index));
    let count = sample_item_count(&mut rng, luck).min(MAX_CHEST_ITEMS);
    for _ in 0..count {
        let entry = &CHEST_ENTRIES[sample_item(&mut rng, luck)];
        let quantity = rng.next_range(entry.min_qty, entry.max_qty);
        loot.push(entry.item, quantity);
    }
    loot
}

/// Roll victory spoils. A nearly spent torch earns one extra draw.
pub fn combat_spoils(loot_seed: u64, torch: Torch) -> PendingLoot {
    let mut rng = CombatRng::new(loot_seed);
    let mut loot = PendingLoot::new(LootSource::Combat);
    for (item, chance, quantity) in COMBAT_LOOT {
        if rng.chance(chance) {
            loot.push(item, quantity);
        }
    }
    if torch.value() <= 20 {
        let pick = rng.next_u32() as usize % COMBAT_LOOT.len();
        let (item, _, quantity) = COMBAT_LOOT[pick];
        loot.push(item, quantity);
    }
    loot
}
