//! Enemy catalogue, roster selection and experience rewards.

use crate::entities::combatant::{EnemyCombatant, MAX_ENEMIES};
use crate::value_objects::{fold_seed, Mulberry32, Torch};

/// Listed stats of an enemy kind, before torch scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyDefinition {
    pub kind: u8,
    pub name: &'static str,
    pub max_hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub magic: u16,
    pub resistance: u16,
    pub speed: u16,
    pub luck: u16,
    pub experience: u32,
}

const fn def(
    kind: u8,
    name: &'static str,
    stats: [u16; 7],
    experience: u32,
) -> EnemyDefinition {
    EnemyDefinition {
        kind,
        name,
        max_hp: stats[0],
        attack: stats[1],
        defense: stats[2],
        magic: stats[3],
        resistance: stats[4],
        speed: stats[5],
        luck: stats[6],
        experience,
    }
}

// hp, atk, def, mag, res, spd, luck
const ENEMY_DEFINITIONS: [EnemyDefinition; 11] = [
    def(0, "Armored Orc", [86, 18, 15, 8, 12, 9, 7], 50),
    def(1, "Armored Skeleton", [70, 16, 14, 6, 11, 8, 6], 45),
    def(2, "Elite Orc", [78, 19, 13, 7, 10, 10, 7], 60),
    def(3, "Greatsword Skeleton", [74, 17, 13, 9, 12, 11, 8], 55),
    def(4, "Orc", [60, 14, 11, 6, 9, 10, 9], 35),
    def(5, "Orc Rider", [80, 18, 14, 6, 11, 10, 8], 50),
    def(6, "Skeleton Swordsman", [62, 15, 10, 6, 8, 11, 9], 30),
    def(7, "Skeleton Archer", [58, 14, 9, 7, 9, 12, 10], 28),
    def(8, "Slime", [52, 12, 8, 5, 7, 7, 6], 25),
    def(9, "Werebear", [88, 20, 14, 8, 12, 9, 6], 70),
    def(10, "Werewolf", [64, 17, 11, 7, 9, 13, 9], 65),
];

pub const ENEMY_KINDS: u8 = ENEMY_DEFINITIONS.len() as u8;

/// Definition for `kind`, wrapping out-of-range kinds.
pub fn enemy_definition(kind: u8) -> &'static EnemyDefinition {
    &ENEMY_DEFINITIONS[usize::from(kind % ENEMY_KINDS)]
}

/// Roster rolled for an encounter plus the combat rng state that follows it.
#[derive(Debug, Clone)]
pub struct EnemyParty {
    pub enemies: Vec<EnemyCombatant>,
    pub next_rng_state: u64,
}

/// Roll an encounter roster from its seed. Darker torches add enemies.
pub fn select_enemy_party(seed: u64, torch: Torch) -> EnemyParty {
    let mut rng = Mulberry32::new(fold_seed(seed));
    let extra = match torch.value() {
        0..=33 => 2,
        34..=66 => 1,
        _ => 0,
    };
    let base = 2 + (rng.next_u32() % 2) as usize;
    let count = (base + extra).clamp(1, MAX_ENEMIES);

    let enemies = (0..count)
        .map(|_| {
            let kind = (rng.next_u32() % u32::from(ENEMY_KINDS)) as u8;
            EnemyCombatant::spawn(kind, torch)
        })
        .collect();
    let next_rng_state = (u64::from(rng.next_u32()) << 32) ^ seed.rotate_left(7);
    EnemyParty {
        enemies,
        next_rng_state,
    }
}

/// Experience from the defeated kinds, with a fifth more in darkness.
pub fn experience_reward(defeated: impl IntoIterator<Item = u8>, torch: Torch) -> u32 {
    let total: u32 = defeated
        .into_iter()
        .map(|kind| enemy_definition(kind).experience)
        .fold(0, u32::saturating_add);
    if torch.value() <= 33 {
        total.saturating_add(total / 5)
    } else {
        total
    }
}
