//! Portal encounter rolls.

use crate::value_objects::{fold_seed, DungeonPoint, Mulberry32, Torch};

/// Roll for an encounter after the party stepped onto an unused portal.
///
/// Pure in `(session_seed, position, move_count, torch)`; the torch is the
/// value after this step's burn. Returns a non-zero encounter seed on a hit.
pub fn roll_encounter(
    session_seed: u32,
    position: DungeonPoint,
    move_count: u32,
    torch: Torch,
) -> Option<u64> {
    let mix = u64::from(session_seed)
        ^ (u64::from(move_count) << 16)
        ^ (u64::from(position.x) << 40)
        ^ (u64::from(position.y) << 24)
        ^ (u64::from(torch.value()) << 56);
    let mix = if mix == 0 { 1 } else { mix };

    let mut rng = Mulberry32::new(fold_seed(mix));
    let roll = rng.next_u32() % 10_000;
    if roll >= u32::from(torch.encounter_chance_bps()) {
        return None;
    }
    let seed = mix ^ (u64::from(rng.next_u32()) << 8);
    Some(if seed == 0 { mix | 1 } else { seed })
}
