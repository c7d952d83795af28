//! Deterministic random streams.
//!
//! Nothing here reads a clock or global state. Every draw is a pure function of
//! the stored state, so encounters and loot replay exactly from
//! (initial state, action sequence).

use serde::{Deserialize, Serialize};

const LCG_MULTIPLIER: u64 = 0x5DEE_CE66D;
const LCG_INCREMENT: u64 = 0xB;

/// Advance an encounter stream by one draw: `(state) -> (value, next_state)`.
pub const fn next_draw(state: u64) -> (u32, u64) {
    let next = state
        .wrapping_mul(LCG_MULTIPLIER)
        .wrapping_add(LCG_INCREMENT);
    ((next >> 16) as u32, next)
}

/// Encounter stream threaded through combat resolution.
///
/// Wraps [`next_draw`] so callers can take several draws in a row and then
/// store the final state back on the combat record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatRng {
    state: u64,
}

impl CombatRng {
    pub const fn new(state: u64) -> Self {
        Self { state }
    }

    #[inline]
    pub const fn state(&self) -> u64 {
        self.state
    }

    pub fn next_u32(&mut self) -> u32 {
        let (value, next) = next_draw(self.state);
        self.state = next;
        value
    }

    /// Draw in basis points, `0..10_000`.
    pub fn next_bps(&mut self) -> u16 {
        (self.next_u32() % 10_000) as u16
    }

    /// Inclusive range draw. `max < min` collapses to `min`.
    pub fn range(&mut self, min: u16, max: u16) -> u16 {
        if max <= min {
            return min;
        }
        let span = u32::from(max - min) + 1;
        min + (self.next_u32() % span) as u16
    }

    /// True with probability `bps / 10_000`.
    pub fn chance(&mut self, bps: u16) -> bool {
        self.next_bps() < bps
    }
}

/// Mulberry32 generator used for map generation, enemy rosters and loot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub const fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Uniform float in `[0, 1)`.
    pub fn next_f32(&mut self) -> f32 {
        (f64::from(self.next_u32()) / 4_294_967_296.0) as f32
    }

    /// Inclusive range draw over `u16`.
    pub fn next_range(&mut self, min: u16, max: u16) -> u16 {
        if max <= min {
            return min;
        }
        let span = u32::from(max - min) + 1;
        min + (self.next_u32() % span) as u16
    }
}

/// Fold a 64-bit seed into 32 bits for [`Mulberry32`].
pub const fn fold_seed(seed: u64) -> u32 {
    (seed ^ (seed >> 32)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_draw_is_pure() {
        assert_eq!(next_draw(42), next_draw(42));
        let (_, s1) = next_draw(42);
        let (_, s2) = next_draw(s1);
        assert_ne!(s1, s2);
    }

    #[test]
    fn combat_rng_threads_state() {
        let mut a = CombatRng::new(7);
        let first = a.next_u32();
        let (expected, next) = next_draw(7);
        assert_eq!(first, expected);
        assert_eq!(a.state(), next);
    }

    #[test]
    fn range_stays_inclusive() {
        let mut rng = CombatRng::new(99);
        for _ in 0..500 {
            let v = rng.range(8, 18);
            assert!((8..=18).contains(&v));
        }
        assert_eq!(rng.range(5, 5), 5);
    }

    #[test]
    fn mulberry_is_deterministic_per_seed() {
        let mut a = Mulberry32::new(1234);
        let mut b = Mulberry32::new(1234);
        let xs: Vec<u32> = (0..8).map(|_| a.next_u32()).collect();
        let ys: Vec<u32> = (0..8).map(|_| b.next_u32()).collect();
        assert_eq!(xs, ys);
        let f = Mulberry32::new(5).next_f32();
        assert!((0.0..1.0).contains(&f));
    }
}
