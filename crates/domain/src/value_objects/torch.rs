//! Torch light, the run's depleting resource.

use serde::{Deserialize, Serialize};

/// Brightness band used by every torch-scaled rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TorchBand {
    /// 0..=33
    Dark,
    /// 34..=66
    Dim,
    /// 67..=100
    Bright,
}

/// Torch level in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Torch(u8);

impl Torch {
    pub const MAX: u8 = 100;

    pub fn new(value: u8) -> Self {
        Self(value.min(Self::MAX))
    }

    pub const fn full() -> Self {
        Self(Self::MAX)
    }

    #[inline]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// One step of burn, saturating at zero.
    pub fn burn(self) -> Self {
        Self(self.0.saturating_sub(1))
    }

    pub fn refuel(self, amount: u8) -> Self {
        Self::new(self.0.saturating_add(amount))
    }

    pub const fn band(self) -> TorchBand {
        match self.0 {
            0..=33 => TorchBand::Dark,
            34..=66 => TorchBand::Dim,
            _ => TorchBand::Bright,
        }
    }

    /// Luck bonus granted by darkness when rolling chest loot.
    pub const fn stat_buff(self) -> u8 {
        match self.band() {
            TorchBand::Dark => 5,
            TorchBand::Dim => 2,
            TorchBand::Bright => 0,
        }
    }

    /// Portal encounter chance in basis points; darker is more dangerous.
    pub fn encounter_chance_bps(self) -> u16 {
        let darkness = u16::from(Self::MAX - self.0);
        (600 + darkness * 50).min(9_500)
    }
}

impl Default for Torch {
    fn default() -> Self {
        Self::full()
    }
}
