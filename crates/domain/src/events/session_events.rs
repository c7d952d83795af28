//! Results of session-level mutations (start, movement, exit).

use serde::{Deserialize, Serialize};

use crate::entities::HeroRecord;
use crate::value_objects::{DungeonPoint, ItemSlot};

/// What the party found on the tile it stepped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "index", rename_all = "snake_case")]
pub enum TileInteraction {
    None,
    Door,
    /// Unopened chest; call `open_chest` with this index.
    Chest(u8),
    Portal(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveOutcome {
    pub position: DungeonPoint,
    pub interaction: TileInteraction,
    /// Set when the portal roll triggered an encounter.
    pub encounter: bool,
    pub torch: u8,
}

/// Where a run began and whether it resumed from the last exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartOutcome {
    pub position: DungeonPoint,
    pub resumed: bool,
    /// Opened chests and used portals were cleared by the daily reset.
    pub daily_reset: bool,
}

/// Heroes written back to their home records, and what the party carried out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitOutcome {
    pub portal: u8,
    pub reconciled: Vec<HeroRecord>,
    pub carried: Vec<ItemSlot>,
}
