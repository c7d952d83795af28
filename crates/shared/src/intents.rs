//! Intents: the operation surface of the engine.

use serde::{Deserialize, Serialize};

use deepdelve_domain::{Direction, HeroAction, TargetSelector};

/// Address of a session on the wire. Both keys are 32-byte hex strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRef {
    pub player: String,
    pub dungeon: String,
}

/// An item stack on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSlotData {
    pub item_key: u8,
    pub quantity: u16,
}

/// One request from a caller. `caller` is the signing authority (hex).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum Intent {
    StartSession {
        caller: String,
        session: SessionRef,
        heroes: Vec<String>,
        #[serde(default)]
        items: Vec<ItemSlotData>,
    },
    ExitSession {
        caller: String,
        session: SessionRef,
    },
    ResetSession {
        caller: String,
        session: SessionRef,
    },
    MoveHero {
        caller: String,
        session: SessionRef,
        direction: Direction,
    },
    OpenChest {
        caller: String,
        session: SessionRef,
        chest: u8,
    },
    TakeLoot {
        caller: String,
        session: SessionRef,
        #[serde(default)]
        take: Vec<u8>,
        #[serde(default)]
        drop: Vec<ItemSlotData>,
    },
    PickupItem {
        caller: String,
        session: SessionRef,
        item_key: u8,
        quantity: u16,
    },
    DropItem {
        caller: String,
        session: SessionRef,
        item_key: u8,
        quantity: u16,
    },
    SwapItem {
        caller: String,
        session: SessionRef,
        drop_key: u8,
        drop_quantity: u16,
        pickup_key: u8,
        pickup_quantity: u16,
    },
    UseItem {
        caller: String,
        session: SessionRef,
        item_key: u8,
        hero_index: u8,
    },
    BeginEncounter {
        caller: String,
        session: SessionRef,
    },
    DeclineEncounter {
        caller: String,
        session: SessionRef,
    },
    SubmitCombatAction {
        caller: String,
        session: SessionRef,
        hero_index: u8,
        action: HeroAction,
        #[serde(default)]
        target: TargetSelector,
        #[serde(default)]
        item_key: Option<u8>,
    },
    ConcludeCombat {
        caller: String,
        session: SessionRef,
    },
    SetDelegate {
        caller: String,
        session: SessionRef,
        delegate: String,
    },
    Undelegate {
        caller: String,
        session: SessionRef,
    },
}

impl Intent {
    /// Stable name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::StartSession { .. } => "start_session",
            Self::ExitSession { .. } => "exit_session",
            Self::ResetSession { .. } => "reset_session",
            Self::MoveHero { .. } => "move_hero",
            Self::OpenChest { .. } => "open_chest",
            Self::TakeLoot { .. } => "take_loot",
            Self::PickupItem { .. } => "pickup_item",
            Self::DropItem { .. } => "drop_item",
            Self::SwapItem { .. } => "swap_item",
            Self::UseItem { .. } => "use_item",
            Self::BeginEncounter { .. } => "begin_encounter",
            Self::DeclineEncounter { .. } => "decline_encounter",
            Self::SubmitCombatAction { .. } => "submit_combat_action",
            Self::ConcludeCombat { .. } => "conclude_combat",
            Self::SetDelegate { .. } => "set_delegate",
            Self::Undelegate { .. } => "undelegate",
        }
    }

    pub fn session(&self) -> &SessionRef {
        match self {
            Self::StartSession { session, .. }
            | Self::ExitSession { session, .. }
            | Self::ResetSession { session, .. }
            | Self::MoveHero { session, .. }
            | Self::OpenChest { session, .. }
            | Self::TakeLoot { session, .. }
            | Self::PickupItem { session, .. }
            | Self::DropItem { session, .. }
            | Self::SwapItem { session, .. }
            | Self::UseItem { session, .. }
            | Self::BeginEncounter { session, .. }
            | Self::DeclineEncounter { session, .. }
            | Self::SubmitCombatAction { session, .. }
            | Self::ConcludeCombat { session, .. }
            | Self::SetDelegate { session, .. }
            | Self::Undelegate { session, .. } => session,
        }
    }

    pub fn caller(&self) -> &str {
        match self {
            Self::StartSession { caller, .. }
            | Self::ExitSession { caller, .. }
            | Self::ResetSession { caller, .. }
            | Self::MoveHero { caller, .. }
            | Self::OpenChest { caller, .. }
            | Self::TakeLoot { caller, .. }
            | Self::PickupItem { caller, .. }
            | Self::DropItem { caller, .. }
            | Self::SwapItem { caller, .. }
            | Self::UseItem { caller, .. }
            | Self::BeginEncounter { caller, .. }
            | Self::DeclineEncounter { caller, .. }
            | Self::SubmitCombatAction { caller, .. }
            | Self::ConcludeCombat { caller, .. }
            | Self::SetDelegate { caller, .. }
            | Self::Undelegate { caller, .. } => caller,
        }
    }
}
