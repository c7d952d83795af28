//! Notices published after delegated state is written back.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Why a batch was reconciled into the canonical store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitReason {
    /// The delegate handed control back.
    Undelegate,
    /// The party left while the session was delegated.
    Exit,
}

/// One reconciled batch. Clients use this to drop their local prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitNotice {
    pub batch_id: Uuid,
    pub player: String,
    pub dungeon: String,
    pub reason: CommitReason,
    /// Session version now stored canonically.
    pub version: u64,
    /// Hero records written in the same batch.
    pub heroes: usize,
    pub committed_at: i64,
}
