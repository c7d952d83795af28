//! Combat use cases: accept or decline an encounter, act, and conclude.

mod encounter;
mod turns;

pub use encounter::{BeginEncounter, DeclineEncounter};
pub use turns::{ConcludeCombat, SubmitCombatAction};

use std::sync::Arc;

use deepdelve_domain::DomainError;

use crate::entities::GateError;
use crate::infrastructure::ports::RepoError;

/// Container for combat use cases.
pub struct CombatUseCases {
    pub begin: Arc<BeginEncounter>,
    pub decline: Arc<DeclineEncounter>,
    pub submit: Arc<SubmitCombatAction>,
    pub conclude: Arc<ConcludeCombat>,
}

impl CombatUseCases {
    pub fn new(
        begin: Arc<BeginEncounter>,
        decline: Arc<DeclineEncounter>,
        submit: Arc<SubmitCombatAction>,
        conclude: Arc<ConcludeCombat>,
    ) -> Self {
        Self {
            begin,
            decline,
            submit,
            conclude,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CombatError {
    #[error(transparent)]
    Gate(#[from] GateError),
    #[error("Validation error: {0}")]
    Domain(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl CombatError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Gate(e) => e.code(),
            Self::Domain(e) => e.code(),
            Self::Repo(e) => e.code(),
        }
    }
}
