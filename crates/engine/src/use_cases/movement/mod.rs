//! Movement use cases.

mod move_party;

pub use move_party::MoveParty;

use std::sync::Arc;

use deepdelve_domain::DomainError;

use crate::entities::GateError;
use crate::infrastructure::ports::RepoError;

/// Container for movement use cases.
pub struct MovementUseCases {
    pub move_party: Arc<MoveParty>,
}

impl MovementUseCases {
    pub fn new(move_party: Arc<MoveParty>) -> Self {
        Self { move_party }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MovementError {
    #[error(transparent)]
    Gate(#[from] GateError),
    #[error("Validation error: {0}")]
    Domain(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl MovementError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Gate(e) => e.code(),
            Self::Domain(e) => e.code(),
            Self::Repo(e) => e.code(),
        }
    }
}
