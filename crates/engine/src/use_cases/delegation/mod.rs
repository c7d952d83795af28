//! Delegation use cases.
//!
//! While delegated, the canonical session is frozen and the delegate mutates
//! its own copy. Handing control back replays that copy into the canonical
//! store and publishes a commit notice.

mod set_delegate;
mod undelegate;

pub use set_delegate::SetDelegate;
pub use undelegate::Undelegate;

use std::sync::Arc;

use deepdelve_domain::DomainError;

use crate::entities::GateError;
use crate::infrastructure::ports::RepoError;

/// Container for delegation use cases.
pub struct DelegationUseCases {
    pub set_delegate: Arc<SetDelegate>,
    pub undelegate: Arc<Undelegate>,
}

impl DelegationUseCases {
    pub fn new(set_delegate: Arc<SetDelegate>, undelegate: Arc<Undelegate>) -> Self {
        Self {
            set_delegate,
            undelegate,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DelegationError {
    #[error(transparent)]
    Gate(#[from] GateError),
    #[error("Validation error: {0}")]
    Domain(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl DelegationError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Gate(e) => e.code(),
            Self::Domain(e) => e.code(),
            Self::Repo(e) => e.code(),
        }
    }
}
