//! Session lifecycle use cases: start, exit and reset.

mod exit;
mod reset;
mod start;

pub use exit::{ExitSession, ExitSummary};
pub use reset::ResetSession;
pub use start::StartSession;

use std::sync::Arc;

use deepdelve_domain::DomainError;

use crate::entities::GateError;
use crate::infrastructure::ports::RepoError;

/// Container for session lifecycle use cases.
pub struct SessionUseCases {
    pub start: Arc<StartSession>,
    pub exit: Arc<ExitSession>,
    pub reset: Arc<ResetSession>,
}

impl SessionUseCases {
    pub fn new(start: Arc<StartSession>, exit: Arc<ExitSession>, reset: Arc<ResetSession>) -> Self {
        Self { start, exit, reset }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Gate(#[from] GateError),
    #[error("Validation error: {0}")]
    Domain(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl SessionError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Gate(e) => e.code(),
            Self::Domain(e) => e.code(),
            Self::Repo(e) => e.code(),
        }
    }
}
