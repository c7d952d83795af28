//! Set delegate use case.

use std::sync::Arc;

use deepdelve_domain::{AuthorityKey, SessionKey};

use crate::entities::Adventures;

use super::DelegationError;

/// Hand mutation rights for one session to `delegate`.
pub struct SetDelegate {
    adventures: Arc<Adventures>,
}

impl SetDelegate {
    pub fn new(adventures: Arc<Adventures>) -> Self {
        Self { adventures }
    }

    pub async fn execute(
        &self,
        caller: AuthorityKey,
        key: SessionKey,
        delegate: AuthorityKey,
    ) -> Result<(), DelegationError> {
        let mut working = self.adventures.open(key).await?;
        working.session.delegate_to(caller, delegate)?;
        self.adventures.delegate(working).await?;

        tracing::info!(session = %key, delegate = %delegate, "Session delegated");
        Ok(())
    }
}
