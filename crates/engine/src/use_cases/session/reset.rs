//! Reset session use case.

use std::sync::Arc;

use deepdelve_domain::{AuthorityKey, SessionKey};

use crate::entities::Adventures;
use crate::infrastructure::ports::ClockPort;

use super::SessionError;

/// Clear opened chests, used portals and run state between runs.
pub struct ResetSession {
    adventures: Arc<Adventures>,
    clock: Arc<dyn ClockPort>,
}

impl ResetSession {
    pub fn new(adventures: Arc<Adventures>, clock: Arc<dyn ClockPort>) -> Self {
        Self { adventures, clock }
    }

    pub async fn execute(&self, caller: AuthorityKey, key: SessionKey) -> Result<(), SessionError> {
        let now = self.clock.now().timestamp();
        let mut working = self.adventures.open(key).await?;
        working.session.reset(caller, now)?;
        self.adventures.save(working, Vec::new()).await?;

        tracing::info!(session = %key, "Adventure reset");
        Ok(())
    }
}
