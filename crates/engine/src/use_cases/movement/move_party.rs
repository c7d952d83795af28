//! Move party use case.
//!
//! One step in one of eight directions. Burns the torch and may roll an
//! encounter when the party lands on an unused portal.

use std::sync::Arc;

use deepdelve_domain::{AuthorityKey, Direction, MoveOutcome, SessionKey};

use crate::entities::Adventures;

use super::MovementError;

pub struct MoveParty {
    adventures: Arc<Adventures>,
}

impl MoveParty {
    pub fn new(adventures: Arc<Adventures>) -> Self {
        Self { adventures }
    }

    /// Execute the move.
    ///
    /// # Returns
    /// * `Ok(MoveOutcome)` - New position, what was found there and the torch level
    /// * `Err(MovementError)` - Nothing moved
    pub async fn execute(
        &self,
        caller: AuthorityKey,
        key: SessionKey,
        direction: Direction,
    ) -> Result<MoveOutcome, MovementError> {
        let mut working = self.adventures.open(key).await?;
        let outcome = working.session.apply_move(caller, direction)?;
        self.adventures.save(working, Vec::new()).await?;

        tracing::debug!(
            session = %key,
            direction = ?direction,
            x = outcome.position.x,
            y = outcome.position.y,
            torch = outcome.torch,
            "Party moved"
        );
        if outcome.encounter {
            tracing::info!(session = %key, "Encounter pending");
        }
        Ok(outcome)
    }
}
