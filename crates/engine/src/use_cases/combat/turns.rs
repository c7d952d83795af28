//! Turn use cases: hero actions and closing a decided fight.

use std::sync::Arc;

use deepdelve_domain::{ActionReport, AuthorityKey, CombatAction, ConcludeOutcome, SessionKey};

use crate::entities::Adventures;
use crate::infrastructure::ports::ClockPort;

use super::CombatError;

/// Play one hero action, then every enemy turn up to the next hero.
pub struct SubmitCombatAction {
    adventures: Arc<Adventures>,
    clock: Arc<dyn ClockPort>,
}

impl SubmitCombatAction {
    pub fn new(adventures: Arc<Adventures>, clock: Arc<dyn ClockPort>) -> Self {
        Self { adventures, clock }
    }

    pub async fn execute(
        &self,
        caller: AuthorityKey,
        key: SessionKey,
        action: CombatAction,
    ) -> Result<ActionReport, CombatError> {
        let now = self.clock.now().timestamp();
        let mut working = self.adventures.open(key).await?;
        let mut combat = working.take_combat(caller)?;
        let report = working
            .session
            .submit_combat_action(caller, &mut combat, action, now)?;
        working.combat = Some(combat);
        self.adventures.save(working, Vec::new()).await?;

        tracing::debug!(
            session = %key,
            hero = action.hero_index,
            action = ?action.action,
            events = report.events.len(),
            round = report.round,
            resolution = ?report.resolution,
            "Combat action applied"
        );
        Ok(report)
    }
}

/// Apply a decided fight's consequences to the party and close it.
pub struct ConcludeCombat {
    adventures: Arc<Adventures>,
    clock: Arc<dyn ClockPort>,
}

impl ConcludeCombat {
    pub fn new(adventures: Arc<Adventures>, clock: Arc<dyn ClockPort>) -> Self {
        Self { adventures, clock }
    }

    pub async fn execute(
        &self,
        caller: AuthorityKey,
        key: SessionKey,
    ) -> Result<ConcludeOutcome, CombatError> {
        let now = self.clock.now().timestamp();
        let mut working = self.adventures.open(key).await?;
        let mut combat = working.take_combat(caller)?;
        let outcome = working
            .session
            .conclude_combat(caller, &mut combat, now)?;
        working.combat = Some(combat);
        self.adventures.save(working, Vec::new()).await?;

        tracing::info!(
            session = %key,
            resolution = ?outcome.resolution,
            experience = outcome.experience_awarded,
            loot_slots = outcome.loot_slots,
            traits = outcome.traits_gained,
            "Combat concluded"
        );
        Ok(outcome)
    }
}
