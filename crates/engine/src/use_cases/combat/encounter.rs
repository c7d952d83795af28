//! Encounter use cases.

use std::sync::Arc;

use deepdelve_domain::{ActionReport, AuthorityKey, SessionKey};

use crate::entities::Adventures;
use crate::infrastructure::ports::ClockPort;

use super::CombatError;

/// Accept the pending encounter and open the fight.
///
/// Enemy turns that come before the first hero are already played in the
/// returned report.
pub struct BeginEncounter {
    adventures: Arc<Adventures>,
    clock: Arc<dyn ClockPort>,
}

impl BeginEncounter {
    pub fn new(adventures: Arc<Adventures>, clock: Arc<dyn ClockPort>) -> Self {
        Self { adventures, clock }
    }

    pub async fn execute(
        &self,
        caller: AuthorityKey,
        key: SessionKey,
    ) -> Result<ActionReport, CombatError> {
        let now = self.clock.now().timestamp();
        let mut working = self.adventures.open(key).await?;
        let (combat, report) = working.session.begin_encounter(caller, now)?;
        let enemies = combat.enemies().len();
        working.combat = Some(combat);
        self.adventures.save(working, Vec::new()).await?;

        tracing::info!(
            session = %key,
            enemies,
            next_hero = ?report.next_hero,
            resolution = ?report.resolution,
            "Encounter began"
        );
        Ok(report)
    }
}

/// Walk away from the pending encounter.
pub struct DeclineEncounter {
    adventures: Arc<Adventures>,
}

impl DeclineEncounter {
    pub fn new(adventures: Arc<Adventures>) -> Self {
        Self { adventures }
    }

    pub async fn execute(&self, caller: AuthorityKey, key: SessionKey) -> Result<(), CombatError> {
        let mut working = self.adventures.open(key).await?;
        working.session.decline_encounter(caller)?;
        self.adventures.save(working, Vec::new()).await?;

        tracing::info!(session = %key, "Encounter declined");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::AdventureStore;
    use crate::test_fixtures::{player, session_key, started_fixture, walk_until_encounter};

    #[tokio::test]
    async fn begin_without_pending_encounter_fails() {
        let fixture = started_fixture().await;

        let err = BeginEncounter::new(fixture.adventures.clone(), fixture.clock())
            .execute(player(), session_key())
            .await
            .unwrap_err();

        assert_eq!(err.code(), "NO_PENDING_ENCOUNTER");
    }

    #[tokio::test]
    async fn begin_stores_the_fight_next_to_the_session() {
        let fixture = started_fixture().await;
        walk_until_encounter(&fixture).await;

        let report = BeginEncounter::new(fixture.adventures.clone(), fixture.clock())
            .execute(player(), session_key())
            .await
            .unwrap();

        let session = fixture.store.load_session(session_key()).await.unwrap().unwrap();
        assert!(session.in_combat());
        let combat = fixture.store.load_combat(session_key()).await.unwrap();
        assert!(combat.is_some());
        assert!(report.round >= 1);
    }

    #[tokio::test]
    async fn decline_clears_the_encounter() {
        let fixture = started_fixture().await;
        walk_until_encounter(&fixture).await;
        let decline = DeclineEncounter::new(fixture.adventures.clone());

        decline.execute(player(), session_key()).await.unwrap();

        let session = fixture.store.load_session(session_key()).await.unwrap().unwrap();
        assert_eq!(session.pending_encounter_seed(), None);
        let err = decline.execute(player(), session_key()).await.unwrap_err();
        assert_eq!(err.code(), "NO_PENDING_ENCOUNTER");
    }
}
