//! Exit session use case.
//!
//! Leaves through the portal under the party and writes every hero back to
//! its home record. Exiting a delegated session also settles the delegate's
//! copy into the canonical store.

use std::sync::Arc;

use deepdelve_domain::{AuthorityKey, ExitOutcome, HeroId, SessionKey};
use deepdelve_shared::{CommitNotice, CommitReason};
use serde::Serialize;

use crate::entities::Adventures;
use crate::infrastructure::ports::ClockPort;

use super::SessionError;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitSummary {
    #[serde(flatten)]
    pub outcome: ExitOutcome,
    /// Present when the exit also ended a delegation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<CommitNotice>,
}

pub struct ExitSession {
    adventures: Arc<Adventures>,
    clock: Arc<dyn ClockPort>,
}

impl ExitSession {
    pub fn new(adventures: Arc<Adventures>, clock: Arc<dyn ClockPort>) -> Self {
        Self { adventures, clock }
    }

    pub async fn execute(
        &self,
        caller: AuthorityKey,
        key: SessionKey,
    ) -> Result<ExitSummary, SessionError> {
        let now = self.clock.now().timestamp();
        let mut working = self.adventures.open(key).await?;

        let ids: Vec<HeroId> = working.session.hero_ids().collect();
        let mut heroes = self.adventures.heroes(&ids).await?;
        let outcome = working.session.exit(caller, &mut heroes, now)?;

        let notice = if working.is_delegated() {
            let notice = self
                .adventures
                .settle(working, outcome.reconciled.clone(), CommitReason::Exit, now)
                .await?;
            Some(notice)
        } else {
            self.adventures
                .save(working, outcome.reconciled.clone())
                .await?;
            None
        };

        tracing::info!(
            session = %key,
            portal = outcome.portal,
            heroes = outcome.reconciled.len(),
            carried = outcome.carried.len(),
            settled = notice.is_some(),
            "Adventure exited"
        );
        Ok(ExitSummary { outcome, notice })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::AdventureStore;
    use crate::test_fixtures::{hero_id, player, session_key, Fixture};
    use crate::use_cases::movement::MoveParty;
    use crate::use_cases::session::StartSession;
    use deepdelve_domain::Direction;

    async fn started(fixture: &Fixture) {
        StartSession::new(fixture.adventures.clone(), fixture.clock())
            .execute(player(), session_key(), &[hero_id(1), hero_id(2)], &[])
            .await
            .unwrap();
    }

    async fn walk(fixture: &Fixture, steps: &[Direction]) {
        let moves = MoveParty::new(fixture.adventures.clone());
        for step in steps {
            moves.execute(player(), session_key(), *step).await.unwrap();
        }
    }

    #[tokio::test]
    async fn exit_on_portal_unlocks_heroes_and_closes_the_run() {
        let fixture = Fixture::seeded().await;
        started(&fixture).await;
        walk(&fixture, &[Direction::East, Direction::East]).await;

        let summary = ExitSession::new(fixture.adventures.clone(), fixture.clock())
            .execute(player(), session_key())
            .await
            .unwrap();

        assert_eq!(summary.outcome.portal, 0);
        assert_eq!(summary.outcome.reconciled.len(), 2);
        assert!(summary.notice.is_none());
        let session = fixture.store.load_session(session_key()).await.unwrap().unwrap();
        assert!(!session.is_active() && !session.heroes_inside());
        assert!(session.is_portal_used(0));
        let heroes = fixture
            .store
            .load_heroes(&[hero_id(1), hero_id(2)])
            .await
            .unwrap();
        assert!(heroes.iter().all(|h| !h.lock.is_active));
    }

    #[tokio::test]
    async fn exit_away_from_a_portal_fails_and_keeps_heroes_locked() {
        let fixture = Fixture::seeded().await;
        started(&fixture).await;

        let err = ExitSession::new(fixture.adventures.clone(), fixture.clock())
            .execute(player(), session_key())
            .await
            .unwrap_err();

        assert_eq!(err.code(), "NO_PORTAL_AT_POSITION");
        let heroes = fixture.store.load_heroes(&[hero_id(1)]).await.unwrap();
        assert!(heroes[0].lock.is_active);
    }

    #[tokio::test]
    async fn exit_of_unknown_session_is_not_found() {
        let fixture = Fixture::seeded().await;

        let err = ExitSession::new(fixture.adventures.clone(), fixture.clock())
            .execute(player(), session_key())
            .await
            .unwrap_err();

        assert_eq!(err.code(), "SESSION_NOT_FOUND");
    }
}
