//! Undelegate use case.

use std::sync::Arc;

use deepdelve_domain::{AuthorityKey, SessionKey};
use deepdelve_shared::{CommitNotice, CommitReason};

use crate::entities::Adventures;
use crate::infrastructure::ports::ClockPort;

use super::DelegationError;

/// Issued by the delegate: replay its final session and combat into the
/// canonical store, drop the copy and publish a [`CommitNotice`].
///
/// Allowed mid-fight; the combat record moves with the session.
pub struct Undelegate {
    adventures: Arc<Adventures>,
    clock: Arc<dyn ClockPort>,
}

impl Undelegate {
    pub fn new(adventures: Arc<Adventures>, clock: Arc<dyn ClockPort>) -> Self {
        Self { adventures, clock }
    }

    pub async fn execute(
        &self,
        caller: AuthorityKey,
        key: SessionKey,
    ) -> Result<CommitNotice, DelegationError> {
        let now = self.clock.now().timestamp();
        let mut working = self.adventures.open(key).await?;
        let released = working.session.release(caller)?;
        let notice = self
            .adventures
            .settle(working, Vec::new(), CommitReason::Undelegate, now)
            .await?;

        tracing::info!(
            session = %key,
            delegate = %released,
            batch_id = %notice.batch_id,
            "Session undelegated"
        );
        Ok(notice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{AdventureStore, DelegateStore};
    use crate::test_fixtures::{delegate, player, session_key, started_fixture};
    use crate::use_cases::delegation::SetDelegate;
    use crate::use_cases::movement::MoveParty;
    use deepdelve_domain::{Direction, DungeonPoint};

    #[tokio::test]
    async fn undelegate_replays_the_copy_and_publishes() {
        let mut fixture = started_fixture().await;
        SetDelegate::new(fixture.adventures.clone())
            .execute(player(), session_key(), delegate())
            .await
            .unwrap();
        MoveParty::new(fixture.adventures.clone())
            .execute(delegate(), session_key(), Direction::South)
            .await
            .unwrap();
        let frozen = fixture.store.load_session(session_key()).await.unwrap().unwrap();
        assert_eq!(frozen.party_position(), DungeonPoint::new(0, 0));

        let notice = Undelegate::new(fixture.adventures.clone(), fixture.clock())
            .execute(delegate(), session_key())
            .await
            .unwrap();

        let canonical = fixture.store.load_session(session_key()).await.unwrap().unwrap();
        assert_eq!(canonical.party_position(), DungeonPoint::new(0, 1));
        assert_eq!(canonical.delegate(), None);
        assert_eq!(canonical.version(), notice.version);
        assert!(fixture.delegates.load(session_key()).await.unwrap().is_none());
        assert_eq!(fixture.notices.recv().await.unwrap(), notice);
    }

    #[tokio::test]
    async fn undelegate_without_delegation_is_a_mismatch() {
        let fixture = started_fixture().await;

        let err = Undelegate::new(fixture.adventures.clone(), fixture.clock())
            .execute(player(), session_key())
            .await
            .unwrap_err();

        assert_eq!(err.code(), "DELEGATE_MISMATCH");
    }

    #[tokio::test]
    async fn player_cannot_undelegate() {
        let fixture = started_fixture().await;
        SetDelegate::new(fixture.adventures.clone())
            .execute(player(), session_key(), delegate())
            .await
            .unwrap();

        let err = Undelegate::new(fixture.adventures.clone(), fixture.clock())
            .execute(player(), session_key())
            .await
            .unwrap_err();

        assert_eq!(err.code(), "UNAUTHORIZED");
    }
}
