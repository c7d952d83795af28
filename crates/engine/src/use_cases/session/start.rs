//! Start session use case.
//!
//! Brings a party into a dungeon. The session is created from its dungeon on
//! first use; the hero locks and the session land in one batch.

use std::sync::Arc;

use deepdelve_domain::{AuthorityKey, DomainError, HeroId, ItemSlot, SessionKey, StartOutcome};

use crate::entities::{Adventures, GateError};
use crate::infrastructure::ports::{ClockPort, RepoError};

use super::SessionError;

pub struct StartSession {
    adventures: Arc<Adventures>,
    clock: Arc<dyn ClockPort>,
}

impl StartSession {
    pub fn new(adventures: Arc<Adventures>, clock: Arc<dyn ClockPort>) -> Self {
        Self { adventures, clock }
    }

    pub async fn execute(
        &self,
        caller: AuthorityKey,
        key: SessionKey,
        hero_ids: &[HeroId],
        items: &[ItemSlot],
    ) -> Result<StartOutcome, SessionError> {
        let now = self.clock.now().timestamp();
        let mut working = self.adventures.open_or_create(key, now).await?;

        let mut heroes = self.adventures.heroes(hero_ids).await?;
        if heroes.len() != hero_ids.len() {
            return Err(DomainError::HeroUnavailable.into());
        }

        let outcome = working.session.start(caller, &mut heroes, items, now)?;
        self.adventures
            .save(working, heroes)
            .await
            .map_err(|e| match e {
                // Another session locked one of the heroes after we read them.
                GateError::Repo(RepoError::ConstraintViolation(_)) => {
                    SessionError::Domain(DomainError::HeroAlreadyActive)
                }
                e => e.into(),
            })?;

        tracing::info!(
            session = %key,
            heroes = hero_ids.len(),
            items = items.len(),
            resumed = outcome.resumed,
            daily_reset = outcome.daily_reset,
            x = outcome.position.x,
            y = outcome.position.y,
            "Adventure started"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::AdventureStore;
    use crate::test_fixtures::{hero_id, player, session_key, stranger, Fixture};
    use deepdelve_domain::{DungeonPoint, ItemKey};

    fn use_case(fixture: &Fixture) -> StartSession {
        StartSession::new(fixture.adventures.clone(), fixture.clock())
    }

    #[tokio::test]
    async fn first_start_creates_the_session_and_locks_heroes() {
        let fixture = Fixture::seeded().await;
        let items = [ItemSlot::new(ItemKey::HealingSalve, 2).unwrap()];

        let outcome = use_case(&fixture)
            .execute(player(), session_key(), &[hero_id(1), hero_id(2)], &items)
            .await
            .unwrap();

        assert_eq!(outcome.position, DungeonPoint::new(0, 0));
        let session = fixture.store.load_session(session_key()).await.unwrap().unwrap();
        assert_eq!(session.hero_count(), 2);
        assert_eq!(session.items().quantity_of(ItemKey::HealingSalve), 2);
        let heroes = fixture
            .store
            .load_heroes(&[hero_id(1), hero_id(2), hero_id(3)])
            .await
            .unwrap();
        assert!(heroes[0].lock.is_active && heroes[1].lock.is_active);
        assert!(!heroes[2].lock.is_active);
    }

    #[tokio::test]
    async fn unknown_hero_is_unavailable_and_nothing_is_written() {
        let fixture = Fixture::seeded().await;

        let err = use_case(&fixture)
            .execute(player(), session_key(), &[hero_id(1), hero_id(9)], &[])
            .await
            .unwrap_err();

        assert_eq!(err.code(), "HERO_UNAVAILABLE");
        assert!(fixture.store.load_session(session_key()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn stranger_cannot_start_a_players_session() {
        let fixture = Fixture::seeded().await;

        let err = use_case(&fixture)
            .execute(stranger(), session_key(), &[hero_id(1)], &[])
            .await
            .unwrap_err();

        assert_eq!(err.code(), "ADVENTURE_OWNER_MISMATCH");
        let hero = fixture.store.load_heroes(&[hero_id(1)]).await.unwrap();
        assert!(!hero[0].lock.is_active);
    }

    #[tokio::test]
    async fn loot_only_items_cannot_be_brought_in() {
        let fixture = Fixture::seeded().await;
        let items = [ItemSlot::new(ItemKey::PouchGold, 5).unwrap()];

        let err = use_case(&fixture)
            .execute(player(), session_key(), &[hero_id(1)], &items)
            .await
            .unwrap_err();

        assert_eq!(err.code(), "INVALID_ITEM_KEY");
    }

    #[tokio::test]
    async fn starting_twice_is_rejected() {
        let fixture = Fixture::seeded().await;
        let start = use_case(&fixture);
        start
            .execute(player(), session_key(), &[hero_id(1)], &[])
            .await
            .unwrap();

        let err = start
            .execute(player(), session_key(), &[hero_id(2)], &[])
            .await
            .unwrap_err();
        assert_eq!(err.code(), "ADVENTURE_ALREADY_ACTIVE");
    }

    mod contention {
        use super::*;
        use crate::entities::Adventures;
        use crate::infrastructure::memory::{
            BroadcastPublisher, InMemoryAdventureStore, InMemoryDelegateStore,
        };
        use crate::infrastructure::ports::{CommitBatch, RepoError};
        use crate::infrastructure::session_guard::SessionGuards;
        use crate::test_fixtures::dungeon;
        use async_trait::async_trait;
        use deepdelve_domain::{
            AdventureCombat, AdventureSession, DungeonId, DungeonRecord, HeroRecord,
        };

        /// Canonical store that hands control back to the runtime after
        /// reading heroes, so two starts can interleave between read and commit.
        struct InterleavingStore(Arc<InMemoryAdventureStore>);

        #[async_trait]
        impl AdventureStore for InterleavingStore {
            async fn load_session(
                &self,
                key: SessionKey,
            ) -> Result<Option<AdventureSession>, RepoError> {
                self.0.load_session(key).await
            }

            async fn load_combat(
                &self,
                key: SessionKey,
            ) -> Result<Option<AdventureCombat>, RepoError> {
                self.0.load_combat(key).await
            }

            async fn load_heroes(&self, ids: &[HeroId]) -> Result<Vec<HeroRecord>, RepoError> {
                let heroes = self.0.load_heroes(ids).await?;
                tokio::task::yield_now().await;
                Ok(heroes)
            }

            async fn load_dungeon(&self, id: DungeonId) -> Result<Option<DungeonRecord>, RepoError> {
                self.0.load_dungeon(id).await
            }

            async fn commit(&self, batch: CommitBatch) -> Result<(), RepoError> {
                self.0.commit(batch).await
            }

            async fn put_hero(&self, hero: HeroRecord) -> Result<(), RepoError> {
                self.0.put_hero(hero).await
            }

            async fn put_dungeon(&self, dungeon: DungeonRecord) -> Result<(), RepoError> {
                self.0.put_dungeon(dungeon).await
            }
        }

        #[tokio::test]
        async fn one_hero_cannot_enter_two_dungeons_at_once() {
            let inner = Arc::new(InMemoryAdventureStore::new());
            let second = DungeonRecord {
                id: DungeonId::from_bytes([3; 32]),
                ..dungeon()
            };
            inner.put_dungeon(dungeon()).await.unwrap();
            inner.put_dungeon(second.clone()).await.unwrap();
            inner.put_hero(crate::test_fixtures::hero(player(), 1)).await.unwrap();

            let (publisher, _notices) = BroadcastPublisher::new(4);
            let adventures = Arc::new(Adventures::new(
                Arc::new(InterleavingStore(inner.clone())),
                Arc::new(InMemoryDelegateStore::new()),
                Arc::new(publisher),
                SessionGuards::new(),
            ));
            let clock: Arc<dyn ClockPort> = Arc::new(
                crate::infrastructure::clock::ManualClock::at(crate::test_fixtures::START_TIME),
            );
            let start = StartSession::new(adventures, clock);
            let first_key = session_key();
            let second_key = SessionKey::new(player(), second.id);

            let heroes = [hero_id(1)];
            let (first, other) = tokio::join!(
                start.execute(player(), first_key, &heroes, &[]),
                start.execute(player(), second_key, &heroes, &[]),
            );

            let (winner, loser) = match (&first, &other) {
                (Ok(_), Err(e)) => (first_key, e),
                (Err(e), Ok(_)) => (second_key, e),
                _ => panic!("exactly one start should win: {first:?} / {other:?}"),
            };
            assert_eq!(loser.code(), "HERO_ALREADY_ACTIVE");
            let hero = inner.load_heroes(&[hero_id(1)]).await.unwrap();
            assert_eq!(hero[0].lock.adventure, Some(winner));
            let inside = |key| {
                let inner = inner.clone();
                async move {
                    inner
                        .load_session(key)
                        .await
                        .unwrap()
                        .is_some_and(|s| s.heroes_inside())
                }
            };
            assert!(inside(winner).await);
            let loser_key = if winner == first_key { second_key } else { first_key };
            assert!(!inside(loser_key).await);
        }
    }
}
