//! Canonical store held in memory.
//!
//! Sessions, combats and heroes share one lock so a batch lands atomically.
//! Dungeons are read-mostly and live in their own map.

use std::collections::HashMap;

use async_trait::async_trait;
use dashmap::DashMap;
use deepdelve_domain::{
    AdventureCombat, AdventureSession, DungeonId, DungeonRecord, HeroId, HeroRecord, SessionKey,
};
use tokio::sync::RwLock;

use crate::infrastructure::ports::{AdventureStore, CombatWrite, CommitBatch, RepoError};

#[derive(Default)]
struct Tables {
    sessions: HashMap<SessionKey, AdventureSession>,
    combats: HashMap<SessionKey, AdventureCombat>,
    heroes: HashMap<HeroId, HeroRecord>,
}

#[derive(Default)]
pub struct InMemoryAdventureStore {
    tables: RwLock<Tables>,
    dungeons: DashMap<DungeonId, DungeonRecord>,
}

impl InMemoryAdventureStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AdventureStore for InMemoryAdventureStore {
    async fn load_session(&self, key: SessionKey) -> Result<Option<AdventureSession>, RepoError> {
        Ok(self.tables.read().await.sessions.get(&key).cloned())
    }

    async fn load_combat(&self, key: SessionKey) -> Result<Option<AdventureCombat>, RepoError> {
        Ok(self.tables.read().await.combats.get(&key).cloned())
    }

    async fn load_heroes(&self, ids: &[HeroId]) -> Result<Vec<HeroRecord>, RepoError> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.heroes.get(id).cloned())
            .collect())
    }

    async fn load_dungeon(&self, id: DungeonId) -> Result<Option<DungeonRecord>, RepoError> {
        Ok(self.dungeons.get(&id).map(|entry| entry.value().clone()))
    }

    async fn commit(&self, batch: CommitBatch) -> Result<(), RepoError> {
        let key = batch.session.key();
        let mut tables = self.tables.write().await;

        let found = tables.sessions.get(&key).map(AdventureSession::version);
        if found != batch.expected_version {
            return Err(RepoError::conflict(batch.expected_version, found));
        }
        // A hero is locked into at most one session at a time.
        for hero in &batch.heroes {
            let held = tables
                .heroes
                .get(&hero.id)
                .filter(|stored| stored.lock.is_active)
                .and_then(|stored| stored.lock.adventure);
            if let Some(held) = held.filter(|held| *held != key) {
                return Err(RepoError::constraint(format!(
                    "hero {} is active in {held}",
                    hero.id
                )));
            }
        }

        match batch.combat {
            CombatWrite::Put(combat) => {
                tables.combats.insert(key, combat);
            }
            CombatWrite::Remove => {
                tables.combats.remove(&key);
            }
        }
        for hero in batch.heroes {
            tables.heroes.insert(hero.id, hero);
        }
        tables.sessions.insert(key, batch.session);
        Ok(())
    }

    async fn put_hero(&self, hero: HeroRecord) -> Result<(), RepoError> {
        self.tables.write().await.heroes.insert(hero.id, hero);
        Ok(())
    }

    async fn put_dungeon(&self, dungeon: DungeonRecord) -> Result<(), RepoError> {
        self.dungeons.insert(dungeon.id, dungeon);
        Ok(())
    }
}
