//! Storage ports: the canonical store and the delegate execution domain.

use async_trait::async_trait;
use deepdelve_domain::{
    AdventureCombat, AdventureSession, DungeonId, DungeonRecord, HeroId, HeroRecord, SessionKey,
};

use super::RepoError;

/// What a commit does with the combat record of its session.
#[derive(Debug, Clone, PartialEq)]
pub enum CombatWrite {
    Put(AdventureCombat),
    Remove,
}

impl CombatWrite {
    /// Keep the record while the session is fighting, drop it otherwise.
    pub fn follow(session: &AdventureSession, combat: Option<&AdventureCombat>) -> Self {
        match combat {
            Some(combat) if session.in_combat() => Self::Put(combat.clone()),
            _ => Self::Remove,
        }
    }
}

/// Everything one mutation writes. Applied all-or-nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitBatch {
    pub session: AdventureSession,
    /// Version read before the mutation; `None` when the session is new.
    pub expected_version: Option<u64>,
    pub combat: CombatWrite,
    pub heroes: Vec<HeroRecord>,
}

/// A delegate's working copy of one session.
#[derive(Debug, Clone, PartialEq)]
pub struct DelegateCopy {
    pub session: AdventureSession,
    pub combat: Option<AdventureCombat>,
}

impl DelegateCopy {
    pub fn key(&self) -> SessionKey {
        self.session.key()
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdventureStore: Send + Sync {
    async fn load_session(&self, key: SessionKey) -> Result<Option<AdventureSession>, RepoError>;

    async fn load_combat(&self, key: SessionKey) -> Result<Option<AdventureCombat>, RepoError>;

    /// Records for `ids`, in order. Ids without a record are skipped.
    async fn load_heroes(&self, ids: &[HeroId]) -> Result<Vec<HeroRecord>, RepoError>;

    async fn load_dungeon(&self, id: DungeonId) -> Result<Option<DungeonRecord>, RepoError>;

    /// Write a batch atomically, checking the stored session version first.
    async fn commit(&self, batch: CommitBatch) -> Result<(), RepoError>;

    async fn put_hero(&self, hero: HeroRecord) -> Result<(), RepoError>;

    async fn put_dungeon(&self, dungeon: DungeonRecord) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DelegateStore: Send + Sync {
    async fn load(&self, key: SessionKey) -> Result<Option<DelegateCopy>, RepoError>;

    /// Replace the copy if its stored version still matches `expected_version`.
    async fn save(
        &self,
        copy: DelegateCopy,
        expected_version: Option<u64>,
    ) -> Result<(), RepoError>;

    async fn remove(&self, key: SessionKey) -> Result<(), RepoError>;
}
