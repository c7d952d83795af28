//! Adventure gate: single-writer access to one session and its combat.
//!
//! Every mutation goes through [`Adventures::open`], which takes the session's
//! write guard and routes to where the session currently lives. Canonical
//! sessions are read from the [`AdventureStore`]; delegated sessions from the
//! delegate's copy, while the canonical record stays frozen.

use std::sync::Arc;

use deepdelve_domain::{
    AdventureCombat, AdventureSession, AuthorityKey, DomainError, HeroId, HeroRecord, SessionKey,
};
use deepdelve_shared::{CommitNotice, CommitReason};
use uuid::Uuid;

use crate::infrastructure::ports::{
    AdventureStore, CombatWrite, CommitBatch, CommitPublisher, DelegateCopy, DelegateStore,
    RepoError,
};
use crate::infrastructure::session_guard::{SessionGuards, SessionPermit};

#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("Session is busy with another mutation")]
    SessionBusy,
    #[error("Session not found: {0}")]
    SessionNotFound(SessionKey),
    #[error("Dungeon not found")]
    DungeonNotFound,
    #[error("Session is not delegated")]
    NotDelegated,
    #[error("Session is delegated")]
    Delegated,
    #[error("Validation error: {0}")]
    Domain(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl GateError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::SessionBusy => "SESSION_BUSY",
            Self::SessionNotFound(_) => "SESSION_NOT_FOUND",
            Self::DungeonNotFound => "DUNGEON_NOT_FOUND",
            Self::NotDelegated | Self::Delegated => "DELEGATE_MISMATCH",
            Self::Domain(e) => e.code(),
            Self::Repo(e) => e.code(),
        }
    }
}

/// Where a working session was loaded from and must be written back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionDomain {
    Canonical,
    Delegate,
}

/// A session opened for mutation. Holds the write guard until dropped.
#[derive(Debug)]
pub struct Working {
    pub session: AdventureSession,
    pub combat: Option<AdventureCombat>,
    domain: ExecutionDomain,
    /// Version of the record this was loaded from; `None` for a new session.
    loaded_version: Option<u64>,
    /// Canonical version at open time, frozen while delegated.
    canonical_version: Option<u64>,
    _permit: SessionPermit,
}

impl Working {
    pub fn domain(&self) -> ExecutionDomain {
        self.domain
    }

    pub fn is_delegated(&self) -> bool {
        self.domain == ExecutionDomain::Delegate
    }

    /// Take the combat out for a domain call that needs it by `&mut`.
    /// Authorization is checked before reporting a missing fight.
    pub fn take_combat(&mut self, caller: AuthorityKey) -> Result<AdventureCombat, DomainError> {
        match self.combat.take() {
            Some(combat) => Ok(combat),
            None => {
                self.session.authority().authorize(caller)?;
                Err(DomainError::CombatNotActive)
            }
        }
    }
}

pub struct Adventures {
    store: Arc<dyn AdventureStore>,
    delegates: Arc<dyn DelegateStore>,
    publisher: Arc<dyn CommitPublisher>,
    guards: SessionGuards,
}

impl Adventures {
    pub fn new(
        store: Arc<dyn AdventureStore>,
        delegates: Arc<dyn DelegateStore>,
        publisher: Arc<dyn CommitPublisher>,
        guards: SessionGuards,
    ) -> Self {
        Self {
            store,
            delegates,
            publisher,
            guards,
        }
    }

    fn acquire(&self, key: SessionKey) -> Result<SessionPermit, GateError> {
        self.guards.try_acquire(key).ok_or(GateError::SessionBusy)
    }

    /// Open an existing session for mutation.
    pub async fn open(&self, key: SessionKey) -> Result<Working, GateError> {
        let permit = self.acquire(key)?;
        let canonical = self
            .store
            .load_session(key)
            .await?
            .ok_or(GateError::SessionNotFound(key))?;
        self.route(canonical, permit).await
    }

    /// Open a session for a start, creating it from its dungeon on first use.
    pub async fn open_or_create(&self, key: SessionKey, now: i64) -> Result<Working, GateError> {
        let permit = self.acquire(key)?;
        if let Some(canonical) = self.store.load_session(key).await? {
            return self.route(canonical, permit).await;
        }

        let dungeon = self
            .store
            .load_dungeon(key.dungeon)
            .await?
            .ok_or(GateError::DungeonNotFound)?;
        let session = AdventureSession::new(key, &dungeon, now)?;
        tracing::debug!(session = %key, seed = session.seed(), "Creating adventure session");
        Ok(Working {
            session,
            combat: None,
            domain: ExecutionDomain::Canonical,
            loaded_version: None,
            canonical_version: None,
            _permit: permit,
        })
    }

    async fn route(
        &self,
        canonical: AdventureSession,
        permit: SessionPermit,
    ) -> Result<Working, GateError> {
        let key = canonical.key();
        let canonical_version = Some(canonical.version());

        if canonical.delegate().is_some() {
            let copy = self
                .delegates
                .load(key)
                .await?
                .ok_or_else(|| RepoError::not_found("DelegateCopy", key))?;
            return Ok(Working {
                loaded_version: Some(copy.session.version()),
                session: copy.session,
                combat: copy.combat,
                domain: ExecutionDomain::Delegate,
                canonical_version,
                _permit: permit,
            });
        }

        let combat = if canonical.in_combat() {
            self.store.load_combat(key).await?
        } else {
            None
        };
        Ok(Working {
            session: canonical,
            combat,
            domain: ExecutionDomain::Canonical,
            loaded_version: canonical_version,
            canonical_version,
            _permit: permit,
        })
    }

    /// Hero records for a start or an exit. Unknown ids are left out.
    pub async fn heroes(&self, ids: &[HeroId]) -> Result<Vec<HeroRecord>, RepoError> {
        self.store.load_heroes(ids).await
    }

    /// Write a mutation back to the domain it was loaded from.
    ///
    /// Hero records can only change in the canonical domain.
    pub async fn save(&self, working: Working, heroes: Vec<HeroRecord>) -> Result<(), GateError> {
        match working.domain {
            ExecutionDomain::Canonical => {
                let batch = CommitBatch {
                    combat: CombatWrite::follow(&working.session, working.combat.as_ref()),
                    session: working.session,
                    expected_version: working.loaded_version,
                    heroes,
                };
                self.store.commit(batch).await?;
            }
            ExecutionDomain::Delegate => {
                if !heroes.is_empty() {
                    return Err(GateError::Delegated);
                }
                let copy = DelegateCopy {
                    session: working.session,
                    combat: working.combat,
                };
                self.delegates.save(copy, working.loaded_version).await?;
            }
        }
        Ok(())
    }

    /// Stamp the delegate on the canonical record and seed the delegate copy.
    ///
    /// `working` must already carry the delegate (see `AdventureSession::delegate_to`).
    pub async fn delegate(&self, working: Working) -> Result<(), GateError> {
        if working.domain != ExecutionDomain::Canonical {
            return Err(GateError::Delegated);
        }
        if working.session.delegate().is_none() {
            return Err(GateError::NotDelegated);
        }
        let key = working.session.key();
        let copy = DelegateCopy {
            session: working.session.clone(),
            combat: working.combat.clone(),
        };
        self.delegates.save(copy, None).await?;

        let batch = CommitBatch {
            combat: CombatWrite::follow(&working.session, working.combat.as_ref()),
            session: working.session,
            expected_version: working.loaded_version,
            heroes: Vec::new(),
        };
        if let Err(e) = self.store.commit(batch).await {
            if let Err(cleanup) = self.delegates.remove(key).await {
                tracing::warn!(session = %key, error = %cleanup, "Failed to drop orphaned delegate copy");
            }
            return Err(e.into());
        }
        Ok(())
    }

    /// Replay a delegate's final state into the canonical store, drop the
    /// copy and publish a [`CommitNotice`].
    ///
    /// `working` must no longer carry the delegate (released or exited).
    pub async fn settle(
        &self,
        working: Working,
        heroes: Vec<HeroRecord>,
        reason: CommitReason,
        now: i64,
    ) -> Result<CommitNotice, GateError> {
        if working.domain != ExecutionDomain::Delegate {
            return Err(GateError::NotDelegated);
        }
        if working.session.delegate().is_some() {
            return Err(GateError::Delegated);
        }
        let key = working.session.key();
        let version = working.session.version();
        let notice = CommitNotice {
            batch_id: Uuid::new_v4(),
            player: key.player.to_hex(),
            dungeon: key.dungeon.to_hex(),
            reason,
            version,
            heroes: heroes.len(),
            committed_at: now,
        };

        let batch = CommitBatch {
            combat: CombatWrite::follow(&working.session, working.combat.as_ref()),
            session: working.session,
            expected_version: working.canonical_version,
            heroes,
        };
        self.store.commit(batch).await?;
        if let Err(e) = self.delegates.remove(key).await {
            // The canonical record no longer points at the copy, so it is inert.
            tracing::warn!(session = %key, error = %e, "Failed to drop settled delegate copy");
        }

        tracing::info!(
            session = %key,
            batch_id = %notice.batch_id,
            reason = ?reason,
            version,
            "Delegate state committed"
        );
        self.publisher.publish(notice.clone());
        Ok(notice)
    }
}
