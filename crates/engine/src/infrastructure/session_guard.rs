//! Single-writer guard per session.
//!
//! A mutation holds a [`SessionPermit`] for its whole load-mutate-commit cycle.
//! A second mutation on the same session is refused immediately rather than
//! queued.

use std::sync::Arc;

use dashmap::DashSet;
use deepdelve_domain::SessionKey;

#[derive(Clone, Default)]
pub struct SessionGuards {
    held: Arc<DashSet<SessionKey>>,
}

impl SessionGuards {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` when another mutation already holds this session.
    pub fn try_acquire(&self, key: SessionKey) -> Option<SessionPermit> {
        if self.held.insert(key) {
            Some(SessionPermit {
                key,
                held: Arc::clone(&self.held),
            })
        } else {
            None
        }
    }

    pub fn is_held(&self, key: &SessionKey) -> bool {
        self.held.contains(key)
    }
}

/// Releases its session when dropped.
pub struct SessionPermit {
    key: SessionKey,
    held: Arc<DashSet<SessionKey>>,
}

impl SessionPermit {
    pub fn key(&self) -> SessionKey {
        self.key
    }
}

impl Drop for SessionPermit {
    fn drop(&mut self) {
        self.held.remove(&self.key);
    }
}

impl std::fmt::Debug for SessionPermit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionPermit").field("key", &self.key).finish()
    }
}
