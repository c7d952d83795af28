//! Delegate execution domain held in memory.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use deepdelve_domain::SessionKey;

use crate::infrastructure::ports::{DelegateCopy, DelegateStore, RepoError};

#[derive(Default)]
pub struct InMemoryDelegateStore {
    copies: DashMap<SessionKey, DelegateCopy>,
}

impl InMemoryDelegateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DelegateStore for InMemoryDelegateStore {
    async fn load(&self, key: SessionKey) -> Result<Option<DelegateCopy>, RepoError> {
        Ok(self.copies.get(&key).map(|entry| entry.value().clone()))
    }

    async fn save(
        &self,
        copy: DelegateCopy,
        expected_version: Option<u64>,
    ) -> Result<(), RepoError> {
        match self.copies.entry(copy.key()) {
            Entry::Occupied(mut occupied) => {
                let found = occupied.get().session.version();
                if expected_version != Some(found) {
                    return Err(RepoError::conflict(expected_version, Some(found)));
                }
                occupied.insert(copy);
            }
            Entry::Vacant(vacant) => {
                if expected_version.is_some() {
                    return Err(RepoError::conflict(expected_version, None));
                }
                vacant.insert(copy);
            }
        }
        Ok(())
    }

    async fn remove(&self, key: SessionKey) -> Result<(), RepoError> {
        self.copies.remove(&key);
        Ok(())
    }
}
