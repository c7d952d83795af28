//! Who may mutate a session right now.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::AuthorityKey;

/// Owner field plus guard for the canonical/delegate hand-off.
///
/// The player owns the session until it is delegated; from then on the
/// delegate is the only accepted mutator until it releases control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionAuthority {
    player: AuthorityKey,
    delegate: Option<AuthorityKey>,
}

impl SessionAuthority {
    pub fn new(player: AuthorityKey) -> Self {
        Self {
            player,
            delegate: None,
        }
    }

    #[inline]
    pub fn player(&self) -> AuthorityKey {
        self.player
    }

    #[inline]
    pub fn delegate(&self) -> Option<AuthorityKey> {
        self.delegate
    }

    #[inline]
    pub fn is_delegated(&self) -> bool {
        self.delegate.is_some()
    }

    /// The single authority currently allowed to mutate.
    pub fn owner(&self) -> AuthorityKey {
        self.delegate.unwrap_or(self.player)
    }

    pub fn authorize(&self, caller: AuthorityKey) -> Result<(), DomainError> {
        if caller == self.owner() {
            Ok(())
        } else {
            Err(DomainError::Unauthorized)
        }
    }

    /// Hand mutation rights to `delegate`. Only the current owner may do this,
    /// and only while not already delegated.
    pub fn delegate_to(
        &mut self,
        caller: AuthorityKey,
        delegate: AuthorityKey,
    ) -> Result<(), DomainError> {
        self.authorize(caller)?;
        if self.is_delegated() {
            return Err(DomainError::DelegateMismatch("session is already delegated"));
        }
        if delegate == self.player {
            return Err(DomainError::DelegateMismatch(
                "cannot delegate to the session player",
            ));
        }
        self.delegate = Some(delegate);
        Ok(())
    }

    /// Return control to the player. Only the active delegate may release.
    pub fn release(&mut self, caller: AuthorityKey) -> Result<AuthorityKey, DomainError> {
        let delegate = self
            .delegate
            .ok_or(DomainError::DelegateMismatch("session is not delegated"))?;
        self.authorize(caller)?;
        self.delegate = None;
        Ok(delegate)
    }

    /// Drop any delegation without a caller check; used when the run ends.
    pub(crate) fn clear_delegate(&mut self) {
        self.delegate = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: u8) -> AuthorityKey {
        AuthorityKey::from_bytes([n; 32])
    }

    #[test]
    fn player_owns_until_delegated() {
        let mut auth = SessionAuthority::new(key(1));
        assert!(auth.authorize(key(1)).is_ok());
        auth.delegate_to(key(1), key(9)).unwrap();
        assert_eq!(auth.authorize(key(1)), Err(DomainError::Unauthorized));
        assert!(auth.authorize(key(9)).is_ok());
    }

    #[test]
    fn only_delegate_may_release() {
        let mut auth = SessionAuthority::new(key(1));
        auth.delegate_to(key(1), key(9)).unwrap();
        assert_eq!(auth.release(key(1)), Err(DomainError::Unauthorized));
        assert_eq!(auth.release(key(9)), Ok(key(9)));
        assert_eq!(auth.owner(), key(1));
    }

    #[test]
    fn cannot_delegate_twice_or_to_self() {
        let mut auth = SessionAuthority::new(key(1));
        assert!(matches!(
            auth.delegate_to(key(1), key(1)),
            Err(DomainError::DelegateMismatch(_))
        ));
        auth.delegate_to(key(1), key(9)).unwrap();
        assert!(matches!(
            auth.delegate_to(key(9), key(5)),
            Err(DomainError::DelegateMismatch(_))
        ));
        assert!(matches!(
            SessionAuthority::new(key(1)).release(key(1)),
            Err(DomainError::DelegateMismatch(_))
        ));
    }
}
