use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DomainError;

/// Width in bytes of every opaque key.
pub const KEY_LEN: usize = 32;

macro_rules! define_key {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name([u8; KEY_LEN]);

        impl $name {
            pub const fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
                Self(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
                &self.0
            }

            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }

            pub fn from_hex(value: &str) -> Result<Self, DomainError> {
                let raw = hex::decode(value).map_err(|e| {
                    DomainError::invalid_key(format!("{}: {}", stringify!($name), e))
                })?;
                let bytes: [u8; KEY_LEN] = raw.try_into().map_err(|_| {
                    DomainError::invalid_key(format!(
                        "{}: expected {} bytes",
                        stringify!($name),
                        KEY_LEN
                    ))
                })?;
                Ok(Self(bytes))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.to_hex())
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_hex(s)
            }
        }

        impl From<[u8; KEY_LEN]> for $name {
            fn from(value: [u8; KEY_LEN]) -> Self {
                Self(value)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Self::from_hex(&raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

// Signing authorities: players and delegates
define_key!(AuthorityKey);

// Canonical records
define_key!(HeroId);
define_key!(DungeonId);

/// Address of one adventure session: a (player, dungeon) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionKey {
    pub player: AuthorityKey,
    pub dungeon: DungeonId,
}

impl SessionKey {
    pub fn new(player: AuthorityKey, dungeon: DungeonId) -> Self {
        Self { player, dungeon }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.player, self.dungeon)
    }
}
