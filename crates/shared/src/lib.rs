//! Deepdelve Protocol - types exchanged between callers and the engine
//!
//! - [`Intent`]: one discrete request to mutate a session
//! - [`IntentResponse`] / [`ErrorBody`]: the reply, success data or a coded error
//! - [`CommitNotice`]: published when delegated state is reconciled
//!
//! # Design Principles
//!
//! 1. **No business logic** - pure data types and serialization
//! 2. **No domain IDs** - keys travel as hex strings; the engine parses them
//! 3. **Domain vocabulary** - small enums (directions, actions) are reused as-is

pub mod intents;
pub mod notices;
pub mod responses;

pub use intents::{Intent, ItemSlotData, SessionRef};
pub use notices::{CommitNotice, CommitReason};
pub use responses::{ErrorBody, IntentResponse};

// Vocabulary shared with the domain
pub use deepdelve_domain::{Direction, HeroAction, TargetSelector};
