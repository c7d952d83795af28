//! In-process adapters for every storage and notification port.

mod adventure_store;
mod delegate_store;
mod publisher;

pub use adventure_store::InMemoryAdventureStore;
pub use delegate_store::InMemoryDelegateStore;
pub use publisher::BroadcastPublisher;
