//! Application state and composition.

use std::sync::Arc;

use deepdelve_shared::CommitNotice;
use tokio::sync::broadcast;

use crate::entities::Adventures;
use crate::infrastructure::{
    memory::{BroadcastPublisher, InMemoryAdventureStore, InMemoryDelegateStore},
    ports::{AdventureStore, ClockPort, CommitPublisher, DelegateStore, RepoError},
    session_guard::SessionGuards,
    settings::Fixtures,
};
use crate::use_cases;

/// Main application state.
///
/// Holds the stores and every use case. Intents reach it through
/// [`crate::api::dispatch`].
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
}

/// Ports the use cases were wired against.
pub struct Repositories {
    pub adventures: Arc<dyn AdventureStore>,
    pub delegates: Arc<dyn DelegateStore>,
    pub publisher: Arc<dyn CommitPublisher>,
    pub clock: Arc<dyn ClockPort>,
}

/// Container for all use cases.
pub struct UseCases {
    pub session: use_cases::SessionUseCases,
    pub movement: use_cases::MovementUseCases,
    pub combat: use_cases::CombatUseCases,
    pub inventory: use_cases::InventoryUseCases,
    pub delegation: use_cases::DelegationUseCases,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(
        store: Arc<dyn AdventureStore>,
        delegates: Arc<dyn DelegateStore>,
        publisher: Arc<dyn CommitPublisher>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        let adventures = Arc::new(Adventures::new(
            store.clone(),
            delegates.clone(),
            publisher.clone(),
            SessionGuards::new(),
        ));

        let session = use_cases::SessionUseCases::new(
            Arc::new(use_cases::session::StartSession::new(
                adventures.clone(),
                clock.clone(),
            )),
            Arc::new(use_cases::session::ExitSession::new(
                adventures.clone(),
                clock.clone(),
            )),
            Arc::new(use_cases::session::ResetSession::new(
                adventures.clone(),
                clock.clone(),
            )),
        );

        let movement = use_cases::MovementUseCases::new(Arc::new(
            use_cases::movement::MoveParty::new(adventures.clone()),
        ));

        let combat = use_cases::CombatUseCases::new(
            Arc::new(use_cases::combat::BeginEncounter::new(
                adventures.clone(),
                clock.clone(),
            )),
            Arc::new(use_cases::combat::DeclineEncounter::new(adventures.clone())),
            Arc::new(use_cases::combat::SubmitCombatAction::new(
                adventures.clone(),
                clock.clone(),
            )),
            Arc::new(use_cases::combat::ConcludeCombat::new(
                adventures.clone(),
                clock.clone(),
            )),
        );

        let inventory = use_cases::InventoryUseCases::new(
            Arc::new(use_cases::inventory::PickupItem::new(adventures.clone())),
            Arc::new(use_cases::inventory::DropItem::new(adventures.clone())),
            Arc::new(use_cases::inventory::SwapItem::new(adventures.clone())),
            Arc::new(use_cases::inventory::UseItem::new(adventures.clone())),
            Arc::new(use_cases::inventory::OpenChest::new(adventures.clone())),
            Arc::new(use_cases::inventory::TakeLoot::new(adventures.clone())),
        );

        let delegation = use_cases::DelegationUseCases::new(
            Arc::new(use_cases::delegation::SetDelegate::new(adventures.clone())),
            Arc::new(use_cases::delegation::Undelegate::new(
                adventures,
                clock.clone(),
            )),
        );

        Self {
            repositories: Repositories {
                adventures: store,
                delegates,
                publisher,
                clock,
            },
            use_cases: UseCases {
                session,
                movement,
                combat,
                inventory,
                delegation,
            },
        }
    }

    /// Wire the engine against the in-memory stores and a broadcast channel
    /// of commit notices.
    pub fn in_memory(
        channel_capacity: usize,
        clock: Arc<dyn ClockPort>,
    ) -> (Self, broadcast::Receiver<CommitNotice>) {
        let (publisher, notices) = BroadcastPublisher::new(channel_capacity);
        let app = Self::new(
            Arc::new(InMemoryAdventureStore::new()),
            Arc::new(InMemoryDelegateStore::new()),
            Arc::new(publisher),
            clock,
        );
        (app, notices)
    }

    /// Write fixture records into the canonical store.
    pub async fn seed(&self, fixtures: Fixtures) -> Result<(), RepoError> {
        let (heroes, dungeons) = (fixtures.heroes.len(), fixtures.dungeons.len());
        for dungeon in fixtures.dungeons {
            self.repositories.adventures.put_dungeon(dungeon).await?;
        }
        for hero in fixtures.heroes {
            self.repositories.adventures.put_hero(hero).await?;
        }
        tracing::info!(heroes, dungeons, "Seeded fixture records");
        Ok(())
    }
}
