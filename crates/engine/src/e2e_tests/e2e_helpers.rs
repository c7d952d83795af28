//! Helpers for driving the wired engine with intents.

use std::sync::Arc;

use deepdelve_domain::{
    AdventureCombat, AdventureSession, AuthorityKey, CombatResolution, Direction, HeroAction,
    HeroRecord, TargetSelector,
};
use deepdelve_shared::{CommitNotice, Intent, IntentResponse, ItemSlotData, SessionRef};
use serde_json::Value;
use tokio::sync::broadcast;

use crate::api::dispatch;
use crate::app::App;
use crate::infrastructure::clock::ManualClock;
use crate::infrastructure::ports::{AdventureStore, DelegateCopy, DelegateStore};
use crate::infrastructure::settings::Fixtures;
use crate::test_fixtures::{dungeon, dungeon_id, hero, hero_id, player, session_key, START_TIME};

/// Wired app plus the handles a scenario needs to look behind the API.
pub struct E2EContext {
    pub app: App,
    pub clock: Arc<ManualClock>,
    pub notices: broadcast::Receiver<CommitNotice>,
}

impl E2EContext {
    /// App seeded with the test dungeon and four of the player's heroes.
    pub async fn setup() -> Self {
        let clock = Arc::new(ManualClock::at(START_TIME));
        let (app, notices) = App::in_memory(16, clock.clone());
        app.seed(Fixtures {
            heroes: (1..=4).map(|n| hero(player(), n)).collect(),
            dungeons: vec![dungeon()],
        })
        .await
        .expect("seed fixtures");
        Self {
            app,
            clock,
            notices,
        }
    }

    pub async fn send(&self, intent: Intent) -> IntentResponse {
        dispatch(&self.app, intent).await
    }

    /// Send and unwrap the success payload (`Null` for unit results).
    pub async fn expect_ok(&self, intent: Intent) -> Value {
        let name = intent.name();
        match self.send(intent).await {
            IntentResponse::Success { data } => data.unwrap_or(Value::Null),
            IntentResponse::Error(body) => {
                panic!("{name} failed: {} ({})", body.message, body.code)
            }
        }
    }

    /// Send and return the error code, failing on success.
    pub async fn expect_code(&self, intent: Intent) -> String {
        let name = intent.name();
        match self.send(intent).await {
            IntentResponse::Error(body) => body.code,
            IntentResponse::Success { .. } => panic!("{name} unexpectedly succeeded"),
        }
    }

    /// Session as stored canonically.
    pub async fn canonical(&self) -> AdventureSession {
        self.app
            .repositories
            .adventures
            .load_session(session_key())
            .await
            .expect("load session")
            .expect("session exists")
    }

    /// Session the next intent will act on: the delegate copy when there is one.
    pub async fn live(&self) -> AdventureSession {
        match self.delegate_copy().await {
            Some(copy) => copy.session,
            None => self.canonical().await,
        }
    }

    pub async fn delegate_copy(&self) -> Option<DelegateCopy> {
        self.app
            .repositories
            .delegates
            .load(session_key())
            .await
            .expect("load delegate copy")
    }

    pub async fn live_combat(&self) -> Option<AdventureCombat> {
        match self.delegate_copy().await {
            Some(copy) => copy.combat,
            None => self
                .app
                .repositories
                .adventures
                .load_combat(session_key())
                .await
                .expect("load combat"),
        }
    }

    pub async fn heroes(&self, ids: &[u8]) -> Vec<HeroRecord> {
        let ids = ids.iter().map(|n| hero_id(*n)).collect::<Vec<_>>();
        self.app
            .repositories
            .adventures
            .load_heroes(&ids)
            .await
            .expect("load heroes")
    }

    /// Pace between the chest and the portal until the portal roll hits.
    pub async fn walk_until_encounter(&self, caller: AuthorityKey) {
        let at = self.live().await.party_position();
        match (at.x, at.y) {
            (0, 0) => {
                self.expect_ok(step(caller, Direction::East)).await;
            }
            (2, 0) => {
                self.expect_ok(step(caller, Direction::West)).await;
            }
            _ => {}
        }
        for _ in 0..400 {
            let moved = self.expect_ok(step(caller, Direction::East)).await;
            if moved["encounter"] == Value::Bool(true) {
                return;
            }
            self.expect_ok(step(caller, Direction::West)).await;
        }
        panic!("no encounter after 400 portal visits");
    }

    /// Attack the first living enemy with whoever is up until the fight is
    /// decided, defending when out of action points.
    pub async fn fight(&self, caller: AuthorityKey) -> CombatResolution {
        for _ in 0..500 {
            let combat = self.live_combat().await.expect("combat in progress");
            if combat.resolution().is_terminal() {
                return combat.resolution();
            }
            let hero_index = combat.current_hero().expect("hero turn");
            let target = combat
                .enemies()
                .iter()
                .position(|e| e.core.alive)
                .expect("living enemy") as u8;

            let attack = act(caller, hero_index, HeroAction::Attack, TargetSelector::Enemy(target));
            match self.send(attack).await {
                IntentResponse::Success { .. } => {}
                IntentResponse::Error(body) if body.code == "INSUFFICIENT_ACTION_POINTS" => {
                    self.expect_ok(act(
                        caller,
                        hero_index,
                        HeroAction::Defend,
                        TargetSelector::None,
                    ))
                    .await;
                }
                IntentResponse::Error(body) => panic!("combat action failed: {}", body.message),
            }
        }
        panic!("fight did not resolve after 500 actions");
    }
}

pub fn session_ref() -> SessionRef {
    SessionRef {
        player: player().to_hex(),
        dungeon: dungeon_id().to_hex(),
    }
}

pub fn start(caller: AuthorityKey, heroes: &[u8], items: &[(u8, u16)]) -> Intent {
    Intent::StartSession {
        caller: caller.to_hex(),
        session: session_ref(),
        heroes: heroes.iter().map(|n| hero_id(*n).to_hex()).collect(),
        items: items
            .iter()
            .map(|(item_key, quantity)| ItemSlotData {
                item_key: *item_key,
                quantity: *quantity,
            })
            .collect(),
    }
}

pub fn step(caller: AuthorityKey, direction: Direction) -> Intent {
    Intent::MoveHero {
        caller: caller.to_hex(),
        session: session_ref(),
        direction,
    }
}

pub fn exit(caller: AuthorityKey) -> Intent {
    Intent::ExitSession {
        caller: caller.to_hex(),
        session: session_ref(),
    }
}

pub fn open_chest(caller: AuthorityKey, chest: u8) -> Intent {
    Intent::OpenChest {
        caller: caller.to_hex(),
        session: session_ref(),
        chest,
    }
}

pub fn take_loot(caller: AuthorityKey, take: Vec<u8>) -> Intent {
    Intent::TakeLoot {
        caller: caller.to_hex(),
        session: session_ref(),
        take,
        drop: Vec::new(),
    }
}

pub fn begin(caller: AuthorityKey) -> Intent {
    Intent::BeginEncounter {
        caller: caller.to_hex(),
        session: session_ref(),
    }
}

pub fn conclude(caller: AuthorityKey) -> Intent {
    Intent::ConcludeCombat {
        caller: caller.to_hex(),
        session: session_ref(),
    }
}

pub fn act(
    caller: AuthorityKey,
    hero_index: u8,
    action: HeroAction,
    target: TargetSelector,
) -> Intent {
    Intent::SubmitCombatAction {
        caller: caller.to_hex(),
        session: session_ref(),
        hero_index,
        action,
        target,
        item_key: None,
    }
}

pub fn set_delegate(caller: AuthorityKey, delegate: AuthorityKey) -> Intent {
    Intent::SetDelegate {
        caller: caller.to_hex(),
        session: session_ref(),
        delegate: delegate.to_hex(),
    }
}

pub fn undelegate(caller: AuthorityKey) -> Intent {
    Intent::Undelegate {
        caller: caller.to_hex(),
        session: session_ref(),
    }
}
