//! Shared records and wiring for engine tests.

use std::sync::Arc;

use deepdelve_domain::entities::{TILE_FLOOR, TILE_WALL, TRAIT_SLOTS};
use deepdelve_domain::{
    AuthorityKey, DungeonId, DungeonMap, DungeonPoint, DungeonRecord, DungeonStatus, HeroClass,
    HeroId, HeroLock, HeroRecord, HeroStats, SessionKey,
};
use deepdelve_shared::CommitNotice;
use tokio::sync::broadcast;

use crate::entities::Adventures;
use crate::infrastructure::clock::ManualClock;
use crate::infrastructure::memory::{
    BroadcastPublisher, InMemoryAdventureStore, InMemoryDelegateStore,
};
use crate::infrastructure::ports::{AdventureStore, ClockPort};
use crate::infrastructure::session_guard::SessionGuards;

pub const DUNGEON_SEED: u32 = 4242;
pub const START_TIME: i64 = 1_700_000_000;

pub fn player() -> AuthorityKey {
    AuthorityKey::from_bytes([1; 32])
}

pub fn delegate() -> AuthorityKey {
    AuthorityKey::from_bytes([7; 32])
}

pub fn stranger() -> AuthorityKey {
    AuthorityKey::from_bytes([66; 32])
}

pub fn dungeon_id() -> DungeonId {
    DungeonId::from_bytes([2; 32])
}

pub fn session_key() -> SessionKey {
    SessionKey::new(player(), dungeon_id())
}

pub fn hero_id(n: u8) -> HeroId {
    HeroId::from_bytes([n; 32])
}

/// 5x3 room: entrance (0,0), chest (1,0), portal (2,0), door (0,1), wall (3,1).
pub fn hall() -> DungeonMap {
    let mut grid = vec![TILE_FLOOR; 15];
    grid[5 + 3] = TILE_WALL;
    DungeonMap::from_layout(
        5,
        3,
        grid,
        DungeonPoint::new(0, 0),
        vec![DungeonPoint::new(1, 0)],
        vec![DungeonPoint::new(2, 0)],
        vec![DungeonPoint::new(0, 1)],
    )
    .expect("hall layout is valid")
}

pub fn dungeon() -> DungeonRecord {
    let layout = hall();
    DungeonRecord {
        id: dungeon_id(),
        status: DungeonStatus::Ready,
        seed: DUNGEON_SEED,
        width: layout.width(),
        height: layout.height(),
        layout: Some(layout),
    }
}

pub fn hero(owner: AuthorityKey, n: u8) -> HeroRecord {
    HeroRecord {
        id: hero_id(n),
        owner,
        class: HeroClass::Knight,
        level: 3,
        experience: 120,
        stats: HeroStats {
            max_hp: 90,
            attack: 60,
            defense: 35,
            magic: 30,
            resistance: 30,
            speed: 40,
            luck: 20,
        },
        stress: 10,
        stress_max: 100,
        positive_traits: [0; TRAIT_SLOTS],
        negative_traits: [0; TRAIT_SLOTS],
        burned: false,
        lock: HeroLock::default(),
    }
}

/// In-memory engine wiring with a dungeon and four of the player's heroes.
pub struct Fixture {
    pub adventures: Arc<Adventures>,
    pub store: Arc<InMemoryAdventureStore>,
    pub delegates: Arc<InMemoryDelegateStore>,
    pub clock: Arc<ManualClock>,
    pub notices: broadcast::Receiver<CommitNotice>,
}

impl Fixture {
    pub async fn seeded() -> Self {
        let store = Arc::new(InMemoryAdventureStore::new());
        store.put_dungeon(dungeon()).await.expect("seed dungeon");
        for n in 1..=4 {
            store.put_hero(hero(player(), n)).await.expect("seed hero");
        }
        let delegates = Arc::new(InMemoryDelegateStore::new());
        let (publisher, notices) = BroadcastPublisher::new(16);
        let adventures = Arc::new(Adventures::new(
            store.clone(),
            delegates.clone(),
            Arc::new(publisher),
            SessionGuards::new(),
        ));
        Self {
            adventures,
            store,
            delegates,
            clock: Arc::new(ManualClock::at(START_TIME)),
            notices,
        }
    }

    pub fn clock(&self) -> Arc<dyn ClockPort> {
        self.clock.clone()
    }
}

/// Seeded fixture with heroes 1 and 2 already inside.
pub async fn started_fixture() -> Fixture {
    let fixture = Fixture::seeded().await;
    crate::use_cases::session::StartSession::new(fixture.adventures.clone(), fixture.clock())
        .execute(player(), session_key(), &[hero_id(1), hero_id(2)], &[])
        .await
        .expect("start");
    fixture
}

/// Pace between the chest and the portal until the portal roll hits.
pub async fn walk_until_encounter(fixture: &Fixture) {
    walk_until_encounter_as(fixture, player()).await;
}

pub async fn walk_until_encounter_as(fixture: &Fixture, caller: AuthorityKey) {
    use deepdelve_domain::Direction;

    use crate::infrastructure::ports::DelegateStore;

    let moves = crate::use_cases::movement::MoveParty::new(fixture.adventures.clone());
    let session = match fixture.delegates.load(session_key()).await.expect("load copy") {
        Some(copy) => copy.session,
        None => fixture
            .store
            .load_session(session_key())
            .await
            .expect("load")
            .expect("session"),
    };
    // Line up on the chest tile; the portal is one step east of it.
    let lineup = match (session.party_position().x, session.party_position().y) {
        (0, 0) => Some(Direction::East),
        (2, 0) => Some(Direction::West),
        _ => None,
    };
    if let Some(step) = lineup {
        moves
            .execute(caller, session_key(), step)
            .await
            .expect("line up on chest");
    }
    for _ in 0..400 {
        let onto_portal = moves
            .execute(caller, session_key(), Direction::East)
            .await
            .expect("step onto portal");
        if onto_portal.encounter {
            return;
        }
        moves
            .execute(caller, session_key(), Direction::West)
            .await
            .expect("step back");
    }
    panic!("no encounter after 400 portal visits");
}

/// Attack the first living enemy with whoever is up (or defend when out of
/// action points) until the fight is decided.
pub async fn fight_until_resolved(
    fixture: &Fixture,
    caller: AuthorityKey,
) -> deepdelve_domain::CombatResolution {
    use deepdelve_domain::{CombatAction, DomainError, HeroAction, TargetSelector};

    use crate::infrastructure::ports::DelegateStore;
    use crate::use_cases::combat::{CombatError, SubmitCombatAction};

    let submit = SubmitCombatAction::new(fixture.adventures.clone(), fixture.clock());
    for _ in 0..500 {
        let combat = match fixture.delegates.load(session_key()).await.expect("load copy") {
            Some(copy) => copy.combat,
            None => fixture.store.load_combat(session_key()).await.expect("load"),
        }
        .expect("combat in progress");
        if combat.resolution().is_terminal() {
            return combat.resolution();
        }
        let hero = combat.current_hero().expect("hero turn");
        let target = combat
            .enemies()
            .iter()
            .position(|e| e.core.alive)
            .expect("living enemy") as u8;

        let attack = CombatAction {
            hero_index: hero,
            action: HeroAction::Attack,
            target: TargetSelector::Enemy(target),
            item: None,
        };
        match submit.execute(caller, session_key(), attack).await {
            Ok(_) => {}
            Err(CombatError::Domain(DomainError::InsufficientActionPoints { .. })) => {
                let defend = CombatAction {
                    action: HeroAction::Defend,
                    target: TargetSelector::None,
                    ..attack
                };
                submit
                    .execute(caller, session_key(), defend)
                    .await
                    .expect("defend");
            }
            Err(e) => panic!("combat action failed: {e}"),
        }
    }
    panic!("fight did not resolve after 500 actions");
}
