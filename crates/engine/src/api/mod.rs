//! API layer - turns protocol intents into use case calls.
//!
//! Keys arrive as hex strings and are parsed here; every failure, whether a
//! bad key or a rejected transition, comes back as an error response with a
//! stable code.

use deepdelve_domain::{
    AuthorityKey, CombatAction, DungeonId, HeroId, ItemKey, ItemSlot, SessionKey,
};
use deepdelve_shared::{Intent, IntentResponse, ItemSlotData, SessionRef};
use serde::Serialize;

use crate::app::App;
use crate::use_cases::{
    CombatError, DelegationError, InventoryError, MovementError, SessionError,
};

/// Run one intent to completion.
pub async fn dispatch(app: &App, intent: Intent) -> IntentResponse {
    let name = intent.name();
    let response = match route(app, intent).await {
        Ok(response) | Err(response) => response,
    };
    if let IntentResponse::Error(body) = &response {
        tracing::debug!(intent = name, code = %body.code, message = %body.message, "Intent rejected");
    }
    response
}

async fn route(app: &App, intent: Intent) -> Result<IntentResponse, IntentResponse> {
    let caller = parse_authority(intent.caller())?;
    let key = parse_session(intent.session())?;
    let use_cases = &app.use_cases;

    let response = match intent {
        Intent::StartSession { heroes, items, .. } => {
            let heroes = heroes
                .iter()
                .map(|id| parse_hero(id))
                .collect::<Result<Vec<_>, _>>()?;
            let items = parse_slots(&items)?;
            reply(
                use_cases
                    .session
                    .start
                    .execute(caller, key, &heroes, &items)
                    .await,
            )
        }
        Intent::ExitSession { .. } => reply(
            use_cases.session.exit.execute(caller, key).await,
        ),
        Intent::ResetSession { .. } => reply_empty(
            use_cases.session.reset.execute(caller, key).await,
        ),
        Intent::MoveHero { direction, .. } => reply(
            use_cases
                .movement
                .move_party
                .execute(caller, key, direction)
                .await,
        ),
        Intent::OpenChest { chest, .. } => reply(
            use_cases
                .inventory
                .open_chest
                .execute(caller, key, chest)
                .await,
        ),
        Intent::TakeLoot { take, drop, .. } => {
            let drops = parse_slots(&drop)?;
            reply(
                use_cases
                    .inventory
                    .take_loot
                    .execute(caller, key, &take, &drops)
                    .await,
            )
        }
        Intent::PickupItem {
            item_key, quantity, ..
        } => reply(
            use_cases
                .inventory
                .pickup
                .execute(caller, key, parse_item(item_key)?, quantity)
                .await,
        ),
        Intent::DropItem {
            item_key, quantity, ..
        } => reply(
            use_cases
                .inventory
                .drop
                .execute(caller, key, parse_item(item_key)?, quantity)
                .await,
        ),
        Intent::SwapItem {
            drop_key,
            drop_quantity,
            pickup_key,
            pickup_quantity,
            ..
        } => reply_empty(
            use_cases
                .inventory
                .swap
                .execute(
                    caller,
                    key,
                    (parse_item(drop_key)?, drop_quantity),
                    (parse_item(pickup_key)?, pickup_quantity),
                )
                .await,
        ),
        Intent::UseItem {
            item_key,
            hero_index,
            ..
        } => reply_empty(
            use_cases
                .inventory
                .use_item
                .execute(caller, key, parse_item(item_key)?, hero_index)
                .await,
        ),
        Intent::BeginEncounter { .. } => reply(
            use_cases.combat.begin.execute(caller, key).await,
        ),
        Intent::DeclineEncounter { .. } => reply_empty(
            use_cases.combat.decline.execute(caller, key).await,
        ),
        Intent::SubmitCombatAction {
            hero_index,
            action,
            target,
            item_key,
            ..
        } => {
            let item = item_key.map(parse_item).transpose()?;
            let action = CombatAction {
                hero_index,
                action,
                target,
                item,
            };
            reply(
                use_cases.combat.submit.execute(caller, key, action).await,
            )
        }
        Intent::ConcludeCombat { .. } => reply(
            use_cases.combat.conclude.execute(caller, key).await,
        ),
        Intent::SetDelegate { delegate, .. } => {
            let delegate = parse_authority(&delegate)?;
            reply_empty(
                use_cases
                    .delegation
                    .set_delegate
                    .execute(caller, key, delegate)
                    .await,
            )
        }
        Intent::Undelegate { .. } => reply(
            use_cases.delegation.undelegate.execute(caller, key).await,
        ),
    };
    Ok(response)
}

/// Use case errors that carry a stable code.
trait Coded: std::fmt::Display {
    fn code(&self) -> &'static str;
}

macro_rules! coded {
    ($($error:ty),* $(,)?) => {
        $(impl Coded for $error {
            fn code(&self) -> &'static str {
                <$error>::code(self)
            }
        })*
    };
}

coded!(
    SessionError,
    MovementError,
    CombatError,
    InventoryError,
    DelegationError,
);

fn error_response(error: &impl Coded) -> IntentResponse {
    IntentResponse::error(error.code(), error.to_string())
}

fn reply<T: Serialize, E: Coded>(result: Result<T, E>) -> IntentResponse {
    match result {
        Ok(data) => IntentResponse::success(data),
        Err(e) => error_response(&e),
    }
}

fn reply_empty<E: Coded>(result: Result<(), E>) -> IntentResponse {
    match result {
        Ok(()) => IntentResponse::success_empty(),
        Err(e) => error_response(&e),
    }
}

fn rejected(error: deepdelve_domain::DomainError) -> IntentResponse {
    IntentResponse::error(error.code(), error.to_string())
}

fn parse_authority(raw: &str) -> Result<AuthorityKey, IntentResponse> {
    AuthorityKey::from_hex(raw).map_err(rejected)
}

fn parse_hero(raw: &str) -> Result<HeroId, IntentResponse> {
    HeroId::from_hex(raw).map_err(rejected)
}

fn parse_session(session: &SessionRef) -> Result<SessionKey, IntentResponse> {
    let player = parse_authority(&session.player)?;
    let dungeon = DungeonId::from_hex(&session.dungeon).map_err(rejected)?;
    Ok(SessionKey::new(player, dungeon))
}

fn parse_item(raw: u8) -> Result<ItemKey, IntentResponse> {
    ItemKey::try_from(raw).map_err(rejected)
}

fn parse_slots(slots: &[ItemSlotData]) -> Result<Vec<ItemSlot>, IntentResponse> {
    slots
        .iter()
        .map(|slot| ItemSlot::from_raw(slot.item_key, slot.quantity).map_err(rejected))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{dungeon_id, hero_id, player};

    fn session_ref() -> SessionRef {
        SessionRef {
            player: player().to_hex(),
            dungeon: dungeon_id().to_hex(),
        }
    }

    mod parsing {
        use super::*;

        #[test]
        fn short_key_is_invalid_key() {
            let err = parse_authority("abcd").unwrap_err();
            assert_eq!(err.error_code(), Some("INVALID_KEY"));
        }

        #[test]
        fn unknown_item_key_is_rejected() {
            let err = parse_item(42).unwrap_err();
            assert_eq!(err.error_code(), Some("INVALID_ITEM_KEY"));
        }

        #[test]
        fn zero_quantity_slot_is_rejected() {
            let err = parse_slots(&[ItemSlotData {
                item_key: 3,
                quantity: 0,
            }])
            .unwrap_err();
            assert_eq!(err.error_code(), Some("INVALID_ITEM_QUANTITY"));
        }

        #[test]
        fn session_ref_parses_both_keys() {
            let key = parse_session(&session_ref()).unwrap();
            assert_eq!(key.player, player());
            assert_eq!(key.dungeon, dungeon_id());
        }
    }

    mod dispatching {
        use super::*;
        use crate::app::App;
use crate::use_cases::{
    CombatError, DelegationError, InventoryError, MovementError, SessionError,
};
        use crate::infrastructure::clock::FixedClock;
        use crate::infrastructure::ports::AdventureStore;
        use crate::test_fixtures::{dungeon, hero};
        use deepdelve_shared::Direction;
        use std::sync::Arc;

        async fn app() -> App {
            let (app, _notices) = App::in_memory(
                16,
                Arc::new(FixedClock(chrono::Utc::now())),
            );
            app.repositories.adventures.put_dungeon(dungeon()).await.unwrap();
            app.repositories
                .adventures
                .put_hero(hero(player(), 1))
                .await
                .unwrap();
            app
        }

        #[tokio::test]
        async fn start_then_move_returns_data() {
            let app = app().await;

            let started = dispatch(
                &app,
                Intent::StartSession {
                    caller: player().to_hex(),
                    session: session_ref(),
                    heroes: vec![hero_id(1).to_hex()],
                    items: vec![],
                },
            )
            .await;
            assert!(started.is_success());

            let moved = dispatch(
                &app,
                Intent::MoveHero {
                    caller: player().to_hex(),
                    session: session_ref(),
                    direction: Direction::East,
                },
            )
            .await;
            match moved {
                IntentResponse::Success { data: Some(data) } => {
                    assert_eq!(data["position"]["x"], 1);
                    assert_eq!(data["encounter"], false);
                }
                other => panic!("unexpected response {other:?}"),
            }
        }

        #[tokio::test]
        async fn domain_rejection_becomes_error_body() {
            let app = app().await;

            let response = dispatch(
                &app,
                Intent::ResetSession {
                    caller: player().to_hex(),
                    session: session_ref(),
                },
            )
            .await;

            assert_eq!(response.error_code(), Some("SESSION_NOT_FOUND"));
        }

        #[tokio::test]
        async fn bad_caller_key_is_rejected_before_any_work() {
            let app = app().await;

            let response = dispatch(
                &app,
                Intent::ExitSession {
                    caller: "zz".into(),
                    session: session_ref(),
                },
            )
            .await;

            assert_eq!(response.error_code(), Some("INVALID_KEY"));
        }
    }
}
