//! Encounter scenarios: roll on a portal, fight it out, conclude.

use deepdelve_domain::{CombatResolution, Direction};
use deepdelve_shared::Intent;

use super::*;
use crate::test_fixtures::player;

#[tokio::test]
async fn test_encounter_is_fought_concluded_and_carried_home() {
    let ctx = E2EContext::setup().await;
    ctx.expect_ok(start(player(), &[1, 2], &[])).await;
    ctx.walk_until_encounter(player()).await;
    assert!(ctx.canonical().await.pending_encounter_seed().is_some());

    ctx.expect_ok(begin(player())).await;
    assert!(ctx.canonical().await.in_combat());
    assert_eq!(
        ctx.expect_code(step(player(), Direction::West)).await,
        "MOVEMENT_BLOCKED_IN_COMBAT"
    );
    assert_eq!(
        ctx.expect_code(begin(player())).await,
        "COMBAT_ALREADY_ACTIVE"
    );
    let opening = ctx.live_combat().await.expect("combat stored");
    if !opening.resolution().is_terminal() {
        assert_eq!(
            ctx.expect_code(conclude(player())).await,
            "COMBAT_NOT_RESOLVED"
        );
    }

    let resolution = ctx.fight(player()).await;
    assert!(resolution.is_terminal());

    let outcome = ctx.expect_ok(conclude(player())).await;
    assert_eq!(
        outcome["resolution"],
        serde_json::to_value(resolution).unwrap()
    );
    assert_eq!(
        ctx.expect_code(conclude(player())).await,
        "COMBAT_NOT_ACTIVE"
    );

    let session = ctx.canonical().await;
    assert!(!session.in_combat());
    assert!(session.pending_encounter_seed().is_none());
    assert!(ctx.live_combat().await.is_none());
    assert_eq!(
        outcome["lootSlots"].as_u64(),
        Some(session.pending_loot().slots().len() as u64)
    );

    // The fight ended where it started: on the portal.
    ctx.expect_ok(exit(player())).await;
    let heroes = ctx.heroes(&[1, 2]).await;
    assert!(heroes.iter().all(|h| !h.lock.is_active));
    let awarded = outcome["experienceAwarded"].as_u64().unwrap_or_default();
    if resolution == CombatResolution::Victory && awarded > 0 {
        assert!(heroes.iter().any(|h| h.experience > 120));
    }
}

#[tokio::test]
async fn test_declined_encounter_lets_the_party_walk_on() {
    let ctx = E2EContext::setup().await;
    ctx.expect_ok(start(player(), &[1], &[])).await;
    ctx.walk_until_encounter(player()).await;

    ctx.expect_ok(Intent::DeclineEncounter {
        caller: player().to_hex(),
        session: session_ref(),
    })
    .await;

    assert_eq!(
        ctx.expect_code(begin(player())).await,
        "NO_PENDING_ENCOUNTER"
    );
    let moved = ctx.expect_ok(step(player(), Direction::East)).await;
    assert_eq!(moved["position"]["x"], 3);
}

#[tokio::test]
async fn test_only_the_session_owner_may_act_in_combat() {
    let ctx = E2EContext::setup().await;
    ctx.expect_ok(start(player(), &[1, 2], &[])).await;
    ctx.walk_until_encounter(player()).await;
    ctx.expect_ok(begin(player())).await;

    let combat = ctx.live_combat().await.expect("combat stored");
    if let Some(hero_index) = combat.current_hero() {
        let code = ctx
            .expect_code(act(
                crate::test_fixtures::stranger(),
                hero_index,
                deepdelve_domain::HeroAction::Defend,
                deepdelve_domain::TargetSelector::None,
            ))
            .await;
        assert_eq!(code, "UNAUTHORIZED");
    }
    assert_eq!(
        ctx.expect_code(conclude(crate::test_fixtures::stranger()))
            .await,
        "UNAUTHORIZED"
    );
}
