//! End-to-end hold and confirmation behavior against a real SQLite pool

mod common;

use chrono::{Duration, Utc};
use common::{seed_restaurant, seed_slot, setup};
use serde_json::json;
use tabled_server::booking::{BookingError, EffectiveStatus, RemainingCapacity, availability};
use tabled_server::db::models::{BookingStatus, HoldStatus};
use tabled_server::db::repository::{BookingRepository, HoldRepository};

#[tokio::test]
async fn holds_consume_capacity_until_full() {
    let env = setup().await;
    let restaurant = seed_restaurant(&env).await;
    let slot = seed_slot(&env, restaurant, 10, 1, 8).await;
    let manager = env.state.hold_manager();
    let now = Utc::now();

    manager
        .create_hold(slot.id, 8, json!({}), now)
        .await
        .expect("first hold fits");

    let snapshot = availability::slot_availability(env.state.pool(), slot.id, now)
        .await
        .expect("snapshot");
    assert_eq!(snapshot.remaining, RemainingCapacity::Finite(2));
    assert_eq!(snapshot.effective_status, EffectiveStatus::Open);

    // 3 > 2 remaining
    let err = manager
        .create_hold(slot.id, 3, json!({}), now)
        .await
        .expect_err("overcommit rejected");
    assert!(matches!(err, BookingError::CapacityExceeded { .. }));

    manager
        .create_hold(slot.id, 2, json!({}), now)
        .await
        .expect("exact fit accepted");

    let snapshot = availability::slot_availability(env.state.pool(), slot.id, now)
        .await
        .expect("snapshot");
    assert_eq!(snapshot.remaining, RemainingCapacity::Finite(0));
    assert_eq!(snapshot.effective_status, EffectiveStatus::Full);
}

#[tokio::test]
async fn party_size_bounds_are_enforced() {
    let env = setup().await;
    let restaurant = seed_restaurant(&env).await;
    let slot = seed_slot(&env, restaurant, 10, 2, 6).await;
    let manager = env.state.hold_manager();
    let now = Utc::now();

    let err = manager
        .create_hold(slot.id, 1, json!({}), now)
        .await
        .expect_err("below minimum");
    assert!(matches!(err, BookingError::PartySizeOutOfRange { .. }));

    let err = manager
        .create_hold(slot.id, 7, json!({}), now)
        .await
        .expect_err("above maximum");
    assert!(matches!(err, BookingError::PartySizeOutOfRange { .. }));
}

#[tokio::test]
async fn unlimited_slot_never_fills() {
    let env = setup().await;
    let restaurant = seed_restaurant(&env).await;
    let slot = seed_slot(&env, restaurant, 0, 1, 20).await;
    let manager = env.state.hold_manager();
    let now = Utc::now();

    for _ in 0..5 {
        manager
            .create_hold(slot.id, 20, json!({}), now)
            .await
            .expect("unlimited always accepts");
    }

    let snapshot = availability::slot_availability(env.state.pool(), slot.id, now)
        .await
        .expect("snapshot");
    assert_eq!(snapshot.remaining, RemainingCapacity::Unlimited);
    assert_eq!(snapshot.effective_status, EffectiveStatus::Open);
}

#[tokio::test]
async fn release_frees_capacity() {
    let env = setup().await;
    let restaurant = seed_restaurant(&env).await;
    let slot = seed_slot(&env, restaurant, 4, 1, 4).await;
    let manager = env.state.hold_manager();
    let now = Utc::now();

    let hold = manager
        .create_hold(slot.id, 4, json!({}), now)
        .await
        .expect("fills the slot");

    let err = manager
        .create_hold(slot.id, 1, json!({}), now)
        .await
        .expect_err("slot is full");
    assert!(matches!(err, BookingError::SlotNotOpen { .. }));

    manager.release_hold(&hold.hold_id).await.expect("release");
    // releasing again is a no-op, not an error
    manager.release_hold(&hold.hold_id).await.expect("idempotent");

    manager
        .create_hold(slot.id, 4, json!({}), now)
        .await
        .expect("capacity came back");
}

#[tokio::test]
async fn confirm_produces_exactly_one_booking() {
    let env = setup().await;
    let restaurant = seed_restaurant(&env).await;
    let slot = seed_slot(&env, restaurant, 10, 1, 8).await;
    let now = Utc::now();

    let hold = env
        .state
        .hold_manager()
        .create_hold(slot.id, 4, json!({"name": "Ada"}), now)
        .await
        .expect("hold");

    let confirmer = env.state.booking_confirmer();
    let booking = confirmer.confirm(&hold.hold_id, now).await.expect("confirm");

    assert_eq!(booking.status, BookingStatus::Confirmed);
    assert_eq!(booking.party_size, 4);
    assert_eq!(booking.restaurant_id, restaurant);
    assert_eq!(booking.booking_time, slot.start_instant());
    assert_eq!(booking.code.len(), 8);

    // second confirm fails without creating another booking
    let err = confirmer
        .confirm(&hold.hold_id, now)
        .await
        .expect_err("already confirmed");
    assert!(matches!(err, BookingError::HoldNotActive { .. }));

    let bookings = BookingRepository::new(env.state.pool().clone())
        .find_for_slot(slot.id)
        .await
        .expect("list bookings");
    assert_eq!(bookings.len(), 1);

    // the hold carries the booking id and sits in its terminal state
    let hold = HoldRepository::new(env.state.pool().clone())
        .find_by_id(&hold.hold_id)
        .await
        .expect("fetch hold")
        .expect("hold exists");
    assert_eq!(hold.status, HoldStatus::Confirmed);
    assert_eq!(hold.contact.0["booking_id"], serde_json::json!(booking.id));
    assert_eq!(hold.contact.0["name"], serde_json::json!("Ada"));
}

#[tokio::test]
async fn confirmed_booking_keeps_counting_against_capacity() {
    let env = setup().await;
    let restaurant = seed_restaurant(&env).await;
    let slot = seed_slot(&env, restaurant, 10, 1, 8).await;
    let manager = env.state.hold_manager();
    let now = Utc::now();

    let hold = manager
        .create_hold(slot.id, 6, json!({}), now)
        .await
        .expect("hold");
    env.state
        .booking_confirmer()
        .confirm(&hold.hold_id, now)
        .await
        .expect("confirm");

    // 6 confirmed, 4 left; holds and bookings share the same budget
    let err = manager
        .create_hold(slot.id, 5, json!({}), now)
        .await
        .expect_err("only 4 left");
    assert!(matches!(err, BookingError::CapacityExceeded { .. }));

    manager
        .create_hold(slot.id, 4, json!({}), now)
        .await
        .expect("remainder fits");
}

#[tokio::test]
async fn expired_hold_releases_capacity_and_cannot_confirm() {
    let env = setup().await;
    let restaurant = seed_restaurant(&env).await;
    let slot = seed_slot(&env, restaurant, 4, 1, 4).await;
    let manager = env.state.hold_manager();
    let now = Utc::now();

    let hold = manager
        .create_hold(slot.id, 4, json!({}), now)
        .await
        .expect("hold");

    // past the 10 minute TTL
    let later = now + Duration::minutes(11);
    assert!(!hold.counts_at(later));

    let snapshot = availability::slot_availability(env.state.pool(), slot.id, later)
        .await
        .expect("snapshot");
    assert_eq!(snapshot.remaining, RemainingCapacity::Finite(4));

    let err = env
        .state
        .booking_confirmer()
        .confirm(&hold.hold_id, later)
        .await
        .expect_err("too late");
    assert!(matches!(err, BookingError::HoldExpired(_)));

    // the confirm attempt relabeled the hold; expiry is terminal
    let stored = HoldRepository::new(env.state.pool().clone())
        .find_by_id(&hold.hold_id)
        .await
        .expect("fetch")
        .expect("exists");
    assert_eq!(stored.status, HoldStatus::Expired);

    let err = env
        .state
        .booking_confirmer()
        .confirm(&hold.hold_id, later)
        .await
        .expect_err("still expired");
    assert!(matches!(err, BookingError::HoldExpired(_)));
}

#[tokio::test]
async fn lazy_expiry_relabels_only_overdue_holds() {
    let env = setup().await;
    let restaurant = seed_restaurant(&env).await;
    let slot = seed_slot(&env, restaurant, 10, 1, 8).await;
    let manager = env.state.hold_manager();
    let now = Utc::now();

    let hold = manager
        .create_hold(slot.id, 2, json!({}), now)
        .await
        .expect("hold");

    // still inside the TTL: untouched
    let fresh = manager
        .expire_if_needed(hold.clone(), now + Duration::minutes(5))
        .await
        .expect("check");
    assert_eq!(fresh.status, HoldStatus::Active);

    let stale = manager
        .expire_if_needed(fresh, now + Duration::minutes(11))
        .await
        .expect("check");
    assert_eq!(stale.status, HoldStatus::Expired);

    let stored = HoldRepository::new(env.state.pool().clone())
        .find_by_id(&hold.hold_id)
        .await
        .expect("fetch")
        .expect("exists");
    assert_eq!(stored.status, HoldStatus::Expired);
}

#[tokio::test]
async fn janitor_relabels_stale_holds() {
    let env = setup().await;
    let restaurant = seed_restaurant(&env).await;
    let slot = seed_slot(&env, restaurant, 10, 1, 8).await;
    let manager = env.state.hold_manager();
    let now = Utc::now();

    let hold = manager
        .create_hold(slot.id, 2, json!({}), now)
        .await
        .expect("hold");

    let relabeled = manager
        .expire_due(now + Duration::minutes(11))
        .await
        .expect("sweep");
    assert_eq!(relabeled, 1);

    let stored = HoldRepository::new(env.state.pool().clone())
        .find_by_id(&hold.hold_id)
        .await
        .expect("fetch")
        .expect("exists");
    assert_eq!(stored.status, HoldStatus::Expired);

    // a second sweep finds nothing
    let relabeled = manager
        .expire_due(now + Duration::minutes(12))
        .await
        .expect("sweep");
    assert_eq!(relabeled, 0);
}

#[tokio::test]
async fn concurrent_holds_never_oversell() {
    let env = setup().await;
    let restaurant = seed_restaurant(&env).await;
    let slot = seed_slot(&env, restaurant, 10, 1, 8).await;
    let now = Utc::now();

    // 6 + 6 > 10: at most one of these can win
    let m1 = env.state.hold_manager();
    let m2 = env.state.hold_manager();
    let (a, b) = tokio::join!(
        m1.create_hold(slot.id, 6, json!({}), now),
        m2.create_hold(slot.id, 6, json!({}), now),
    );

    let winners = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(winners, 1, "exactly one concurrent hold may succeed");

    let snapshot = availability::slot_availability(env.state.pool(), slot.id, now)
        .await
        .expect("snapshot");
    assert_eq!(snapshot.remaining, RemainingCapacity::Finite(4));
}

#[tokio::test]
async fn hold_on_missing_slot_is_not_found() {
    let env = setup().await;
    let err = env
        .state
        .hold_manager()
        .create_hold(4242, 2, json!({}), Utc::now())
        .await
        .expect_err("no such slot");
    assert!(matches!(err, BookingError::SlotNotFound(4242)));

    let err = env
        .state
        .booking_confirmer()
        .confirm("missing-token", Utc::now())
        .await
        .expect_err("no such hold");
    assert!(matches!(err, BookingError::HoldNotFound(_)));
}
