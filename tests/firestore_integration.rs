// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running and
//! FIRESTORE_EMULATOR_HOST pointing at it; otherwise they are skipped.
//!
//! Keys carry a per-test suffix so runs against a shared emulator don't
//! collide.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use serde_json::json;
use training_journal::db::{Journal, SortedStore};
use training_journal::models::UserGoal;
use training_journal::services::{plans, routines};

mod common;
use common::test_store;

fn unique(prefix: &str) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{prefix}-{nanos}")
}

// ═══════════════════════════════════════════════════════════════════════════
// SORTED SET PRIMITIVES
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_sorted_set_ordering() {
    require_emulator!();

    let store = test_store().await;
    let key = unique("sorted");

    store.add(&key, 10, "a").await.unwrap();
    store.add(&key, 30, "c").await.unwrap();
    store.add(&key, 20, "b").await.unwrap();

    assert_eq!(store.range_rev(&key, 0, 9).await.unwrap(), ["c", "b", "a"]);
    assert_eq!(store.range_rev(&key, 1, 1).await.unwrap(), ["b"]);
    assert_eq!(store.range_by_score(&key, 20).await.unwrap(), ["b"]);

    assert!(store.remove(&key, "b").await.unwrap());
    assert!(!store.remove(&key, "b").await.unwrap());
    assert_eq!(store.range_rev(&key, 0, 9).await.unwrap(), ["c", "a"]);
}

#[tokio::test]
async fn test_replace_is_compare_and_swap() {
    require_emulator!();

    let store = test_store().await;
    let key = unique("cas");

    store.add(&key, 1, "v1").await.unwrap();
    assert!(store.replace(&key, "v1", 2, "v2").await.unwrap());
    // Stale expected member
    assert!(!store.replace(&key, "v1", 3, "v3").await.unwrap());
    assert_eq!(store.range_rev(&key, 0, 9).await.unwrap(), ["v2"]);
}

#[tokio::test]
async fn test_concurrent_replace_has_one_winner() {
    require_emulator!();

    let store = test_store().await;
    let key = unique("cas-race");
    store.add(&key, 1, "planned").await.unwrap();

    let (a, b) = tokio::join!(
        store.replace(&key, "planned", 1, "canceled"),
        store.replace(&key, "planned", 1, "done"),
    );
    let wins = [a, b]
        .into_iter()
        .filter(|result| matches!(result, Ok(true)))
        .count();
    assert_eq!(wins, 1);

    let members = store.range_by_score(&key, 1).await.unwrap();
    assert_eq!(members.len(), 1, "{members:?}");
    assert!(members[0] == "canceled" || members[0] == "done");
}

#[tokio::test]
async fn test_index_and_values() {
    require_emulator!();

    let store = test_store().await;
    let key = unique("index");

    assert_eq!(store.index_get(&key, "plan-0001").await.unwrap(), None);
    store.index_set(&key, "plan-0001", 42).await.unwrap();
    assert_eq!(store.index_get(&key, "plan-0001").await.unwrap(), Some(42));
    store.index_remove(&key, "plan-0001").await.unwrap();
    assert_eq!(store.index_get(&key, "plan-0001").await.unwrap(), None);

    assert_eq!(store.get(&key).await.unwrap(), None);
    store.set(&key, "{\"text\":\"x\"}").await.unwrap();
    assert_eq!(store.get(&key).await.unwrap().as_deref(), Some("{\"text\":\"x\"}"));
}

// ═══════════════════════════════════════════════════════════════════════════
// JOURNAL
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_plan_lifecycle_on_firestore() {
    require_emulator!();

    let store: Arc<dyn SortedStore> = Arc::new(test_store().await);
    let journal = Journal::new(store, unique("athlete"));
    let now = Utc.with_ymd_and_hms(2025, 3, 8, 9, 0, 0).unwrap();

    plans::create_plan(
        &journal,
        &json!({
            "id": "plan-firestore",
            "plannedFor": "2025-03-10T17:00:00Z",
            "exercises": [{"name": "Deadlift", "sets": [{"reps": 5, "weightKg": 100}]}],
        }),
        now,
    )
    .await
    .unwrap();

    let outcome = plans::apply_action(&journal, "plan-firestore", plans::PlanAction::Complete, now)
        .await
        .unwrap();
    assert!(outcome.workout.is_some());

    let again = plans::apply_action(&journal, "plan-firestore", plans::PlanAction::Complete, now)
        .await
        .unwrap();
    assert!(again.workout.is_none());

    let listed = plans::list_plans(&journal, 30).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].is_done());
}

#[tokio::test]
async fn test_materialize_on_firestore() {
    require_emulator!();

    let store: Arc<dyn SortedStore> = Arc::new(test_store().await);
    let journal = Journal::new(store, unique("athlete"));
    let now = Utc.with_ymd_and_hms(2025, 6, 4, 12, 0, 0).unwrap();

    routines::create_routine(
        &journal,
        &json!({"id": "routine-swim", "sport": "swim", "weekday": 3, "timeLocal": "07:15"}),
        now,
    )
    .await
    .unwrap();

    let first = routines::materialize_week(&journal, &chrono_tz::Europe::Paris, now)
        .await
        .unwrap();
    assert_eq!(first.week_monday, "2025-06-02");
    assert_eq!(first.created_count, 1);

    let second = routines::materialize_week(&journal, &chrono_tz::Europe::Paris, now)
        .await
        .unwrap();
    assert_eq!(second.created_count, 0);
}

#[tokio::test]
async fn test_goal_on_firestore() {
    require_emulator!();

    let store: Arc<dyn SortedStore> = Arc::new(test_store().await);
    let journal = Journal::new(store, unique("athlete"));

    assert_eq!(journal.get_goal().await.unwrap(), None);

    let goal = UserGoal {
        text: "Swim 2k without stopping".to_string(),
        updated_at: "2025-03-08T09:00:00.000Z".to_string(),
    };
    journal.set_goal(&goal).await.unwrap();
    assert_eq!(journal.get_goal().await.unwrap(), Some(goal));
}
