// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API input validation tests.
//!
//! Rejections carry a stable `details` string naming the first bad field.

use axum::http::StatusCode;
use serde_json::{json, Value};

mod common;

fn swim(pool_length_m: Value) -> Value {
    json!({
        "id": "swim-20250310",
        "startedAt": "2025-03-10T07:30:00Z",
        "sport": "swim",
        "durationMin": 45,
        "details": {"distanceM": 1500, "poolLengthM": pool_length_m},
    })
}

#[tokio::test]
async fn test_malformed_json_body() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("athlete", &state);

    for (method, uri) in [
        ("POST", "/api/workouts"),
        ("PUT", "/api/plans"),
        ("POST", "/api/routines"),
        ("PUT", "/api/goal"),
    ] {
        let (status, body) = common::send_raw(&app, method, uri, &token, "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri}");
        assert_eq!(body, json!({"error": "bad_request", "details": "Invalid JSON"}));
    }
}

#[tokio::test]
async fn test_non_object_body() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("athlete", &state);

    for raw in ["[1,2,3]", "\"goal\"", "42", "null"] {
        let (status, body) = common::send_raw(&app, "POST", "/api/plans", &token, raw).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{raw}");
        assert_eq!(body["details"], "Invalid JSON");
    }
}

#[tokio::test]
async fn test_workout_rejections() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("athlete", &state);

    let cases = [
        (swim(json!(33)), "Invalid details.poolLengthM"),
        (
            json!({"id": "short", "startedAt": "2025-03-10T07:30:00Z", "sport": "run"}),
            "Invalid id",
        ),
        (
            json!({"id": "run-20250310", "startedAt": "yesterday", "sport": "run"}),
            "Invalid startedAt",
        ),
        (
            json!({"id": "run-20250310", "startedAt": "2025-03-10T07:30:00Z", "sport": "rowing"}),
            "Invalid sport",
        ),
        (
            json!({
                "id": "run-20250310",
                "startedAt": "2025-03-10T07:30:00Z",
                "sport": "run",
                "durationMin": 30,
                "rpe": 11,
                "details": {"distanceKm": 5},
            }),
            "Invalid rpe",
        ),
    ];

    for (input, details) in cases {
        let (status, body) =
            common::send(&app, "POST", "/api/workouts", Some(&token), Some(input)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{details}");
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["details"], details);
    }

    // Nothing was stored
    let (_, body) = common::send(&app, "GET", "/api/workouts", Some(&token), None).await;
    assert_eq!(body, json!({"workouts": []}));
}

#[tokio::test]
async fn test_workout_create_and_duplicate() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("athlete", &state);

    let (status, body) =
        common::send(&app, "POST", "/api/workouts", Some(&token), Some(swim(json!(25)))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["ok"], true);
    assert_eq!(body["workout"]["startedAt"], "2025-03-10T07:30:00.000Z");
    assert_eq!(body["workout"]["details"]["poolLengthM"], 25);

    let (status, body) =
        common::send(&app, "POST", "/api/workouts", Some(&token), Some(swim(json!(50)))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["details"], "Workout already exists");
}

#[tokio::test]
async fn test_goal_validation() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("athlete", &state);

    let (status, body) = common::send(
        &app,
        "PUT",
        "/api/goal",
        Some(&token),
        Some(json!({"text": "   "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"], "Goal is empty");

    let (status, body) = common::send(
        &app,
        "PUT",
        "/api/goal",
        Some(&token),
        Some(json!({"text": 12})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"], "Invalid text");

    let (status, body) = common::send(
        &app,
        "PUT",
        "/api/goal",
        Some(&token),
        Some(json!({"text": "  Sub-20 5k by June "})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["goal"]["text"], "Sub-20 5k by June");

    let (_, body) = common::send(&app, "GET", "/api/goal", Some(&token), None).await;
    assert_eq!(body["goal"]["text"], "Sub-20 5k by June");
}

#[tokio::test]
async fn test_routine_rejections() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("athlete", &state);

    let base = json!({
        "id": "routine-swim",
        "sport": "swim",
        "weekday": 3,
        "timeLocal": "07:15",
    });

    for (key, value, details) in [
        ("sport", json!("strength"), "Invalid sport"),
        ("weekday", json!(8), "Invalid weekday"),
        ("weekday", json!(2.5), "Invalid weekday"),
        ("timeLocal", json!("24:00"), "Invalid timeLocal"),
        ("timeLocal", json!("7:15"), "Invalid timeLocal"),
        ("isEnabled", json!("yes"), "Invalid isEnabled"),
    ] {
        let mut input = base.clone();
        input[key] = value;
        let (status, body) =
            common::send(&app, "POST", "/api/routines", Some(&token), Some(input)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{key}");
        assert_eq!(body["details"], details, "{key}");
    }
}
