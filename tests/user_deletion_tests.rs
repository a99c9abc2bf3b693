// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Integration tests for account deletion.
//!
//! The HTTP tests run against the in-memory store. The Firestore test
//! requires the emulator to be running.
//! Run with: ./scripts/test-with-emulator.sh --test user_deletion_tests

mod common;

use axum::http::StatusCode;
use chrono::Utc;
use common::{create_test_app, seed_user, send, send_json, test_firestore_db};
use serde_json::json;
use workout_tracker::models::{Exercise, Folder, User, Workout};

#[tokio::test]
async fn test_delete_account_removes_all_records() {
    let (app, state) = create_test_app();
    let (alice, alice_token) = seed_user(&state, "alice").await;
    let (bob, bob_token) = seed_user(&state, "bob").await;

    for token in [&alice_token, &bob_token] {
        send_json(
            &app,
            "POST",
            "/api/folders",
            Some(token),
            Some(json!({"name": "Strength"})),
        )
        .await;
        send_json(
            &app,
            "POST",
            "/api/workouts/session",
            Some(token),
            Some(json!({"exercises": [
                {"name": "Bench", "reps": 10, "sets": 3},
                {"name": "Squat", "reps": 5, "sets": 5}
            ]})),
        )
        .await;
    }

    let response = send(&app, "DELETE", "/api/account", Some(&alice_token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(axum::http::header::SET_COOKIE)
        .map(|v| v.to_str().unwrap().to_string())
        .unwrap_or_default();
    assert!(set_cookie.starts_with("workout_token="));
    assert!(set_cookie.contains("Max-Age=0"));

    let body = common::body_json(response).await;
    assert_eq!(body["success"], true);
    // user + folder + workout + 2 exercises
    assert_eq!(body["deleted_records"], 5);

    assert!(state.db.get_user(&alice.id).await.unwrap().is_none());
    assert!(state.db.list_folders(&alice.id).await.unwrap().is_empty());
    let history = state.db.workout_history(&alice.id).await.unwrap();
    assert!(history.workouts.is_empty());
    assert!(history.exercises.is_empty());

    // Other users are untouched
    assert!(state.db.get_user(&bob.id).await.unwrap().is_some());
    let (_, stats) = send_json(&app, "GET", "/api/workouts/stats", Some(&bob_token), None).await;
    assert_eq!(stats["total_exercises"], 2);

    // The username is free again
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/register",
        None,
        Some(json!({"username": "alice", "password": "admin123"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_delete_account_twice_is_not_found() {
    let (app, state) = create_test_app();
    let (_, token) = seed_user(&state, "alice").await;

    let (status, _) = send_json(&app, "DELETE", "/api/account", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    // The token still verifies but the account is gone
    let (status, _) = send_json(&app, "DELETE", "/api/account", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_firestore_delete_user_data_removes_all_records() {
    require_emulator!();
    let db = test_firestore_db().await;
    let now = Utc::now();

    let user = User::new(
        &format!("delete-me-{}", uuid::Uuid::new_v4()),
        "hash".to_string(),
        now,
    );
    db.create_user(&user).await.unwrap();

    let folder = Folder::new(&user.id, "Strength", None, now);
    db.create_folder(&folder).await.unwrap();

    let workout = Workout::new(&user.id, "Leg Day", None, Some(folder.id.clone()), now);
    db.create_workout(&workout).await.unwrap();

    let exercise = Exercise {
        id: uuid::Uuid::new_v4().to_string(),
        workout_id: workout.id.clone(),
        user_id: user.id.clone(),
        name: "Squat".to_string(),
        sets: 5,
        reps: 5,
        weight: Some(225.0),
        rest_time: 90,
        notes: None,
        position: 0,
    };
    db.create_exercise(&exercise).await.unwrap();

    let deleted = db.delete_user_data(&user.id).await.unwrap();
    assert_eq!(deleted, 4);

    assert!(db.get_user(&user.id).await.unwrap().is_none());
    assert!(db
        .find_user_by_username(&user.username)
        .await
        .unwrap()
        .is_none());
    assert!(db.list_folders(&user.id).await.unwrap().is_empty());
    let history = db.workout_history(&user.id).await.unwrap();
    assert!(history.workouts.is_empty());
    assert!(history.exercises.is_empty());
}
