// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Statistics and progress aggregates over stored history.

mod common;

use axum::http::StatusCode;
use chrono::{TimeZone, Utc};
use common::{create_test_app, seed_user, send_json};
use workout_tracker::models::{Exercise, Workout};
use workout_tracker::AppState;

async fn store_workout(state: &AppState, user_id: &str, id: &str, day: u32) -> Workout {
    let mut workout = Workout::new(
        user_id,
        &format!("Workout {}", id),
        None,
        None,
        Utc.with_ymd_and_hms(2025, 3, day, 9, 0, 0).unwrap(),
    );
    workout.id = id.to_string();
    state.db.create_workout(&workout).await.unwrap();
    workout
}

async fn store_exercise(
    state: &AppState,
    workout: &Workout,
    name: &str,
    position: u32,
    (sets, reps): (u32, u32),
    weight: Option<f64>,
) {
    let exercise = Exercise {
        id: format!("{}-{}", workout.id, position),
        workout_id: workout.id.clone(),
        user_id: workout.user_id.clone(),
        name: name.to_string(),
        sets,
        reps,
        weight,
        rest_time: 60,
        notes: None,
        position,
    };
    state.db.create_exercise(&exercise).await.unwrap();
}

#[tokio::test]
async fn test_stats_totals() {
    let (app, state) = create_test_app();
    let (user, token) = seed_user(&state, "alice").await;

    let w1 = store_workout(&state, &user.id, "w1", 10).await;
    let w2 = store_workout(&state, &user.id, "w2", 20).await;
    store_exercise(&state, &w1, "Bench", 0, (3, 10), Some(135.0)).await;
    store_exercise(&state, &w1, "Squat", 1, (4, 8), Some(185.0)).await;
    store_exercise(&state, &w2, "Bench", 0, (5, 5), None).await;

    let (status, stats) = send_json(&app, "GET", "/api/workouts/stats", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_workouts"], 2);
    assert_eq!(stats["total_exercises"], 3);
    assert_eq!(stats["total_reps"], 87);
    assert_eq!(
        stats["last_workout"],
        serde_json::to_value(w2.date).unwrap()
    );

    // Reads never change the answer
    let (_, again) = send_json(&app, "GET", "/api/workouts/stats", Some(&token), None).await;
    assert_eq!(stats, again);
}

#[tokio::test]
async fn test_stats_for_new_user_are_zero() {
    let (app, state) = create_test_app();
    let (_, token) = seed_user(&state, "newbie").await;

    let (status, stats) = send_json(&app, "GET", "/api/workouts/stats", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_workouts"], 0);
    assert_eq!(stats["total_exercises"], 0);
    assert_eq!(stats["total_reps"], 0);
    assert!(stats["last_workout"].is_null());
}

#[tokio::test]
async fn test_stats_are_per_user() {
    let (app, state) = create_test_app();
    let (alice, _) = seed_user(&state, "alice").await;
    let (_, bob_token) = seed_user(&state, "bob").await;

    let w1 = store_workout(&state, &alice.id, "w1", 1).await;
    store_exercise(&state, &w1, "Bench", 0, (3, 10), None).await;

    let (_, stats) = send_json(&app, "GET", "/api/workouts/stats", Some(&bob_token), None).await;
    assert_eq!(stats["total_workouts"], 0);
    assert_eq!(stats["total_reps"], 0);
}

#[tokio::test]
async fn test_progress_groups_by_exercise_oldest_first() {
    let (app, state) = create_test_app();
    let (user, token) = seed_user(&state, "alice").await;

    let early = store_workout(&state, &user.id, "early", 1).await;
    let late = store_workout(&state, &user.id, "late", 15).await;
    store_exercise(&state, &early, "Bench", 0, (3, 10), Some(135.0)).await;
    store_exercise(&state, &late, "Bench", 0, (3, 8), Some(155.0)).await;
    store_exercise(&state, &late, "Pull-up", 1, (3, 6), None).await;

    let (status, progress) =
        send_json(&app, "GET", "/api/workouts/progress", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let series = progress.as_array().unwrap();
    assert_eq!(series.len(), 2);

    // History is newest first, so "Bench" is seen before "Pull-up"
    assert_eq!(series[0]["exercise"], "Bench");
    let weights: Vec<f64> = series[0]["points"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["weight"].as_f64().unwrap())
        .collect();
    assert_eq!(weights, vec![135.0, 155.0]);

    assert_eq!(series[1]["exercise"], "Pull-up");
    assert_eq!(series[1]["points"][0]["weight"], 0.0);
}
