// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running.
//! Run with: ./scripts/test-with-emulator.sh
//!
//! The emulator provides a clean state for each test run. Every test uses
//! a fresh user so tests do not see each other's documents.

use chrono::{TimeZone, Utc};
use workout_tracker::db::Database;
use workout_tracker::error::AppError;
use workout_tracker::models::{Exercise, Folder, User, UserStats, Workout};

mod common;
use common::test_firestore_db;

/// Helper to create and store a test user with a unique username.
async fn test_user(db: &Database) -> User {
    let user = User::new(
        &format!("user-{}", uuid::Uuid::new_v4()),
        "hash".to_string(),
        Utc::now(),
    );
    db.create_user(&user).await.unwrap();
    user
}

fn test_exercise(workout: &Workout, name: &str, position: u32, sets: u32, reps: u32) -> Exercise {
    Exercise {
        id: uuid::Uuid::new_v4().to_string(),
        workout_id: workout.id.clone(),
        user_id: workout.user_id.clone(),
        name: name.to_string(),
        sets,
        reps,
        weight: Some(100.0),
        rest_time: 60,
        notes: None,
        position,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// USER TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_new_user_creation() {
    require_emulator!();

    let db = test_firestore_db().await;
    let user = test_user(&db).await;

    let fetched = db.get_user(&user.id).await.unwrap().expect("user exists");
    assert_eq!(fetched.username, user.username);
    assert_eq!(fetched.password_hash, "hash");

    let by_name = db
        .find_user_by_username(&user.username)
        .await
        .unwrap()
        .expect("user found by name");
    assert_eq!(by_name.id, user.id);
}

#[tokio::test]
async fn test_duplicate_username_conflicts() {
    require_emulator!();

    let db = test_firestore_db().await;
    let user = test_user(&db).await;

    let clash = User::new(&user.username, "other".to_string(), Utc::now());
    let result = db.create_user(&clash).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

// ═══════════════════════════════════════════════════════════════════════════
// WORKOUT TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_workout_history_and_stats() {
    require_emulator!();

    let db = test_firestore_db().await;
    let user = test_user(&db).await;

    let w1 = Workout::new(
        &user.id,
        "W1",
        None,
        None,
        Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap(),
    );
    let w2 = Workout::new(
        &user.id,
        "W2",
        None,
        None,
        Utc.with_ymd_and_hms(2024, 1, 12, 8, 0, 0).unwrap(),
    );
    db.create_workout(&w1).await.unwrap();
    db.create_workout(&w2).await.unwrap();

    db.create_exercise(&test_exercise(&w1, "Bench", 1, 4, 8))
        .await
        .unwrap();
    db.create_exercise(&test_exercise(&w1, "Squat", 0, 3, 10))
        .await
        .unwrap();
    db.create_exercise(&test_exercise(&w2, "Bench", 0, 5, 5))
        .await
        .unwrap();

    let history = db.workout_history(&user.id).await.unwrap();
    let stats = UserStats::from_history(&history);
    assert_eq!(stats.total_workouts, 2);
    assert_eq!(stats.total_exercises, 3);
    assert_eq!(stats.total_reps, 87);
    assert_eq!(stats.last_workout, Some(w2.date));

    let names: Vec<String> = history
        .flattened_rows()
        .into_iter()
        .map(|r| r.exercise)
        .collect();
    assert_eq!(names, vec!["Bench", "Squat", "Bench"]);

    let ordered = db.list_exercises(&user.id, &w1.id).await.unwrap();
    assert_eq!(ordered[0].name, "Squat");
    assert_eq!(ordered[1].name, "Bench");
}

#[tokio::test]
async fn test_ownership_is_enforced() {
    require_emulator!();

    let db = test_firestore_db().await;
    let owner = test_user(&db).await;
    let other = test_user(&db).await;

    let workout = Workout::new(&owner.id, "Private", None, None, Utc::now());
    db.create_workout(&workout).await.unwrap();
    let exercise = test_exercise(&workout, "Curl", 0, 3, 12);
    db.create_exercise(&exercise).await.unwrap();

    assert!(db.get_workout(&other.id, &workout.id).await.unwrap().is_none());
    assert!(db.get_exercise(&other.id, &exercise.id).await.unwrap().is_none());
    assert!(!db.delete_workout(&other.id, &workout.id).await.unwrap());
    assert!(!db.delete_exercise(&other.id, &exercise.id).await.unwrap());

    assert!(db.delete_workout(&owner.id, &workout.id).await.unwrap());
    assert!(db.get_exercise(&owner.id, &exercise.id).await.unwrap().is_none());
}

// ═══════════════════════════════════════════════════════════════════════════
// FOLDER TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_folder_delete_unfiles_workouts() {
    require_emulator!();

    let db = test_firestore_db().await;
    let user = test_user(&db).await;

    let folder = Folder::new(&user.id, "Cardio", Some("#00ff00"), Utc::now());
    db.create_folder(&folder).await.unwrap();

    let workout = Workout::new(&user.id, "Run", None, None, Utc::now());
    db.create_workout(&workout).await.unwrap();
    assert!(db
        .set_workout_folder(&user.id, &workout.id, Some(&folder.id))
        .await
        .unwrap());

    let filed = db.list_workouts_in_folder(&user.id, &folder.id).await.unwrap();
    assert_eq!(filed.len(), 1);

    assert!(db.delete_folder(&user.id, &folder.id).await.unwrap());
    assert!(db.get_folder(&user.id, &folder.id).await.unwrap().is_none());

    let workout = db.get_workout(&user.id, &workout.id).await.unwrap().unwrap();
    assert_eq!(workout.folder_id, None);
}
