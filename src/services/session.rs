// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout session persistence.
//!
//! Handles the save workflow:
//! 1. Reject a batch that is missing, not a list, or empty
//! 2. Create the parent workout (name from the current time, notes from
//!    a non-zero session duration)
//! 3. Create each exercise in input order, skipping entries that fail
//! 4. Report the workout ID and the exercises that were created
//!
//! Each exercise insert is its own unit of work. The workout row is kept
//! even if no exercise could be created.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::{Exercise, ExerciseRow, Workout};
use crate::services::exercise_input::{ExerciseFields, NumericInput};
use crate::time_utils::{duration_notes, parse_utc_rfc3339, session_workout_name};

/// Body of `POST /api/workouts/session`.
///
/// `exercises` stays untyped here so that one malformed entry can be
/// skipped without rejecting the whole batch.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    #[serde(default)]
    pub exercises: Option<serde_json::Value>,
    /// Active session length in seconds
    #[serde(default)]
    pub duration: Option<NumericInput>,
    /// Client-side session start (RFC3339)
    #[serde(default)]
    pub start_time: Option<serde_json::Value>,
}

/// Outcome of a saved session.
#[derive(Debug, Clone)]
pub struct SavedSession {
    pub workout_id: String,
    pub exercises: Vec<ExerciseRow>,
    /// Number of entries that could not be stored
    pub skipped: usize,
}

/// Persist a session for `user_id`.
pub async fn save_session(
    db: &Database,
    user_id: &str,
    request: SessionRequest,
    now: DateTime<Utc>,
) -> Result<SavedSession> {
    let entries = match request.exercises {
        Some(serde_json::Value::Array(entries)) if !entries.is_empty() => entries,
        _ => {
            return Err(AppError::BadRequest(
                "At least one exercise is required".to_string(),
            ))
        }
    };

    let duration_seconds = request
        .duration
        .as_ref()
        .and_then(NumericInput::as_whole_seconds);
    let started_at = request
        .start_time
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(parse_utc_rfc3339);

    let mut workout = Workout::new(
        user_id,
        &session_workout_name(now),
        duration_seconds.filter(|d| *d > 0).map(duration_notes),
        None,
        now,
    );
    workout.started_at = started_at;
    workout.duration_seconds = duration_seconds;

    db.create_workout(&workout).await?;

    tracing::info!(
        user_id,
        workout_id = %workout.id,
        entries = entries.len(),
        duration_seconds,
        "Saving workout session"
    );

    let mut created = Vec::with_capacity(entries.len());
    let mut skipped = 0;

    for (index, entry) in entries.into_iter().enumerate() {
        match create_entry(db, &workout, index, entry).await {
            Ok(exercise) => created.push(ExerciseRow::new(&exercise, workout.date)),
            Err(e) => {
                skipped += 1;
                tracing::warn!(
                    user_id,
                    workout_id = %workout.id,
                    index,
                    error = %e,
                    "Skipping session exercise"
                );
            }
        }
    }

    if skipped > 0 {
        tracing::info!(
            workout_id = %workout.id,
            created = created.len(),
            skipped,
            "Workout session saved with skipped entries"
        );
    }

    Ok(SavedSession {
        workout_id: workout.id,
        exercises: created,
        skipped,
    })
}

/// Validate and store one session entry.
async fn create_entry(
    db: &Database,
    workout: &Workout,
    index: usize,
    entry: serde_json::Value,
) -> Result<Exercise> {
    let fields: ExerciseFields = serde_json::from_value(entry)
        .map_err(|e| AppError::BadRequest(format!("Malformed exercise entry: {}", e)))?;
    let input = fields.validate()?;

    // Sessions always use the default rest time and carry no per-exercise notes.
    let exercise = Exercise {
        id: uuid::Uuid::new_v4().to_string(),
        workout_id: workout.id.clone(),
        user_id: workout.user_id.clone(),
        name: input.name,
        sets: input.sets,
        reps: input.reps,
        weight: input.weight,
        rest_time: crate::models::exercise::DEFAULT_REST_TIME_SECONDS,
        notes: None,
        position: index as u32,
    };

    db.create_exercise(&exercise).await?;
    Ok(exercise)
}
