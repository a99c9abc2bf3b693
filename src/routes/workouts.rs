// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout routes: history, creation, sessions and aggregates.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, AppJson, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{
    Exercise, ExerciseResponse, ExerciseRow, UserStats, Workout, WorkoutSummary,
};
use crate::routes::MessageResponse;
use crate::services::exercise_input::{ExerciseFields, NewExercise, NumericInput};
use crate::services::progress::{group_progress, ExerciseSeries, ProgressRecord};
use crate::services::session::{save_session, SessionRequest};
use crate::AppState;

/// Workout routes (require authentication via JWT).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/workouts", get(list_workouts).post(create_workout))
        .route("/api/workouts/summaries", get(list_summaries))
        .route("/api/workouts/stats", get(get_stats))
        .route("/api/workouts/progress", get(get_progress))
        .route("/api/workouts/session", post(save_workout_session))
        .route(
            "/api/workouts/{id}",
            get(get_workout).delete(delete_workout),
        )
        .route("/api/workouts/{id}/folder", put(move_workout))
        .route("/api/workouts/{id}/exercises", post(add_exercise))
}

// ─── Response Types ──────────────────────────────────────────

/// Workout without its exercises.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WorkoutResponse {
    pub id: String,
    pub name: String,
    pub notes: Option<String>,
    pub folder_id: Option<String>,
    pub date: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub duration_seconds: Option<u64>,
}

impl From<Workout> for WorkoutResponse {
    fn from(w: Workout) -> Self {
        Self {
            id: w.id,
            name: w.name,
            notes: w.notes,
            folder_id: w.folder_id,
            date: w.date,
            started_at: w.started_at,
            duration_seconds: w.duration_seconds,
        }
    }
}

/// Workout with its exercises in order.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WorkoutDetail {
    #[serde(flatten)]
    pub workout: WorkoutResponse,
    pub exercises: Vec<ExerciseResponse>,
}

/// Quick-entry body: one workout holding one exercise.
#[derive(Debug, Deserialize)]
pub struct QuickEntryRequest {
    pub exercise: String,
    #[serde(default)]
    pub weight: Option<NumericInput>,
    #[serde(default)]
    pub reps: Option<NumericInput>,
    #[serde(default)]
    pub sets: Option<NumericInput>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, alias = "folderId")]
    pub folder_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NamedWorkoutRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, alias = "folderId")]
    pub folder_id: Option<String>,
}

/// Either form accepted by `POST /api/workouts`.
///
/// A body carrying an `exercise` key is a quick entry, and a malformed
/// field in it is an error rather than a fallback to a named workout.
#[derive(Debug)]
pub enum CreateWorkoutRequest {
    QuickEntry(QuickEntryRequest),
    Named(NamedWorkoutRequest),
}

impl<'de> Deserialize<'de> for CreateWorkoutRequest {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let body = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
        let quick_entry = body.contains_key("exercise");
        let body = serde_json::Value::Object(body);

        let parsed = if quick_entry {
            QuickEntryRequest::deserialize(body).map(Self::QuickEntry)
        } else {
            NamedWorkoutRequest::deserialize(body).map(Self::Named)
        };
        parsed.map_err(serde::de::Error::custom)
    }
}

/// Result of `POST /api/workouts`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CreateWorkoutResponse {
    Row(ExerciseRow),
    Workout(WorkoutResponse),
}

/// Response for a saved session.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct SessionSavedResponse {
    pub workout_id: String,
    pub exercises: Vec<ExerciseRow>,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct MoveWorkoutRequest {
    #[serde(default, alias = "folderId")]
    pub folder_id: Option<String>,
}

// ─── Helpers ─────────────────────────────────────────────────

fn clean_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolve an optional target folder, rejecting folders the caller does not own.
async fn owned_folder(
    state: &AppState,
    user_id: &str,
    folder_id: Option<String>,
) -> Result<Option<String>> {
    match clean_text(folder_id) {
        Some(id) => match state.db.get_folder(user_id, &id).await? {
            Some(folder) => Ok(Some(folder.id)),
            None => Err(AppError::not_found("Folder", &id)),
        },
        None => Ok(None),
    }
}

fn new_exercise(workout: &Workout, input: NewExercise, position: u32) -> Exercise {
    Exercise {
        id: uuid::Uuid::new_v4().to_string(),
        workout_id: workout.id.clone(),
        user_id: workout.user_id.clone(),
        name: input.name,
        sets: input.sets,
        reps: input.reps,
        weight: input.weight,
        rest_time: input.rest_time,
        notes: input.notes,
        position,
    }
}

// ─── History ─────────────────────────────────────────────────

/// Every exercise of the caller as a flat row, newest workout first.
async fn list_workouts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<ExerciseRow>>> {
    let history = state.db.workout_history(&user.user_id).await?;
    Ok(Json(history.flattened_rows()))
}

async fn list_summaries(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<WorkoutSummary>>> {
    let history = state.db.workout_history(&user.user_id).await?;
    Ok(Json(history.summaries()))
}

// ─── Aggregates ──────────────────────────────────────────────

async fn get_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserStats>> {
    let history = state.db.workout_history(&user.user_id).await?;
    let stats = UserStats::from_history(&history);

    tracing::debug!(
        user_id = %user.user_id,
        total_workouts = stats.total_workouts,
        total_exercises = stats.total_exercises,
        "Computed workout stats"
    );

    Ok(Json(stats))
}

async fn get_progress(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<ExerciseSeries>>> {
    let history = state.db.workout_history(&user.user_id).await?;
    let records = history
        .flattened_rows()
        .iter()
        .map(ProgressRecord::from)
        .collect::<Vec<_>>();

    Ok(Json(group_progress(records, Utc::now())))
}

// ─── Creation ────────────────────────────────────────────────

async fn create_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(payload), _): AppJson<CreateWorkoutRequest>,
) -> Result<Json<CreateWorkoutResponse>> {
    let now = Utc::now();

    match payload {
        CreateWorkoutRequest::QuickEntry(QuickEntryRequest {
            exercise,
            weight,
            reps,
            sets,
            name,
            notes,
            folder_id,
        }) => {
            let input = ExerciseFields {
                name: Some(exercise),
                sets,
                reps,
                weight,
                ..Default::default()
            }
            .validate()?;
            let folder_id = owned_folder(&state, &user.user_id, folder_id).await?;

            let name = clean_text(name)
                .unwrap_or_else(|| format!("Workout - {}", now.format("%Y-%m-%d")));
            let workout = Workout::new(&user.user_id, &name, clean_text(notes), folder_id, now);
            let exercise = new_exercise(&workout, input, 0);

            state
                .db
                .create_workout_with_exercise(&workout, &exercise)
                .await?;

            tracing::info!(
                user_id = %user.user_id,
                workout_id = %workout.id,
                exercise = %exercise.name,
                "Quick entry workout created"
            );

            Ok(Json(CreateWorkoutResponse::Row(ExerciseRow::new(
                &exercise,
                workout.date,
            ))))
        }
        CreateWorkoutRequest::Named(NamedWorkoutRequest {
            name,
            notes,
            folder_id,
        }) => {
            let name = clean_text(name).ok_or_else(|| {
                AppError::BadRequest(
                    "Workout name is required, or provide exercise, weight, reps, and sets"
                        .to_string(),
                )
            })?;
            let folder_id = owned_folder(&state, &user.user_id, folder_id).await?;

            let workout = Workout::new(&user.user_id, &name, clean_text(notes), folder_id, now);
            state.db.create_workout(&workout).await?;

            tracing::info!(user_id = %user.user_id, workout_id = %workout.id, "Workout created");

            Ok(Json(CreateWorkoutResponse::Workout(workout.into())))
        }
    }
}

async fn save_workout_session(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(payload), _): AppJson<SessionRequest>,
) -> Result<Json<SessionSavedResponse>> {
    let saved = save_session(&state.db, &user.user_id, payload, Utc::now()).await?;

    Ok(Json(SessionSavedResponse {
        workout_id: saved.workout_id,
        exercises: saved.exercises,
        message: "Workout session saved successfully".to_string(),
    }))
}

// ─── Single Workout ──────────────────────────────────────────

async fn get_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<WorkoutDetail>> {
    let workout = state
        .db
        .get_workout(&user.user_id, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Workout", &id))?;
    let exercises = state.db.list_exercises(&user.user_id, &id).await?;

    Ok(Json(WorkoutDetail {
        workout: workout.into(),
        exercises: exercises.into_iter().map(ExerciseResponse::from).collect(),
    }))
}

async fn delete_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    if !state.db.delete_workout(&user.user_id, &id).await? {
        return Err(AppError::not_found("Workout", &id));
    }

    tracing::info!(user_id = %user.user_id, workout_id = %id, "Workout deleted");
    Ok(Json(MessageResponse::new("Workout deleted successfully")))
}

/// Move a workout into one of the caller's folders, or out of any folder.
async fn move_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): AppJson<MoveWorkoutRequest>,
) -> Result<Json<MessageResponse>> {
    let folder_id = owned_folder(&state, &user.user_id, payload.folder_id).await?;

    if !state
        .db
        .set_workout_folder(&user.user_id, &id, folder_id.as_deref())
        .await?
    {
        return Err(AppError::not_found("Workout", &id));
    }

    Ok(Json(MessageResponse::new("Workout moved successfully")))
}

/// Append one exercise to an existing workout.
async fn add_exercise(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    WithRejection(Json(fields), _): AppJson<ExerciseFields>,
) -> Result<(StatusCode, Json<ExerciseResponse>)> {
    let input = fields.validate()?;

    let workout = state
        .db
        .get_workout(&user.user_id, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Workout", &id))?;

    let position = state
        .db
        .list_exercises(&user.user_id, &id)
        .await?
        .iter()
        .map(|e| e.position + 1)
        .max()
        .unwrap_or(0);

    let exercise = new_exercise(&workout, input, position);
    state.db.create_exercise(&exercise).await?;

    Ok((StatusCode::CREATED, Json(exercise.into())))
}
