// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Routes for editing or removing a single exercise.

use axum::{
    extract::{Path, State},
    routing::put,
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use std::sync::Arc;

use crate::error::{AppError, AppJson, Result};
use crate::middleware::auth::AuthUser;
use crate::models::ExerciseResponse;
use crate::routes::MessageResponse;
use crate::services::exercise_input::ExerciseFields;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/api/exercises/{id}",
        put(update_exercise).delete(delete_exercise),
    )
}

/// Replace the editable fields of an exercise.
///
/// The exercise stays in its workout at its position.
async fn update_exercise(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    WithRejection(Json(fields), _): AppJson<ExerciseFields>,
) -> Result<Json<ExerciseResponse>> {
    let input = fields.validate()?;

    let mut exercise = state
        .db
        .get_exercise(&user.user_id, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Exercise", &id))?;

    exercise.name = input.name;
    exercise.sets = input.sets;
    exercise.reps = input.reps;
    exercise.weight = input.weight;
    exercise.rest_time = input.rest_time;
    exercise.notes = input.notes;

    state.db.update_exercise(&exercise).await?;

    Ok(Json(exercise.into()))
}

async fn delete_exercise(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    if !state.db.delete_exercise(&user.user_id, &id).await? {
        return Err(AppError::not_found("Exercise", &id));
    }
    Ok(Json(MessageResponse::new("Exercise deleted successfully")))
}
