// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Folder CRUD routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, AppJson, Result};
use crate::middleware::auth::AuthUser;
use crate::models::folder::normalize_color;
use crate::models::Folder;
use crate::routes::workouts::WorkoutResponse;
use crate::routes::MessageResponse;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/folders", get(list_folders).post(create_folder))
        .route(
            "/api/folders/{id}",
            get(get_folder).put(update_folder).delete(delete_folder),
        )
}

/// Body for create and update.
#[derive(Debug, Deserialize, Validate)]
pub struct FolderRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Folder name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 32, message = "Folder color is too long"))]
    pub color: Option<String>,
}

impl FolderRequest {
    fn normalized(mut self) -> Result<Self> {
        self.name = self.name.trim().to_string();
        self.validate()?;
        Ok(self)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FolderResponse {
    pub id: String,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

impl From<Folder> for FolderResponse {
    fn from(f: Folder) -> Self {
        Self {
            id: f.id,
            name: f.name,
            color: f.color,
            created_at: f.created_at,
        }
    }
}

/// A folder together with the workouts filed in it.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FolderDetail {
    #[serde(flatten)]
    pub folder: FolderResponse,
    pub workouts: Vec<WorkoutResponse>,
}

async fn list_folders(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<FolderResponse>>> {
    let folders = state.db.list_folders(&user.user_id).await?;
    Ok(Json(folders.into_iter().map(FolderResponse::from).collect()))
}

async fn create_folder(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(payload), _): AppJson<FolderRequest>,
) -> Result<(StatusCode, Json<FolderResponse>)> {
    let payload = payload.normalized()?;

    let folder = Folder::new(
        &user.user_id,
        &payload.name,
        payload.color.as_deref(),
        Utc::now(),
    );
    state.db.create_folder(&folder).await?;

    tracing::info!(user_id = %user.user_id, folder_id = %folder.id, "Folder created");
    Ok((StatusCode::CREATED, Json(folder.into())))
}

async fn get_folder(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<FolderDetail>> {
    let folder = state
        .db
        .get_folder(&user.user_id, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Folder", &id))?;
    let workouts = state.db.list_workouts_in_folder(&user.user_id, &id).await?;

    Ok(Json(FolderDetail {
        folder: folder.into(),
        workouts: workouts.into_iter().map(WorkoutResponse::from).collect(),
    }))
}

async fn update_folder(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): AppJson<FolderRequest>,
) -> Result<Json<FolderResponse>> {
    let payload = payload.normalized()?;

    let mut folder = state
        .db
        .get_folder(&user.user_id, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Folder", &id))?;

    folder.name = payload.name;
    // An omitted color keeps the current one.
    if payload.color.is_some() {
        folder.color = normalize_color(payload.color.as_deref());
    }

    state.db.update_folder(&folder).await?;
    Ok(Json(folder.into()))
}

/// Delete a folder. Its workouts are kept and become unfiled.
async fn delete_folder(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    if !state.db.delete_folder(&user.user_id, &id).await? {
        return Err(AppError::not_found("Folder", &id));
    }

    tracing::info!(user_id = %user.user_id, folder_id = %id, "Folder deleted");
    Ok(Json(MessageResponse::new("Folder deleted successfully")))
}
