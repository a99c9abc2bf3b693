// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory store.
//!
//! All tables sit behind one lock, so every read (in particular
//! [`MemoryStore::workout_history`]) sees a single consistent point in time.
//! Used for local development and by the test suite.

use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::AppError;
use crate::models::{Exercise, Folder, User, Workout, WorkoutHistory};

#[derive(Default)]
struct Tables {
    users: HashMap<String, User>,
    folders: HashMap<String, Folder>,
    workouts: HashMap<String, Workout>,
    exercises: HashMap<String, Exercise>,
}

/// Process-local tables keyed by record ID.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── User Operations ─────────────────────────────────────────

    pub async fn create_user(&self, user: &User) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(AppError::Conflict(format!(
                "Username {} is already taken",
                user.username
            )));
        }
        tables.users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        Ok(self.tables.read().await.users.get(user_id).cloned())
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    // ─── Folder Operations ───────────────────────────────────────

    pub async fn create_folder(&self, folder: &Folder) -> Result<(), AppError> {
        self.tables
            .write()
            .await
            .folders
            .insert(folder.id.clone(), folder.clone());
        Ok(())
    }

    pub async fn list_folders(&self, user_id: &str) -> Result<Vec<Folder>, AppError> {
        Ok(self
            .tables
            .read()
            .await
            .folders
            .values()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect())
    }

    pub async fn get_folder(
        &self,
        user_id: &str,
        folder_id: &str,
    ) -> Result<Option<Folder>, AppError> {
        Ok(self
            .tables
            .read()
            .await
            .folders
            .get(folder_id)
            .filter(|f| f.user_id == user_id)
            .cloned())
    }

    pub async fn update_folder(&self, folder: &Folder) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .folders
            .get_mut(&folder.id)
            .filter(|f| f.user_id == folder.user_id)
            .ok_or_else(|| AppError::not_found("Folder", &folder.id))?;
        *stored = folder.clone();
        Ok(())
    }

    pub async fn delete_folder(&self, user_id: &str, folder_id: &str) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let owned = tables
            .folders
            .get(folder_id)
            .is_some_and(|f| f.user_id == user_id);
        if !owned {
            return Ok(false);
        }

        tables.folders.remove(folder_id);
        for workout in tables.workouts.values_mut() {
            if workout.user_id == user_id && workout.folder_id.as_deref() == Some(folder_id) {
                workout.folder_id = None;
            }
        }
        Ok(true)
    }

    // ─── Workout Operations ──────────────────────────────────────

    pub async fn create_workout(&self, workout: &Workout) -> Result<(), AppError> {
        self.tables
            .write()
            .await
            .workouts
            .insert(workout.id.clone(), workout.clone());
        Ok(())
    }

    pub async fn get_workout(
        &self,
        user_id: &str,
        workout_id: &str,
    ) -> Result<Option<Workout>, AppError> {
        Ok(self
            .tables
            .read()
            .await
            .workouts
            .get(workout_id)
            .filter(|w| w.user_id == user_id)
            .cloned())
    }

    pub async fn list_workouts_in_folder(
        &self,
        user_id: &str,
        folder_id: &str,
    ) -> Result<Vec<Workout>, AppError> {
        Ok(self
            .tables
            .read()
            .await
            .workouts
            .values()
            .filter(|w| w.user_id == user_id && w.folder_id.as_deref() == Some(folder_id))
            .cloned()
            .collect())
    }

    pub async fn set_workout_folder(
        &self,
        user_id: &str,
        workout_id: &str,
        folder_id: Option<&str>,
    ) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        match tables
            .workouts
            .get_mut(workout_id)
            .filter(|w| w.user_id == user_id)
        {
            Some(workout) => {
                workout.folder_id = folder_id.map(str::to_string);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub async fn delete_workout(&self, user_id: &str, workout_id: &str) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let owned = tables
            .workouts
            .get(workout_id)
            .is_some_and(|w| w.user_id == user_id);
        if !owned {
            return Ok(false);
        }

        tables.workouts.remove(workout_id);
        tables.exercises.retain(|_, e| e.workout_id != workout_id);
        Ok(true)
    }

    // ─── Exercise Operations ─────────────────────────────────────

    pub async fn create_exercise(&self, exercise: &Exercise) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        // The parent may have been deleted since the caller looked it up.
        if !tables.workouts.contains_key(&exercise.workout_id) {
            return Err(AppError::not_found("Workout", &exercise.workout_id));
        }
        tables
            .exercises
            .insert(exercise.id.clone(), exercise.clone());
        Ok(())
    }

    pub async fn list_exercises(
        &self,
        user_id: &str,
        workout_id: &str,
    ) -> Result<Vec<Exercise>, AppError> {
        let mut exercises: Vec<Exercise> = self
            .tables
            .read()
            .await
            .exercises
            .values()
            .filter(|e| e.user_id == user_id && e.workout_id == workout_id)
            .cloned()
            .collect();
        exercises.sort_by_key(|e| e.position);
        Ok(exercises)
    }

    pub async fn get_exercise(
        &self,
        user_id: &str,
        exercise_id: &str,
    ) -> Result<Option<Exercise>, AppError> {
        Ok(self
            .tables
            .read()
            .await
            .exercises
            .get(exercise_id)
            .filter(|e| e.user_id == user_id)
            .cloned())
    }

    pub async fn update_exercise(&self, exercise: &Exercise) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        if !tables.workouts.contains_key(&exercise.workout_id) {
            return Err(AppError::not_found("Workout", &exercise.workout_id));
        }
        let stored = tables
            .exercises
            .get_mut(&exercise.id)
            .filter(|e| e.user_id == exercise.user_id)
            .ok_or_else(|| AppError::not_found("Exercise", &exercise.id))?;
        *stored = exercise.clone();
        Ok(())
    }

    pub async fn delete_exercise(&self, user_id: &str, exercise_id: &str) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let owned = tables
            .exercises
            .get(exercise_id)
            .is_some_and(|e| e.user_id == user_id);
        if owned {
            tables.exercises.remove(exercise_id);
        }
        Ok(owned)
    }

    // ─── Aggregation Snapshot ────────────────────────────────────

    pub async fn workout_history(&self, user_id: &str) -> Result<WorkoutHistory, AppError> {
        let tables = self.tables.read().await;
        Ok(WorkoutHistory {
            workouts: tables
                .workouts
                .values()
                .filter(|w| w.user_id == user_id)
                .cloned()
                .collect(),
            exercises: tables
                .exercises
                .values()
                .filter(|e| e.user_id == user_id)
                .cloned()
                .collect(),
        })
    }

    // ─── User Data Deletion ──────────────────────────────────────

    pub async fn delete_user_data(&self, user_id: &str) -> Result<usize, AppError> {
        let mut tables = self.tables.write().await;
        let before = tables.exercises.len()
            + tables.workouts.len()
            + tables.folders.len()
            + tables.users.len();

        tables.exercises.retain(|_, e| e.user_id != user_id);
        tables.workouts.retain(|_, w| w.user_id != user_id);
        tables.folders.retain(|_, f| f.user_id != user_id);
        tables.users.remove(user_id);

        let after = tables.exercises.len()
            + tables.workouts.len()
            + tables.folders.len()
            + tables.users.len();

        Ok(before - after)
    }
}
