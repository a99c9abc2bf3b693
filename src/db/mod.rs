// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer.
//!
//! [`Database`] is the persistence port used by routes and services. It
//! forwards each operation to one of two backends with identical method
//! sets: [`MemoryStore`] and [`FirestoreStore`].

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;

use std::sync::Arc;

use crate::config::{Config, StorageBackend};
use crate::error::AppError;
use crate::models::{Exercise, Folder, User, Workout, WorkoutHistory};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const FOLDERS: &str = "folders";
    pub const WORKOUTS: &str = "workouts";
    pub const EXERCISES: &str = "exercises";
}

#[derive(Clone)]
enum Backend {
    Memory(Arc<MemoryStore>),
    Firestore(FirestoreStore),
}

/// Handle to the configured store. Cheap to clone.
#[derive(Clone)]
pub struct Database {
    backend: Backend,
}

/// Forward a call to whichever backend is active.
macro_rules! dispatch {
    ($self:ident . $method:ident ( $($arg:expr),* )) => {
        match &$self.backend {
            Backend::Memory(store) => store.$method($($arg),*).await,
            Backend::Firestore(store) => store.$method($($arg),*).await,
        }
    };
}

impl Database {
    /// Connect to the backend selected in the configuration.
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        match config.storage_backend {
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; data will not survive a restart");
                Ok(Self::in_memory())
            }
            StorageBackend::Firestore => Ok(Self::firestore(
                FirestoreStore::new(&config.gcp_project_id).await?,
            )),
        }
    }

    /// Fresh, empty in-memory store.
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(MemoryStore::new())),
        }
    }

    pub fn firestore(store: FirestoreStore) -> Self {
        Self {
            backend: Backend::Firestore(store),
        }
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Store a new user. Fails with `Conflict` if the username is taken.
    pub async fn create_user(&self, user: &User) -> Result<(), AppError> {
        dispatch!(self.create_user(user))
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        dispatch!(self.get_user(user_id))
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        dispatch!(self.find_user_by_username(username))
    }

    /// Delete a user and everything they own. Returns the number of
    /// records removed.
    pub async fn delete_user_data(&self, user_id: &str) -> Result<usize, AppError> {
        dispatch!(self.delete_user_data(user_id))
    }

    // ─── Folder Operations ───────────────────────────────────────

    pub async fn create_folder(&self, folder: &Folder) -> Result<(), AppError> {
        dispatch!(self.create_folder(folder))
    }

    /// Folders owned by a user, newest first.
    pub async fn list_folders(&self, user_id: &str) -> Result<Vec<Folder>, AppError> {
        let mut folders: Vec<Folder> = dispatch!(self.list_folders(user_id))?;
        folders.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(folders)
    }

    pub async fn get_folder(
        &self,
        user_id: &str,
        folder_id: &str,
    ) -> Result<Option<Folder>, AppError> {
        dispatch!(self.get_folder(user_id, folder_id))
    }

    pub async fn update_folder(&self, folder: &Folder) -> Result<(), AppError> {
        dispatch!(self.update_folder(folder))
    }

    /// Delete a folder; its workouts are kept with no folder.
    /// Returns `false` if the folder does not exist or is not owned by the user.
    pub async fn delete_folder(&self, user_id: &str, folder_id: &str) -> Result<bool, AppError> {
        dispatch!(self.delete_folder(user_id, folder_id))
    }

    // ─── Workout Operations ──────────────────────────────────────

    pub async fn create_workout(&self, workout: &Workout) -> Result<(), AppError> {
        dispatch!(self.create_workout(workout))
    }

    /// Store a workout together with its first exercise. If the exercise
    /// write fails the workout is removed again and the exercise error is
    /// returned.
    pub async fn create_workout_with_exercise(
        &self,
        workout: &Workout,
        exercise: &Exercise,
    ) -> Result<(), AppError> {
        self.create_workout(workout).await?;

        if let Err(e) = self.create_exercise(exercise).await {
            match self.delete_workout(&workout.user_id, &workout.id).await {
                Ok(_) => tracing::warn!(
                    workout_id = %workout.id,
                    error = %e,
                    "Exercise write failed; workout removed"
                ),
                Err(cleanup) => tracing::error!(
                    workout_id = %workout.id,
                    error = %cleanup,
                    "Failed to remove workout after exercise write failed"
                ),
            }
            return Err(e);
        }

        Ok(())
    }

    pub async fn get_workout(
        &self,
        user_id: &str,
        workout_id: &str,
    ) -> Result<Option<Workout>, AppError> {
        dispatch!(self.get_workout(user_id, workout_id))
    }

    /// Workouts in a folder, newest first.
    pub async fn list_workouts_in_folder(
        &self,
        user_id: &str,
        folder_id: &str,
    ) -> Result<Vec<Workout>, AppError> {
        let mut workouts: Vec<Workout> =
            dispatch!(self.list_workouts_in_folder(user_id, folder_id))?;
        workouts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
        Ok(workouts)
    }

    /// Move a workout into a folder (or out of any folder with `None`).
    pub async fn set_workout_folder(
        &self,
        user_id: &str,
        workout_id: &str,
        folder_id: Option<&str>,
    ) -> Result<bool, AppError> {
        dispatch!(self.set_workout_folder(user_id, workout_id, folder_id))
    }

    /// Delete a workout and its exercises.
    pub async fn delete_workout(&self, user_id: &str, workout_id: &str) -> Result<bool, AppError> {
        dispatch!(self.delete_workout(user_id, workout_id))
    }

    // ─── Exercise Operations ─────────────────────────────────────

    pub async fn create_exercise(&self, exercise: &Exercise) -> Result<(), AppError> {
        dispatch!(self.create_exercise(exercise))
    }

    /// Exercises of one workout in position order.
    pub async fn list_exercises(
        &self,
        user_id: &str,
        workout_id: &str,
    ) -> Result<Vec<Exercise>, AppError> {
        dispatch!(self.list_exercises(user_id, workout_id))
    }

    pub async fn get_exercise(
        &self,
        user_id: &str,
        exercise_id: &str,
    ) -> Result<Option<Exercise>, AppError> {
        dispatch!(self.get_exercise(user_id, exercise_id))
    }

    pub async fn update_exercise(&self, exercise: &Exercise) -> Result<(), AppError> {
        dispatch!(self.update_exercise(exercise))
    }

    pub async fn delete_exercise(&self, user_id: &str, exercise_id: &str) -> Result<bool, AppError> {
        dispatch!(self.delete_exercise(user_id, exercise_id))
    }

    // ─── Aggregation Snapshot ────────────────────────────────────

    /// All workouts and exercises owned by a user.
    pub async fn workout_history(&self, user_id: &str) -> Result<WorkoutHistory, AppError> {
        dispatch!(self.workout_history(user_id))
    }
}
