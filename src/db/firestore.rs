// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (accounts and password hashes)
//! - Folders (optional workout grouping)
//! - Workouts
//! - Exercises (one document per exercise, denormalized `user_id`)
//!
//! Ordering is applied in Rust after each query so that no composite
//! indexes are needed.

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Exercise, Folder, User, Workout, WorkoutHistory};
use futures_util::{stream, StreamExt};

const MAX_CONCURRENT_DB_OPS: usize = 50;
// Firestore limits batch/transaction writes to 500 operations.
// We use a safe limit of 400 to allow headroom.
const BATCH_SIZE: usize = 400;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreStore {
    client: firestore::FirestoreDb,
}

impl FirestoreStore {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self { client })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self { client })
    }

    /// Fetch one document by ID.
    async fn get_doc<T>(&self, collection: &str, id: &str) -> Result<Option<T>, AppError>
    where
        T: serde::de::DeserializeOwned + Send,
    {
        self.client
            .fluent()
            .select()
            .by_id_in(collection)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or overwrite one document.
    async fn put_doc<T>(&self, collection: &str, id: &str, object: &T) -> Result<(), AppError>
    where
        T: serde::Serialize + serde::de::DeserializeOwned + Send + Sync,
    {
        let _: T = self
            .client
            .fluent()
            .update()
            .in_col(collection)
            .document_id(id)
            .object(object)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete one document.
    async fn delete_doc(&self, collection: &str, id: &str) -> Result<(), AppError> {
        self.client
            .fluent()
            .delete()
            .from(collection)
            .document_id(id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// All documents in a collection owned by one user.
    async fn owned_by<T>(&self, collection: &str, user_id: &str) -> Result<Vec<T>, AppError>
    where
        T: serde::de::DeserializeOwned + Send + 'static,
    {
        self.client
            .fluent()
            .select()
            .from(collection)
            .filter(|q| q.for_all([q.field("user_id").eq(user_id)]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Store a new user, rejecting a username that is already taken.
    ///
    /// The username check and the write are not transactional; two
    /// simultaneous registrations of the same name can both succeed.
    pub async fn create_user(&self, user: &User) -> Result<(), AppError> {
        if self.find_user_by_username(&user.username).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Username {} is already taken",
                user.username
            )));
        }
        self.put_doc(collections::USERS, &user.id, user).await
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_doc(collections::USERS, user_id).await
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let users: Vec<User> = self
            .client
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(|q| q.for_all([q.field("username").eq(username)]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(users.into_iter().next())
    }

    // ─── Folder Operations ───────────────────────────────────────

    pub async fn create_folder(&self, folder: &Folder) -> Result<(), AppError> {
        self.put_doc(collections::FOLDERS, &folder.id, folder).await
    }

    pub async fn list_folders(&self, user_id: &str) -> Result<Vec<Folder>, AppError> {
        self.owned_by(collections::FOLDERS, user_id).await
    }

    pub async fn get_folder(
        &self,
        user_id: &str,
        folder_id: &str,
    ) -> Result<Option<Folder>, AppError> {
        Ok(self
            .get_doc::<Folder>(collections::FOLDERS, folder_id)
            .await?
            .filter(|f| f.user_id == user_id))
    }

    /// Overwrite an existing folder. Not atomic with the existence check.
    pub async fn update_folder(&self, folder: &Folder) -> Result<(), AppError> {
        if self.get_folder(&folder.user_id, &folder.id).await?.is_none() {
            return Err(AppError::not_found("Folder", &folder.id));
        }
        self.put_doc(collections::FOLDERS, &folder.id, folder).await
    }

    /// Delete a folder and move its workouts to "no folder".
    pub async fn delete_folder(&self, user_id: &str, folder_id: &str) -> Result<bool, AppError> {
        if self.get_folder(user_id, folder_id).await?.is_none() {
            return Ok(false);
        }

        let workouts = self.list_workouts_in_folder(user_id, folder_id).await?;
        let count = workouts.len();

        stream::iter(workouts)
            .map(|mut workout| async move {
                workout.folder_id = None;
                self.put_doc(collections::WORKOUTS, &workout.id, &workout)
                    .await
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<(), AppError>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<()>, AppError>>()?;

        self.delete_doc(collections::FOLDERS, folder_id).await?;

        tracing::debug!(folder_id, unassigned = count, "Deleted folder");
        Ok(true)
    }

    // ─── Workout Operations ──────────────────────────────────────

    pub async fn create_workout(&self, workout: &Workout) -> Result<(), AppError> {
        self.put_doc(collections::WORKOUTS, &workout.id, workout)
            .await
    }

    pub async fn get_workout(
        &self,
        user_id: &str,
        workout_id: &str,
    ) -> Result<Option<Workout>, AppError> {
        Ok(self
            .get_doc::<Workout>(collections::WORKOUTS, workout_id)
            .await?
            .filter(|w| w.user_id == user_id))
    }

    pub async fn list_workouts_in_folder(
        &self,
        user_id: &str,
        folder_id: &str,
    ) -> Result<Vec<Workout>, AppError> {
        self.client
            .fluent()
            .select()
            .from(collections::WORKOUTS)
            .filter(|q| {
                q.for_all([
                    q.field("user_id").eq(user_id),
                    q.field("folder_id").eq(folder_id),
                ])
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn set_workout_folder(
        &self,
        user_id: &str,
        workout_id: &str,
        folder_id: Option<&str>,
    ) -> Result<bool, AppError> {
        let Some(mut workout) = self.get_workout(user_id, workout_id).await? else {
            return Ok(false);
        };
        workout.folder_id = folder_id.map(str::to_string);
        self.put_doc(collections::WORKOUTS, &workout.id, &workout)
            .await?;
        Ok(true)
    }

    /// Delete a workout together with its exercises.
    pub async fn delete_workout(&self, user_id: &str, workout_id: &str) -> Result<bool, AppError> {
        if self.get_workout(user_id, workout_id).await?.is_none() {
            return Ok(false);
        }

        let exercises = self.list_exercises(user_id, workout_id).await?;
        self.batch_delete(&exercises, collections::EXERCISES, |e: &Exercise| {
            e.id.clone()
        })
        .await?;
        self.delete_doc(collections::WORKOUTS, workout_id).await?;

        tracing::debug!(
            workout_id,
            exercises = exercises.len(),
            "Deleted workout"
        );
        Ok(true)
    }

    // ─── Exercise Operations ─────────────────────────────────────

    pub async fn create_exercise(&self, exercise: &Exercise) -> Result<(), AppError> {
        self.put_doc(collections::EXERCISES, &exercise.id, exercise)
            .await
    }

    pub async fn list_exercises(
        &self,
        user_id: &str,
        workout_id: &str,
    ) -> Result<Vec<Exercise>, AppError> {
        let mut exercises: Vec<Exercise> = self
            .client
            .fluent()
            .select()
            .from(collections::EXERCISES)
            .filter(|q| {
                q.for_all([
                    q.field("user_id").eq(user_id),
                    q.field("workout_id").eq(workout_id),
                ])
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        exercises.sort_by_key(|e| e.position);
        Ok(exercises)
    }

    pub async fn get_exercise(
        &self,
        user_id: &str,
        exercise_id: &str,
    ) -> Result<Option<Exercise>, AppError> {
        Ok(self
            .get_doc::<Exercise>(collections::EXERCISES, exercise_id)
            .await?
            .filter(|e| e.user_id == user_id))
    }

    /// Overwrite an existing exercise. Not atomic with the existence checks.
    pub async fn update_exercise(&self, exercise: &Exercise) -> Result<(), AppError> {
        if self
            .get_workout(&exercise.user_id, &exercise.workout_id)
            .await?
            .is_none()
        {
            return Err(AppError::not_found("Workout", &exercise.workout_id));
        }
        if self
            .get_exercise(&exercise.user_id, &exercise.id)
            .await?
            .is_none()
        {
            return Err(AppError::not_found("Exercise", &exercise.id));
        }
        self.put_doc(collections::EXERCISES, &exercise.id, exercise)
            .await
    }

    pub async fn delete_exercise(&self, user_id: &str, exercise_id: &str) -> Result<bool, AppError> {
        if self.get_exercise(user_id, exercise_id).await?.is_none() {
            return Ok(false);
        }
        self.delete_doc(collections::EXERCISES, exercise_id).await?;
        Ok(true)
    }

    // ─── Aggregation Snapshot ────────────────────────────────────

    /// Read all of a user's workouts and exercises.
    ///
    /// The two queries are not transactional. A write landing between them
    /// can leave an exercise whose workout is missing from the snapshot;
    /// the aggregation ignores such rows.
    pub async fn workout_history(&self, user_id: &str) -> Result<WorkoutHistory, AppError> {
        let (workouts, exercises) = tokio::try_join!(
            self.owned_by::<Workout>(collections::WORKOUTS, user_id),
            self.owned_by::<Exercise>(collections::EXERCISES, user_id),
        )?;

        Ok(WorkoutHistory {
            workouts,
            exercises,
        })
    }

    // ─── Helper Methods ────────────────────────────────────────────

    /// Helper to batch delete documents using transactions.
    async fn batch_delete<T, F>(
        &self,
        items: &[T],
        collection: &str,
        id_extractor: F,
    ) -> Result<(), AppError>
    where
        F: Fn(&T) -> String,
    {
        for chunk in items.chunks(BATCH_SIZE) {
            let mut transaction = self
                .client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            for item in chunk {
                let doc_id = id_extractor(item);
                self.client
                    .fluent()
                    .delete()
                    .from(collection)
                    .document_id(&doc_id)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!(
                            "Failed to add deletion to transaction for {}: {}",
                            collection, e
                        ))
                    })?;
            }

            transaction.commit().await.map_err(|e| {
                AppError::Database(format!("Failed to commit batch deletion: {}", e))
            })?;
        }

        Ok(())
    }

    // ─── User Data Deletion ──────────────────────────────────────

    /// Delete ALL data for a user.
    ///
    /// Deletes, in order: exercises, workouts, folders, then the user
    /// document itself. Returns the number of documents deleted.
    pub async fn delete_user_data(&self, user_id: &str) -> Result<usize, AppError> {
        let mut deleted_count = 0;

        // 1. Exercises
        let exercises: Vec<Exercise> = self.owned_by(collections::EXERCISES, user_id).await?;
        self.batch_delete(&exercises, collections::EXERCISES, |e: &Exercise| {
            e.id.clone()
        })
        .await?;
        deleted_count += exercises.len();
        tracing::debug!(user_id, count = exercises.len(), "Deleted exercises");

        // 2. Workouts
        let workouts: Vec<Workout> = self.owned_by(collections::WORKOUTS, user_id).await?;
        self.batch_delete(&workouts, collections::WORKOUTS, |w: &Workout| w.id.clone())
            .await?;
        deleted_count += workouts.len();
        tracing::debug!(user_id, count = workouts.len(), "Deleted workouts");

        // 3. Folders
        let folders: Vec<Folder> = self.owned_by(collections::FOLDERS, user_id).await?;
        self.batch_delete(&folders, collections::FOLDERS, |f: &Folder| f.id.clone())
            .await?;
        deleted_count += folders.len();
        tracing::debug!(user_id, count = folders.len(), "Deleted folders");

        // 4. User
        if self.get_user(user_id).await?.is_some() {
            self.delete_doc(collections::USERS, user_id).await?;
            deleted_count += 1;
        }

        tracing::info!(user_id, deleted_count, "User data deletion complete");

        Ok(deleted_count)
    }
}
