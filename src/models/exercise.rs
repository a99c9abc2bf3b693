// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Exercise model for storage and API.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Rest time applied when none (or an invalid one) is given.
pub const DEFAULT_REST_TIME_SECONDS: u32 = 60;

/// Stored exercise record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    /// Exercise ID (also used as document ID)
    pub id: String,
    /// Parent workout
    pub workout_id: String,
    /// Owner of the parent workout (denormalized for per-user queries)
    pub user_id: String,
    /// Exercise name, e.g. "Bench Press"
    pub name: String,
    /// Number of sets (positive)
    pub sets: u32,
    /// Repetitions per set (positive)
    pub reps: u32,
    /// Load; absent for bodyweight movements
    pub weight: Option<f64>,
    /// Rest between sets, in seconds
    pub rest_time: u32,
    /// Free-text notes
    pub notes: Option<String>,
    /// Order within the parent workout
    pub position: u32,
}

impl Exercise {
    /// Repetitions contributed to the totals (`sets × reps`).
    pub fn total_reps(&self) -> u64 {
        u64::from(self.sets) * u64::from(self.reps)
    }
}

/// Exercise as returned inside a workout detail response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ExerciseResponse {
    pub id: String,
    pub workout_id: String,
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    pub weight: Option<f64>,
    pub rest_time: u32,
    pub notes: Option<String>,
}

impl From<Exercise> for ExerciseResponse {
    fn from(e: Exercise) -> Self {
        Self {
            id: e.id,
            workout_id: e.workout_id,
            name: e.name,
            sets: e.sets,
            reps: e.reps,
            weight: e.weight,
            rest_time: e.rest_time,
            notes: e.notes,
        }
    }
}
