// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! User statistics aggregates for the dashboard.
//!
//! Statistics are never stored. They are recomputed on every request from
//! a single [`WorkoutHistory`] snapshot so that the counts and the rep sum
//! always describe the same set of rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::WorkoutHistory;

/// Per-user totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserStats {
    /// Number of workouts owned by the user
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_workouts: u64,
    /// Number of exercises under those workouts
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_exercises: u64,
    /// Σ sets × reps over those exercises (weight is not a factor)
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_reps: u64,
    /// Most recent workout date, or `None` if the user never worked out
    pub last_workout: Option<DateTime<Utc>>,
}

impl UserStats {
    /// Compute statistics in one pass over a history snapshot.
    ///
    /// Only exercises whose parent workout is in the snapshot are counted.
    pub fn from_history(history: &WorkoutHistory) -> Self {
        let workout_ids: HashSet<&str> = history.workouts.iter().map(|w| w.id.as_str()).collect();

        let mut stats = UserStats {
            total_workouts: workout_ids.len() as u64,
            last_workout: history.workouts.iter().map(|w| w.date).max(),
            ..Default::default()
        };

        for exercise in history
            .exercises
            .iter()
            .filter(|e| workout_ids.contains(e.workout_id.as_str()))
        {
            stats.total_exercises += 1;
            stats.total_reps += exercise.total_reps();
        }

        stats
    }
}
