// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workout model and the per-user history snapshot used by the
//! aggregation queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::Exercise;

/// Stored workout record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    /// Workout ID (also used as document ID)
    pub id: String,
    /// Owner
    pub user_id: String,
    /// Optional folder grouping
    pub folder_id: Option<String>,
    /// Display name
    pub name: String,
    /// Free-text notes
    pub notes: Option<String>,
    /// When the workout was created
    pub date: DateTime<Utc>,
    /// Client-reported session start (saved sessions only)
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    /// Active session length in seconds (saved sessions only)
    #[serde(default)]
    pub duration_seconds: Option<u64>,
}

impl Workout {
    pub fn new(
        user_id: &str,
        name: &str,
        notes: Option<String>,
        folder_id: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            folder_id,
            name: name.to_string(),
            notes,
            date: now,
            started_at: None,
            duration_seconds: None,
        }
    }
}

/// One exercise flattened together with its workout date.
///
/// This is the row shape consumed by the charting frontend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ExerciseRow {
    pub id: String,
    pub exercise: String,
    pub weight: Option<f64>,
    pub reps: u32,
    pub sets: u32,
    pub date: DateTime<Utc>,
}

impl ExerciseRow {
    pub fn new(exercise: &Exercise, date: DateTime<Utc>) -> Self {
        Self {
            id: exercise.id.clone(),
            exercise: exercise.name.clone(),
            weight: exercise.weight,
            reps: exercise.reps,
            sets: exercise.sets,
            date,
        }
    }
}

/// Workout with its derived counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WorkoutSummary {
    pub id: String,
    pub name: String,
    pub notes: Option<String>,
    pub folder_id: Option<String>,
    pub date: DateTime<Utc>,
    pub exercise_count: u32,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_reps: u64,
}

/// Every workout and exercise owned by one user, read together.
#[derive(Debug, Clone, Default)]
pub struct WorkoutHistory {
    pub workouts: Vec<Workout>,
    pub exercises: Vec<Exercise>,
}

impl WorkoutHistory {
    /// Exercises grouped by parent workout, each group in position order.
    ///
    /// Exercises whose workout is not part of this history are dropped.
    fn exercises_by_workout(&self) -> HashMap<&str, Vec<&Exercise>> {
        let mut grouped: HashMap<&str, Vec<&Exercise>> = self
            .workouts
            .iter()
            .map(|w| (w.id.as_str(), Vec::new()))
            .collect();

        for exercise in &self.exercises {
            if let Some(group) = grouped.get_mut(exercise.workout_id.as_str()) {
                group.push(exercise);
            }
        }

        for group in grouped.values_mut() {
            group.sort_by_key(|e| e.position);
        }

        grouped
    }

    /// Workouts newest first; ties broken by ID for a stable order.
    fn workouts_newest_first(&self) -> Vec<&Workout> {
        let mut workouts: Vec<&Workout> = self.workouts.iter().collect();
        workouts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
        workouts
    }

    /// One row per exercise, newest workout first, exercises in position order.
    pub fn flattened_rows(&self) -> Vec<ExerciseRow> {
        let grouped = self.exercises_by_workout();

        self.workouts_newest_first()
            .into_iter()
            .flat_map(|workout| {
                grouped
                    .get(workout.id.as_str())
                    .into_iter()
                    .flatten()
                    .map(move |exercise| ExerciseRow::new(exercise, workout.date))
            })
            .collect()
    }

    /// Workouts newest first with `exercise_count` and `total_reps` derived
    /// from their exercises.
    pub fn summaries(&self) -> Vec<WorkoutSummary> {
        let grouped = self.exercises_by_workout();

        self.workouts_newest_first()
            .into_iter()
            .map(|workout| {
                let exercises = grouped
                    .get(workout.id.as_str())
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                WorkoutSummary {
                    id: workout.id.clone(),
                    name: workout.name.clone(),
                    notes: workout.notes.clone(),
                    folder_id: workout.folder_id.clone(),
                    date: workout.date,
                    exercise_count: exercises.len() as u32,
                    total_reps: exercises.iter().map(|e| e.total_reps()).sum(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn workout(id: &str, day: u32) -> Workout {
        Workout {
            id: id.to_string(),
            user_id: "u1".to_string(),
            folder_id: None,
            name: format!("Workout {}", id),
            notes: None,
            date: Utc.with_ymd_and_hms(2025, 1, day, 9, 0, 0).unwrap(),
            started_at: None,
            duration_seconds: None,
        }
    }

    fn exercise(id: &str, workout_id: &str, position: u32, sets: u32, reps: u32) -> Exercise {
        Exercise {
            id: id.to_string(),
            workout_id: workout_id.to_string(),
            user_id: "u1".to_string(),
            name: format!("Exercise {}", id),
            sets,
            reps,
            weight: Some(100.0),
            rest_time: 60,
            notes: None,
            position,
        }
    }

    #[test]
    fn test_flattened_rows_order() {
        let history = WorkoutHistory {
            workouts: vec![workout("w1", 1), workout("w2", 2)],
            exercises: vec![
                exercise("e2", "w1", 1, 3, 10),
                exercise("e1", "w1", 0, 3, 10),
                exercise("e3", "w2", 0, 5, 5),
            ],
        };

        let ids: Vec<String> = history.flattened_rows().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["e3", "e1", "e2"]);
    }

    #[test]
    fn test_flattened_rows_use_workout_date() {
        let history = WorkoutHistory {
            workouts: vec![workout("w1", 7)],
            exercises: vec![exercise("e1", "w1", 0, 3, 10)],
        };

        let rows = history.flattened_rows();
        assert_eq!(rows[0].date, history.workouts[0].date);
        assert_eq!(rows[0].exercise, "Exercise e1");
    }

    #[test]
    fn test_summaries_derive_counts() {
        let history = WorkoutHistory {
            workouts: vec![workout("w1", 1), workout("w2", 2)],
            exercises: vec![
                exercise("e1", "w1", 0, 3, 10),
                exercise("e2", "w1", 1, 4, 8),
            ],
        };

        let summaries = history.summaries();
        assert_eq!(summaries[0].id, "w2");
        assert_eq!(summaries[0].exercise_count, 0);
        assert_eq!(summaries[0].total_reps, 0);
        assert_eq!(summaries[1].exercise_count, 2);
        assert_eq!(summaries[1].total_reps, 62);
    }

    #[test]
    fn test_orphaned_exercises_are_ignored() {
        let history = WorkoutHistory {
            workouts: vec![workout("w1", 1)],
            exercises: vec![exercise("e1", "gone", 0, 3, 10)],
        };

        assert!(history.flattened_rows().is_empty());
        assert_eq!(history.summaries()[0].exercise_count, 0);
    }
}
