// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-exercise progress series for the progress charts.
//!
//! History rows are grouped by exercise name (trimmed, case-sensitive) and
//! each group is sorted by date ascending. The sort is stable, so rows that
//! share a date keep their input order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::ExerciseRow;

/// One history record as seen by the grouping step.
///
/// `date` is optional because client-side history may carry a missing or
/// malformed date; such records are placed at "now".
#[derive(Debug, Clone)]
pub struct ProgressRecord {
    pub exercise: String,
    pub weight: Option<f64>,
    pub reps: u32,
    pub sets: u32,
    pub date: Option<DateTime<Utc>>,
}

impl From<&ExerciseRow> for ProgressRecord {
    fn from(row: &ExerciseRow) -> Self {
        Self {
            exercise: row.exercise.clone(),
            weight: row.weight,
            reps: row.reps,
            sets: row.sets,
            date: Some(row.date),
        }
    }
}

/// A single chart point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProgressPoint {
    pub date: DateTime<Utc>,
    /// Missing weights chart as 0
    pub weight: f64,
    pub reps: u32,
    pub sets: u32,
}

/// All points for one exercise name, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ExerciseSeries {
    pub exercise: String,
    pub points: Vec<ProgressPoint>,
}

/// Group history records into per-exercise series.
///
/// Series appear in the order their exercise name is first seen. Records
/// with a blank name are skipped.
pub fn group_progress<I>(records: I, now: DateTime<Utc>) -> Vec<ExerciseSeries>
where
    I: IntoIterator<Item = ProgressRecord>,
{
    let mut series: Vec<ExerciseSeries> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let name = record.exercise.trim();
        if name.is_empty() {
            continue;
        }

        let point = ProgressPoint {
            date: record.date.unwrap_or(now),
            weight: record.weight.unwrap_or(0.0),
            reps: record.reps,
            sets: record.sets,
        };

        match index.get(name) {
            Some(&i) => series[i].points.push(point),
            None => {
                index.insert(name.to_string(), series.len());
                series.push(ExerciseSeries {
                    exercise: name.to_string(),
                    points: vec![point],
                });
            }
        }
    }

    for s in &mut series {
        // `sort_by_key` is stable: equal dates keep insertion order.
        s.points.sort_by_key(|p| p.date);
    }

    series
}
