// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Parsing and validation of exercise fields submitted by clients.
//!
//! Forms submit numbers either as JSON numbers or as numeric strings, so
//! every numeric field accepts both. The same rule is shared by session
//! saves, quick-entry workouts and "add exercise to workout".

use serde::Deserialize;

use crate::error::AppError;
use crate::models::exercise::DEFAULT_REST_TIME_SECONDS;

/// A numeric form field: a JSON number or a string holding one.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum NumericInput {
    Number(serde_json::Number),
    Text(String),
}

impl NumericInput {
    fn as_f64(&self) -> Option<f64> {
        let value = match self {
            NumericInput::Number(n) => n.as_f64()?,
            NumericInput::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }

    /// Whole, non-negative value that fits in a `u32`.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            NumericInput::Number(n) => match n.as_u64() {
                Some(v) => u32::try_from(v).ok(),
                None => {
                    let v = n.as_f64()?;
                    (v.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&v))
                        .then_some(v as u32)
                }
            },
            NumericInput::Text(s) => s.trim().parse::<u32>().ok(),
        }
    }

    /// Whole, strictly positive value.
    pub fn as_positive_u32(&self) -> Option<u32> {
        self.as_u32().filter(|v| *v > 0)
    }

    /// Non-negative seconds, with any fraction dropped.
    pub fn as_whole_seconds(&self) -> Option<u64> {
        self.as_f64()
            .filter(|v| *v >= 0.0)
            .map(|v| v.floor() as u64)
    }

    /// Non-negative finite weight.
    pub fn as_weight(&self) -> Option<f64> {
        self.as_f64().filter(|v| *v >= 0.0)
    }
}

/// Raw exercise fields as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExerciseFields {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sets: Option<NumericInput>,
    #[serde(default)]
    pub reps: Option<NumericInput>,
    #[serde(default)]
    pub weight: Option<NumericInput>,
    #[serde(default, alias = "restTime")]
    pub rest_time: Option<NumericInput>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Validated exercise values ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExercise {
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    pub weight: Option<f64>,
    pub rest_time: u32,
    pub notes: Option<String>,
}

/// Why a set of exercise fields was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExerciseInputError {
    #[error("Exercise name is required")]
    MissingName,

    #[error("Sets must be a positive whole number")]
    InvalidSets,

    #[error("Reps must be a positive whole number")]
    InvalidReps,
}

impl From<ExerciseInputError> for AppError {
    fn from(err: ExerciseInputError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl ExerciseFields {
    /// Apply the shared validation rule.
    ///
    /// Name, sets and reps are required. Weight becomes `None` when absent
    /// or unparsable. Rest time falls back to 60 seconds when absent or
    /// invalid; an explicit 0 is kept.
    pub fn validate(self) -> Result<NewExercise, ExerciseInputError> {
        let name = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or(ExerciseInputError::MissingName)?
            .to_string();

        let sets = self
            .sets
            .as_ref()
            .and_then(NumericInput::as_positive_u32)
            .ok_or(ExerciseInputError::InvalidSets)?;

        let reps = self
            .reps
            .as_ref()
            .and_then(NumericInput::as_positive_u32)
            .ok_or(ExerciseInputError::InvalidReps)?;

        let weight = self.weight.as_ref().and_then(NumericInput::as_weight);

        let rest_time = self
            .rest_time
            .as_ref()
            .and_then(NumericInput::as_u32)
            .unwrap_or(DEFAULT_REST_TIME_SECONDS);

        let notes = self
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        Ok(NewExercise {
            name,
            sets,
            reps,
            weight,
            rest_time,
            notes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> ExerciseFields {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_accepts_numbers_and_numeric_strings() {
        let parsed = fields(json!({"name": " Bench Press ", "sets": "3", "reps": 10, "weight": "135.5"}))
            .validate()
            .unwrap();

        assert_eq!(parsed.name, "Bench Press");
        assert_eq!(parsed.sets, 3);
        assert_eq!(parsed.reps, 10);
        assert_eq!(parsed.weight, Some(135.5));
        assert_eq!(parsed.rest_time, DEFAULT_REST_TIME_SECONDS);
        assert_eq!(parsed.notes, None);
    }

    #[test]
    fn test_missing_or_blank_name_rejected() {
        let err = fields(json!({"sets": 3, "reps": 10})).validate().unwrap_err();
        assert_eq!(err, ExerciseInputError::MissingName);

        let err = fields(json!({"name": "   ", "sets": 3, "reps": 10}))
            .validate()
            .unwrap_err();
        assert_eq!(err, ExerciseInputError::MissingName);
    }

    #[test]
    fn test_non_numeric_sets_rejected() {
        let err = fields(json!({"name": "Row", "sets": "three", "reps": 10}))
            .validate()
            .unwrap_err();
        assert_eq!(err, ExerciseInputError::InvalidSets);
    }

    #[test]
    fn test_zero_or_fractional_reps_rejected() {
        let err = fields(json!({"name": "Row", "sets": 3, "reps": 0}))
            .validate()
            .unwrap_err();
        assert_eq!(err, ExerciseInputError::InvalidReps);

        let err = fields(json!({"name": "Row", "sets": 3, "reps": 2.5}))
            .validate()
            .unwrap_err();
        assert_eq!(err, ExerciseInputError::InvalidReps);
    }

    #[test]
    fn test_whole_float_counts_accepted() {
        let parsed = fields(json!({"name": "Row", "sets": 3.0, "reps": 8}))
            .validate()
            .unwrap();
        assert_eq!(parsed.sets, 3);
    }

    #[test]
    fn test_invalid_weight_becomes_none() {
        for weight in [json!("heavy"), json!(null), json!(""), json!(-5)] {
            let parsed = fields(json!({"name": "Pull Up", "sets": 3, "reps": 8, "weight": weight}))
                .validate()
                .unwrap();
            assert_eq!(parsed.weight, None);
        }
    }

    #[test]
    fn test_zero_weight_is_kept() {
        let parsed = fields(json!({"name": "Plank", "sets": 1, "reps": 1, "weight": 0}))
            .validate()
            .unwrap();
        assert_eq!(parsed.weight, Some(0.0));
    }

    #[test]
    fn test_rest_time_defaults_but_keeps_explicit_zero() {
        let parsed = fields(json!({"name": "Dip", "sets": 3, "reps": 8, "rest_time": "abc"}))
            .validate()
            .unwrap();
        assert_eq!(parsed.rest_time, DEFAULT_REST_TIME_SECONDS);

        let parsed = fields(json!({"name": "Dip", "sets": 3, "reps": 8, "restTime": 0}))
            .validate()
            .unwrap();
        assert_eq!(parsed.rest_time, 0);

        let parsed = fields(json!({"name": "Dip", "sets": 3, "reps": 8, "rest_time": 90}))
            .validate()
            .unwrap();
        assert_eq!(parsed.rest_time, 90);
    }
}
