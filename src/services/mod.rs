// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod exercise_input;
pub mod password;
pub mod progress;
pub mod session;

pub use exercise_input::{ExerciseFields, ExerciseInputError, NewExercise, NumericInput};
pub use progress::{group_progress, ExerciseSeries, ProgressPoint, ProgressRecord};
pub use session::{save_session, SavedSession, SessionRequest};
