// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod exercise;
pub mod folder;
pub mod stats;
pub mod user;
pub mod workout;

pub use exercise::{Exercise, ExerciseResponse};
pub use folder::Folder;
pub use stats::UserStats;
pub use user::User;
pub use workout::{ExerciseRow, Workout, WorkoutHistory, WorkoutSummary};
