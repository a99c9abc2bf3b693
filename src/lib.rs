// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workout Tracker: log workout sessions and chart exercise progress.
//!
//! This crate provides the backend API for storing workouts, folders and
//! exercises, the aggregation engine behind the dashboard statistics and
//! progress charts, and a client library with the session timer and
//! exercise buffer used while a workout is in progress.

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Database;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
}
