// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse an RFC3339 timestamp into UTC, returning `None` if malformed.
pub fn parse_utc_rfc3339(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Name given to workouts created from a saved session.
pub fn session_workout_name(now: DateTime<Utc>) -> String {
    format!("Workout Session - {}", now.format("%Y-%m-%d %H:%M:%S"))
}

/// Human-readable session duration stored in the workout notes.
pub fn duration_notes(duration_seconds: u64) -> String {
    format!(
        "Duration: {}m {}s",
        duration_seconds / 60,
        duration_seconds % 60
    )
}
