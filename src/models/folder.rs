// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Folder model: an optional grouping of workouts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Color used when a folder is created without one.
pub const DEFAULT_FOLDER_COLOR: &str = "#3B82F6";

/// Folder record stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    /// Folder ID (also used as document ID)
    pub id: String,
    /// Owner
    pub user_id: String,
    /// Display name (trimmed, never empty)
    pub name: String,
    /// Color tag, e.g. "#3B82F6"
    pub color: String,
    /// When the folder was created
    pub created_at: DateTime<Utc>,
}

impl Folder {
    pub fn new(user_id: &str, name: &str, color: Option<&str>, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name: name.trim().to_string(),
            color: normalize_color(color),
            created_at: now,
        }
    }
}

/// Use the default color when none (or a blank one) is supplied.
pub fn normalize_color(color: Option<&str>) -> String {
    match color.map(str::trim) {
        Some(c) if !c.is_empty() => c.to_string(),
        _ => DEFAULT_FOLDER_COLOR.to_string(),
    }
}
