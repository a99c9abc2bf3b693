// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! User model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User account stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Opaque user ID (also used as document ID)
    pub id: String,
    /// Unique login handle
    pub username: String,
    /// Argon2id hash in PHC string format
    pub password_hash: String,
    /// When the account was registered
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: &str, password_hash: String, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.to_string(),
            password_hash,
            created_at: now,
        }
    }
}
