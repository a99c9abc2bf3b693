// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Draft exercise list for the session in progress.
//!
//! Entries are validated as they are added and sent to the server in one
//! request when the session is saved.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::client::api::{ApiClient, ClientError};
use crate::client::suggestions::NameSuggestions;
use crate::routes::workouts::SessionSavedResponse;

/// One exercise logged during the session.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftEntry {
    /// Local handle for removal; never sent to the server
    pub local_id: u64,
    pub name: String,
    pub weight: f64,
    pub reps: u32,
    pub sets: u32,
}

/// Why an entry could not be added.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EntryError {
    #[error("Please fill in the {0} field")]
    Missing(&'static str),

    #[error("Weight must be a non-negative number")]
    InvalidWeight,

    #[error("Reps must be a positive whole number")]
    InvalidReps,

    #[error("Sets must be a positive whole number")]
    InvalidSets,
}

impl From<EntryError> for ClientError {
    fn from(err: EntryError) -> Self {
        ClientError::Validation(err.to_string())
    }
}

/// Exercise as sent in a session save.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionEntry {
    pub name: String,
    pub weight: f64,
    pub reps: u32,
    pub sets: u32,
}

/// Body of `POST /api/workouts/session`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
    pub exercises: Vec<SessionEntry>,
    /// Active session length in seconds
    pub duration: u64,
    pub start_time: DateTime<Utc>,
}

/// Ordered draft entries plus the in-flight save flag.
#[derive(Debug, Default)]
pub struct SessionBuffer {
    entries: Vec<DraftEntry>,
    next_id: u64,
    saving: bool,
    suggestions: NameSuggestions,
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, EntryError> {
    let value = value.trim();
    if value.is_empty() {
        Err(EntryError::Missing(field))
    } else {
        Ok(value)
    }
}

fn positive_count(value: &str) -> Option<u32> {
    value.parse::<u32>().ok().filter(|v| *v > 0)
}

impl SessionBuffer {
    /// Buffer that records added names into `suggestions`.
    pub fn new(suggestions: NameSuggestions) -> Self {
        Self {
            suggestions,
            ..Default::default()
        }
    }

    pub fn entries(&self) -> &[DraftEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a save is in flight.
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn suggestions(&self) -> &NameSuggestions {
        &self.suggestions
    }

    pub fn suggestions_mut(&mut self) -> &mut NameSuggestions {
        &mut self.suggestions
    }

    /// Validate and append an entry from raw form fields.
    ///
    /// On error the buffer is unchanged. Returns the new entry's local id.
    pub fn add_entry(
        &mut self,
        name: &str,
        weight: &str,
        reps: &str,
        sets: &str,
    ) -> Result<u64, EntryError> {
        let name = required("exercise name", name)?;
        let weight = required("weight", weight)?;
        let reps = required("reps", reps)?;
        let sets = required("sets", sets)?;

        let weight = weight
            .parse::<f64>()
            .ok()
            .filter(|w| w.is_finite() && *w >= 0.0)
            .ok_or(EntryError::InvalidWeight)?;
        let reps = positive_count(reps).ok_or(EntryError::InvalidReps)?;
        let sets = positive_count(sets).ok_or(EntryError::InvalidSets)?;

        self.next_id += 1;
        let local_id = self.next_id;
        self.entries.push(DraftEntry {
            local_id,
            name: name.to_string(),
            weight,
            reps,
            sets,
        });
        self.suggestions.insert(name);

        Ok(local_id)
    }

    /// Remove one entry. Returns `false` if no entry has that id.
    pub fn remove_entry(&mut self, local_id: u64) -> bool {
        match self.entries.iter().position(|e| e.local_id == local_id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Drop every entry (session cancelled).
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Begin a save: check the buffer, mark it as saving and build the
    /// request body.
    pub fn prepare_submit(
        &mut self,
        duration_seconds: u64,
        started_at: DateTime<Utc>,
    ) -> Result<SessionPayload, ClientError> {
        if self.entries.is_empty() {
            return Err(ClientError::Validation(
                "Please add at least one exercise before saving".to_string(),
            ));
        }
        if self.saving {
            return Err(ClientError::InFlight);
        }

        self.saving = true;
        Ok(SessionPayload {
            exercises: self
                .entries
                .iter()
                .map(|e| SessionEntry {
                    name: e.name.clone(),
                    weight: e.weight,
                    reps: e.reps,
                    sets: e.sets,
                })
                .collect(),
            duration: duration_seconds,
            start_time: started_at,
        })
    }

    /// Finish a save started with [`prepare_submit`](Self::prepare_submit).
    /// The entries are cleared only if the save succeeded.
    pub fn complete_submit(&mut self, succeeded: bool) {
        self.saving = false;
        if succeeded {
            self.entries.clear();
        }
    }

    /// Save the buffered entries as one session.
    pub async fn submit(
        &mut self,
        client: &ApiClient,
        duration_seconds: u64,
        started_at: DateTime<Utc>,
    ) -> Result<SessionSavedResponse, ClientError> {
        let payload = self.prepare_submit(duration_seconds, started_at)?;
        let result = client.save_session(&payload).await;
        self.complete_submit(result.is_ok());
        result
    }
}
