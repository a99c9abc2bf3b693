// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! An active workout session: timer, ticker and draft buffer together.

use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;

use crate::client::api::{ApiClient, ClientError};
use crate::client::buffer::{EntryError, SessionBuffer};
use crate::client::suggestions::NameSuggestions;
use crate::client::timer::{spawn_ticker, Clock, ElapsedTimer, Ticker};
use crate::routes::workouts::SessionSavedResponse;

/// Session state shared between the UI event handlers and the ticker.
pub struct ActiveSession {
    timer: Arc<Mutex<ElapsedTimer>>,
    buffer: Mutex<SessionBuffer>,
    clock: Clock,
    ticker: Mutex<Option<Ticker>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ActiveSession {
    /// Start a session now. Must be called inside a tokio runtime.
    pub fn start(clock: Clock, suggestions: NameSuggestions) -> Self {
        let timer = Arc::new(Mutex::new(ElapsedTimer::start(clock())));
        let ticker = spawn_ticker(timer.clone(), clock.clone());

        Self {
            timer,
            buffer: Mutex::new(SessionBuffer::new(suggestions)),
            clock,
            ticker: Mutex::new(Some(ticker)),
        }
    }

    /// Displayed elapsed seconds, updated once per second.
    pub fn elapsed(&self) -> Option<watch::Receiver<u64>> {
        lock(&self.ticker).as_ref().map(Ticker::subscribe)
    }

    pub fn elapsed_secs(&self) -> u64 {
        lock(&self.timer).elapsed_secs((self.clock)())
    }

    pub fn on_hidden(&self) {
        lock(&self.timer).on_hidden((self.clock)());
    }

    pub fn on_visible(&self) {
        lock(&self.timer).on_visible((self.clock)());
    }

    pub fn on_unload(&self) {
        lock(&self.timer).on_unload((self.clock)());
    }

    pub fn add_entry(
        &self,
        name: &str,
        weight: &str,
        reps: &str,
        sets: &str,
    ) -> Result<u64, EntryError> {
        lock(&self.buffer).add_entry(name, weight, reps, sets)
    }

    pub fn remove_entry(&self, local_id: u64) -> bool {
        lock(&self.buffer).remove_entry(local_id)
    }

    pub fn entry_count(&self) -> usize {
        lock(&self.buffer).len()
    }

    pub fn is_saving(&self) -> bool {
        lock(&self.buffer).is_saving()
    }

    /// Autocomplete suggestions for a partially typed name.
    pub fn suggest(&self, query: &str, limit: usize) -> Vec<String> {
        lock(&self.buffer)
            .suggestions()
            .suggest(query, limit)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Refresh the suggestion cache from the server-side history.
    pub async fn refresh_suggestions(&self, client: &ApiClient) -> Result<usize, ClientError> {
        let rows = client.workouts().await?;
        Ok(lock(&self.buffer)
            .suggestions_mut()
            .merge(rows.iter().map(|r| r.exercise.as_str())))
    }

    /// Save the session.
    ///
    /// The timer keeps running while the request is in flight. On success
    /// the timer and ticker are stopped; on failure everything is kept so
    /// the save can be retried. A second save while one is in flight is
    /// rejected with [`ClientError::InFlight`].
    pub async fn save(&self, client: &ApiClient) -> Result<SessionSavedResponse, ClientError> {
        let (duration, started_at) = {
            let timer = lock(&self.timer);
            (
                timer.elapsed_secs((self.clock)()),
                timer.session_started_at(),
            )
        };

        let payload = lock(&self.buffer).prepare_submit(duration, started_at)?;
        let result = client.save_session(&payload).await;
        lock(&self.buffer).complete_submit(result.is_ok());

        match &result {
            Ok(saved) => {
                lock(&self.timer).stop((self.clock)());
                lock(&self.ticker).take();
                tracing::info!(
                    workout_id = %saved.workout_id,
                    duration_seconds = duration,
                    "Workout session saved"
                );
            }
            Err(e) => tracing::warn!(error = %e, "Workout session save failed"),
        }

        result
    }

    /// Discard the session without contacting the server. Returns the
    /// elapsed seconds at the time of cancellation.
    pub fn cancel(self) -> u64 {
        let elapsed = lock(&self.timer).stop((self.clock)());
        lock(&self.buffer).clear();
        lock(&self.ticker).take();
        elapsed
    }
}
