// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client library for recording a workout session.
//!
//! - [`timer`]: visible-time tracking and the once-per-second ticker
//! - [`buffer`]: draft exercise list saved as one request
//! - [`suggestions`]: exercise-name cache for autocomplete
//! - [`api`]: typed HTTP client
//! - [`session`]: the pieces above combined for one active session

pub mod api;
pub mod buffer;
pub mod session;
pub mod suggestions;
pub mod timer;

pub use api::{ApiClient, ClientError};
pub use buffer::{DraftEntry, EntryError, SessionBuffer, SessionPayload};
pub use session::ActiveSession;
pub use suggestions::NameSuggestions;
pub use timer::{format_elapsed, spawn_ticker, system_clock, Clock, ElapsedTimer, Ticker};
