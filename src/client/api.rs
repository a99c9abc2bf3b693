// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Typed HTTP client for the workout API.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::client::buffer::SessionPayload;
use crate::models::{ExerciseRow, UserStats, WorkoutSummary};
use crate::routes::auth::SessionResponse;
use crate::routes::workouts::SessionSavedResponse;
use crate::services::progress::ExerciseSeries;

/// Default request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Client-side failures.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Unable to reach the server: {0}")]
    Unreachable(String),

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("{0}")]
    Validation(String),

    #[error("A save is already in progress")]
    InFlight,

    #[error("Unexpected response from server: {0}")]
    Decode(String),
}

/// Error body produced by the server.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    details: Option<String>,
}

#[derive(Serialize)]
struct CredentialsBody<'a> {
    username: &'a str,
    password: &'a str,
}

/// HTTP client holding the base URL and the current bearer token.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Client for a server at `base_url` (e.g. `http://localhost:8080`).
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ClientError::Unreachable(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    // ─── Account ─────────────────────────────────────────────────

    /// Register a new account and keep its token.
    pub async fn register(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<SessionResponse, ClientError> {
        self.authenticate("/api/register", username, password).await
    }

    /// Log in and keep the token.
    pub async fn login(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<SessionResponse, ClientError> {
        self.authenticate("/api/login", username, password).await
    }

    /// Forget the token locally and clear the server cookie.
    pub async fn logout(&mut self) -> Result<(), ClientError> {
        let response = self
            .request(reqwest::Method::POST, "/api/logout")
            .send()
            .await
            .map_err(transport_error)?;
        self.token = None;
        check_response(response).await.map(|_| ())
    }

    async fn authenticate(
        &mut self,
        path: &str,
        username: &str,
        password: &str,
    ) -> Result<SessionResponse, ClientError> {
        let response = self
            .http
            .post(self.url(path))
            .json(&CredentialsBody { username, password })
            .send()
            .await
            .map_err(transport_error)?;

        let session: SessionResponse = check_response_json(response).await?;
        self.token = Some(session.token.clone());
        Ok(session)
    }

    // ─── Workouts ────────────────────────────────────────────────

    /// Save a whole session in one request.
    pub async fn save_session(
        &self,
        payload: &SessionPayload,
    ) -> Result<SessionSavedResponse, ClientError> {
        let response = self
            .request(reqwest::Method::POST, "/api/workouts/session")
            .json(payload)
            .send()
            .await
            .map_err(transport_error)?;

        check_response_json(response).await
    }

    /// Flattened exercise history.
    pub async fn workouts(&self) -> Result<Vec<ExerciseRow>, ClientError> {
        self.get_json("/api/workouts").await
    }

    pub async fn summaries(&self) -> Result<Vec<WorkoutSummary>, ClientError> {
        self.get_json("/api/workouts/summaries").await
    }

    pub async fn stats(&self) -> Result<UserStats, ClientError> {
        self.get_json("/api/workouts/stats").await
    }

    pub async fn progress(&self) -> Result<Vec<ExerciseSeries>, ClientError> {
        self.get_json("/api/workouts/progress").await
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self
            .request(reqwest::Method::GET, path)
            .send()
            .await
            .map_err(transport_error)?;

        check_response_json(response).await
    }
}

fn transport_error(err: reqwest::Error) -> ClientError {
    tracing::warn!(error = %err, "Request failed before a response arrived");
    ClientError::Unreachable(err.to_string())
}

/// Check response status and turn an error body into [`ClientError::Server`].
async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(ErrorBody {
            details: Some(details),
            ..
        }) => details,
        Ok(ErrorBody { error, .. }) => error,
        Err(_) if !body.trim().is_empty() => body,
        Err(_) => format!("HTTP {}", status),
    };

    Err(ClientError::Server {
        status: status.as_u16(),
        message,
    })
}

/// Check response and parse JSON body.
async fn check_response_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    check_response(response)
        .await?
        .json()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))
}
