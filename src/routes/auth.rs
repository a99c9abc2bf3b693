// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account registration, login and logout.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use axum_extra::extract::{
    cookie::{Cookie, CookieJar, SameSite},
    WithRejection,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::config::SESSION_COOKIE;
use crate::error::{AppError, AppJson, Result};
use crate::middleware::auth::create_jwt;
use crate::models::User;
use crate::services::password::{hash_password, verify_password};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/register", post(register))
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
}

/// Username/password body shared by register and login.
#[derive(Debug, Deserialize, Validate)]
pub struct Credentials {
    #[serde(default)]
    #[validate(length(min = 1, max = 64, message = "Username must be 1-64 characters"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 256, message = "Password is required"))]
    pub password: String,
}

impl Credentials {
    /// Trim the username and validate both fields.
    fn normalized(mut self) -> Result<Self> {
        self.username = self.username.trim().to_string();
        self.validate()?;
        Ok(self)
    }
}

/// Public view of an account.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
}

/// Response for a successful register or login.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionResponse {
    pub token: String,
    pub user: UserSummary,
}

/// Issue a token for `user` and attach it as the session cookie.
fn start_session(
    state: &AppState,
    jar: CookieJar,
    user: &User,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let token = create_jwt(
        &user.id,
        &state.config.jwt_signing_key,
        state.config.token_ttl_hours,
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.secure_cookies())
        .path("/")
        .max_age(time::Duration::hours(state.config.token_ttl_hours));

    Ok((
        jar.add(cookie),
        Json(SessionResponse {
            token,
            user: UserSummary {
                id: user.id.clone(),
                username: user.username.clone(),
            },
        }),
    ))
}

/// Create an account and log it in.
async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    WithRejection(Json(payload), _): AppJson<Credentials>,
) -> Result<(StatusCode, CookieJar, Json<SessionResponse>)> {
    let payload = payload.normalized()?;

    let password = payload.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing task failed: {}", e)))??;

    let user = User::new(&payload.username, password_hash, chrono::Utc::now());
    state.db.create_user(&user).await?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    let (jar, body) = start_session(&state, jar, &user)?;
    Ok((StatusCode::CREATED, jar, body))
}

/// Verify credentials and issue a session token.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    WithRejection(Json(payload), _): AppJson<Credentials>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let payload = payload.normalized()?;

    let user = state
        .db
        .find_user_by_username(&payload.username)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let password = payload.password;
    let hash = user.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password check task failed: {}", e)))??;

    if !valid {
        tracing::info!(username = %payload.username, "Rejected login");
        return Err(AppError::InvalidCredentials);
    }

    tracing::info!(user_id = %user.id, "User logged in");
    start_session(&state, jar, &user)
}

/// Clear the session cookie. Bearer tokens simply expire.
async fn logout(jar: CookieJar) -> (StatusCode, CookieJar) {
    (
        StatusCode::NO_CONTENT,
        jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_are_trimmed_and_validated() {
        let creds = Credentials {
            username: "  admin ".to_string(),
            password: "admin123".to_string(),
        }
        .normalized()
        .unwrap();
        assert_eq!(creds.username, "admin");

        let err = Credentials {
            username: "   ".to_string(),
            password: "admin123".to_string(),
        }
        .normalized()
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = Credentials {
            username: "admin".to_string(),
            password: String::new(),
        }
        .normalized()
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
