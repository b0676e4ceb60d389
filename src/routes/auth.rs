// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Single-user password login backed by a session cookie.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::middleware::auth::{authenticate, create_jwt, SESSION_COOKIE, SESSION_TTL_DAYS};
use crate::routes::json_object;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
        .route("/api/me", get(me))
}

#[derive(Debug, Default, Deserialize, Validate)]
struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    username: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    password: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LoginResponse {
    pub ok: bool,
    pub username: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LogoutResponse {
    pub ok: bool,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MeResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

fn session_cookie(value: String, config: &Config) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure_cookies)
        .max_age(time::Duration::days(SESSION_TTL_DAYS))
        .build()
}

/// True if `username`/`password` match the configured account.
fn check_credentials(config: &Config, username: &str, password: &str) -> bool {
    let name_ok: bool = username
        .as_bytes()
        .ct_eq(config.app_username.as_bytes())
        .into();

    // Always run the hash check, even when the name is wrong
    let password_ok = match PasswordHash::new(&config.app_password_hash) {
        Ok(hash) => Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok(),
        Err(e) => {
            tracing::error!(error = %e, "APP_PASSWORD_HASH is not a valid PHC string");
            false
        }
    };

    name_ok && password_ok
}

/// Exchange credentials for a session cookie.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    body: Bytes,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    let body = json_object(&body)?;
    let mut req: LoginRequest = serde_json::from_value(body).unwrap_or_default();
    req.username = req.username.trim().to_string();

    if req.validate().is_err() {
        return Err(AppError::BadRequest("Missing credentials".to_string()));
    }

    if !check_credentials(&state.config, &req.username, &req.password) {
        tracing::warn!(username = %req.username, "Rejected login");
        return Err(AppError::InvalidCredentials);
    }

    let token = create_jwt(&req.username, &state.config.jwt_signing_key)?;
    tracing::info!(username = %req.username, "User logged in");

    Ok((
        jar.add(session_cookie(token, &state.config)),
        Json(LoginResponse {
            ok: true,
            username: req.username,
        }),
    ))
}

/// Clear the session cookie. Succeeds whether or not a session existed.
async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<LogoutResponse>) {
    (
        jar.remove(session_cookie(String::new(), &state.config)),
        Json(LogoutResponse { ok: true }),
    )
}

/// Report whether the request carries a valid session.
async fn me(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Json<MeResponse> {
    let user = authenticate(&state, &jar, &headers);
    Json(MeResponse {
        authenticated: user.is_some(),
        username: user.map(|u| u.username),
    })
}
