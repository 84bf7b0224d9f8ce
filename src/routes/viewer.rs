// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Viewer session routes: consent URL, login, logout.
//!
//! Operation and field names (`authUrl`, `logIn`, `logOut`, the `Viewer`
//! shape) are the wire contract and must not be renamed.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::{CookieJar, SignedCookieJar};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::Result;
use crate::models::Viewer;
use crate::services::SessionOutcome;
use crate::session;
use crate::{AppState, CookieKey};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/viewer/authUrl", get(auth_url))
        .route("/api/viewer/logIn", post(log_in))
        .route("/api/viewer/logOut", post(log_out))
}

#[derive(Serialize)]
pub struct AuthUrlResponse {
    #[serde(rename = "authUrl")]
    pub auth_url: String,
}

/// Login request body. The whole body is optional, as is the code inside:
/// a cookie re-authentication posts no code at all.
#[derive(Debug, Default, Deserialize)]
pub struct LogInRequest {
    #[serde(default)]
    pub input: Option<LogInInput>,
}

#[derive(Debug, Deserialize)]
pub struct LogInInput {
    pub code: Option<String>,
}

async fn auth_url(State(state): State<Arc<AppState>>) -> Json<AuthUrlResponse> {
    Json(AuthUrlResponse {
        auth_url: state.viewer.auth_url(),
    })
}

/// Resolve the caller's session and translate the outcome into cookie
/// changes plus the wire Viewer.
///
/// The expired cookie goes through a plain response jar rather than
/// `SignedCookieJar::remove`: the signed jar only emits a removal for a
/// cookie it verified, and the clear must reach the browser even when the
/// incoming cookie was absent or forged.
async fn log_in(
    State(state): State<Arc<AppState>>,
    jar: SignedCookieJar<CookieKey>,
    body: Option<Json<LogInRequest>>,
) -> Result<(SignedCookieJar<CookieKey>, CookieJar, Json<Viewer>)> {
    let code = body
        .as_ref()
        .and_then(|json| json.input.as_ref())
        .and_then(|input| input.code.as_deref());
    let cookie_user_id = jar
        .get(session::VIEWER_COOKIE)
        .map(|cookie| cookie.value().to_string());

    let outcome = state.viewer.log_in(code, cookie_user_id.as_deref()).await?;

    let secure = state.config.secure_cookies();
    let (jar, cleared, viewer) = match outcome {
        SessionOutcome::Created(user) => {
            let jar = jar.add(session::viewer_cookie(&user.id, secure));
            (jar, CookieJar::new(), Viewer::of(&user))
        }
        SessionOutcome::Refreshed(user) => (jar, CookieJar::new(), Viewer::of(&user)),
        SessionOutcome::NoSession => {
            let cleared = CookieJar::new().add(session::removal_cookie(secure));
            (jar, cleared, Viewer::anonymous())
        }
    };

    Ok((jar, cleared, Json(viewer)))
}

/// Clear the session cookie, whether or not the request carried one. The
/// persisted token is left alone: logout is a client-session operation,
/// not an account operation.
async fn log_out(State(state): State<Arc<AppState>>) -> (CookieJar, Json<Viewer>) {
    let cleared = CookieJar::new().add(session::removal_cookie(state.config.secure_cookies()));
    (cleared, Json(Viewer::anonymous()))
}
