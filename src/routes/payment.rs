// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wallet linking routes: connect and disconnect the Stripe account.
//!
//! Both mutations re-derive the caller through the cookie/header token
//! pair before touching the store, so an unauthorized call never leaves a
//! partial wallet write behind.

use axum::{extract::State, http::HeaderMap, routing::post, Json, Router};
use axum_extra::extract::SignedCookieJar;
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{User, Viewer};
use crate::session;
use crate::{AppState, CookieKey};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/viewer/connectStripe", post(connect_stripe))
        .route("/api/viewer/disconnectStripe", post(disconnect_stripe))
}

#[derive(Debug, Deserialize)]
pub struct ConnectStripeRequest {
    pub input: ConnectStripeInput,
}

#[derive(Debug, Deserialize)]
pub struct ConnectStripeInput {
    pub code: String,
}

/// Link a Stripe payout account to the caller.
async fn connect_stripe(
    State(state): State<Arc<AppState>>,
    jar: SignedCookieJar<CookieKey>,
    headers: HeaderMap,
    Json(request): Json<ConnectStripeRequest>,
) -> Result<Json<Viewer>> {
    let user = authorize(&state, &jar, &headers).await?;

    let wallet_id = state.stripe.connect(&request.input.code).await?;

    let updated = state
        .db
        .set_user_wallet(&user.id, Some(wallet_id))
        .await?
        .ok_or(AppError::StoreUpdate("viewer could not be updated"))?;

    tracing::info!(user_id = %updated.id, "Stripe wallet connected");

    Ok(Json(Viewer::of(&updated)))
}

/// Unlink the caller's Stripe payout account.
async fn disconnect_stripe(
    State(state): State<Arc<AppState>>,
    jar: SignedCookieJar<CookieKey>,
    headers: HeaderMap,
) -> Result<Json<Viewer>> {
    let user = authorize(&state, &jar, &headers).await?;

    let updated = state
        .db
        .set_user_wallet(&user.id, None)
        .await?
        .ok_or(AppError::StoreUpdate("viewer could not be updated"))?;

    tracing::info!(user_id = %updated.id, "Stripe wallet disconnected");

    Ok(Json(Viewer::of(&updated)))
}

/// Re-derive the caller from the cookie and presented token, or fail with
/// `NotAuthorized` before any write happens.
async fn authorize(
    state: &AppState,
    jar: &SignedCookieJar<CookieKey>,
    headers: &HeaderMap,
) -> Result<User> {
    let cookie_user_id = jar
        .get(session::VIEWER_COOKIE)
        .map(|cookie| cookie.value().to_string());
    let presented = headers
        .get(session::CSRF_HEADER)
        .and_then(|value| value.to_str().ok());

    state
        .viewer
        .authorize(cookie_user_id.as_deref(), presented)
        .await?
        .ok_or(AppError::NotAuthorized)
}
