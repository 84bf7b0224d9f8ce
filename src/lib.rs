// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! StayHaven: book and host stays backed by Google sign-in and Stripe payouts
//!
//! This crate provides the backend API for viewer identity resolution:
//! OAuth login, silent cookie re-authentication, session token rotation,
//! and linking host payout accounts.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use std::sync::Arc;

use config::Config;
use db::FirestoreDb;
use services::{StripeService, ViewerService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub viewer: ViewerService,
    pub stripe: StripeService,
    /// Signing key for the session cookie jar, derived once at boot.
    pub cookie_key: Key,
}

/// Local wrapper the signed-cookie extractor pulls out of the shared state;
/// coherence rules out implementing `FromRef<Arc<AppState>>` for the foreign
/// `Key` type directly.
#[derive(Clone)]
pub struct CookieKey(Key);

impl From<CookieKey> for Key {
    fn from(key: CookieKey) -> Self {
        key.0
    }
}

impl FromRef<Arc<AppState>> for CookieKey {
    fn from_ref(state: &Arc<AppState>) -> Self {
        CookieKey(state.cookie_key.clone())
    }
}
