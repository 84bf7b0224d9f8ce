// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum_extra::extract::cookie::Key;
use std::sync::Arc;

use stayhaven::config::Config;
use stayhaven::db::FirestoreDb;
use stayhaven::models::User;
use stayhaven::routes::create_router;
use stayhaven::services::google::{
    PersonEmail, PersonMetadata, PersonName, PersonPhoto, PersonResponse, PersonSource,
};
use stayhaven::services::{GoogleService, StripeService, ViewerService};
use stayhaven::AppState;

/// People API profile for the canonical test user ("Ann", id `g-1`).
#[allow(dead_code)]
pub fn complete_profile() -> PersonResponse {
    PersonResponse {
        names: vec![PersonName {
            display_name: Some("Ann".to_string()),
            metadata: Some(PersonMetadata {
                source: Some(PersonSource {
                    id: Some("g-1".to_string()),
                }),
            }),
        }],
        photos: vec![PersonPhoto {
            url: Some("http://a".to_string()),
        }],
        email_addresses: vec![PersonEmail {
            value: Some("a@x.com".to_string()),
        }],
    }
}

/// A stored user with a known session token.
#[allow(dead_code)]
pub fn stored_user(id: &str, token: &str) -> User {
    User {
        id: id.to_string(),
        token: token.to_string(),
        name: "Ann".to_string(),
        avatar: "http://a".to_string(),
        contact: "a@x.com".to_string(),
        wallet_id: None,
        income: 0,
        listings: Vec::new(),
        bookings: Vec::new(),
    }
}

/// Create a test app with offline mock dependencies and happy-path
/// provider behavior. Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with(Some(complete_profile()), Some("acct_123".to_string()))
}

/// Create a test app with specific mock provider behavior.
#[allow(dead_code)]
pub fn create_test_app_with(
    google_profile: Option<PersonResponse>,
    stripe_wallet: Option<String>,
) -> (axum::Router, Arc<AppState>) {
    build_app(Config::test_default(), google_profile, stripe_wallet)
}

/// Create a test app with a specific frontend URL (drives the cookie
/// `Secure` attribute).
#[allow(dead_code)]
pub fn create_test_app_with_frontend_url(frontend_url: &str) -> (axum::Router, Arc<AppState>) {
    let mut config = Config::test_default();
    config.frontend_url = frontend_url.to_string();
    build_app(config, Some(complete_profile()), Some("acct_123".to_string()))
}

fn build_app(
    config: Config,
    google_profile: Option<PersonResponse>,
    stripe_wallet: Option<String>,
) -> (axum::Router, Arc<AppState>) {
    let db = FirestoreDb::new_mock();
    let google = GoogleService::new_mock(google_profile);
    let stripe = StripeService::new_mock(stripe_wallet);
    let viewer = ViewerService::new(db.clone(), google);
    let cookie_key = Key::derive_from(&config.cookie_signing_key);

    let state = Arc::new(AppState {
        config,
        db,
        viewer,
        stripe,
        cookie_key,
    });

    (create_router(state.clone()), state)
}

/// Sign a viewer cookie the way the server's jar does, for requests that
/// present an existing session. Returns a `Cookie` request-header value.
#[allow(dead_code)]
pub fn signed_viewer_cookie(config: &Config, user_id: &str) -> String {
    let key = Key::derive_from(&config.cookie_signing_key);
    let mut jar = cookie::CookieJar::new();
    jar.signed_mut(&key)
        .add(cookie::Cookie::new("viewer", user_id.to_string()));
    let signed = jar.get("viewer").expect("cookie was just added");
    format!("viewer={}", signed.value())
}
