// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! StayHaven API Server
//!
//! Serves viewer identity resolution for the booking marketplace: Google
//! OAuth login, silent cookie re-authentication, and Stripe wallet
//! linking for hosts.

use axum_extra::extract::cookie::Key;
use stayhaven::{
    config::Config,
    db::FirestoreDb,
    services::{GoogleService, StripeService, ViewerService},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting StayHaven API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Initialize provider clients
    let google = GoogleService::new(
        config.google_client_id.clone(),
        config.google_client_secret.clone(),
        config.google_redirect_url.clone(),
    );
    let stripe = StripeService::new(config.stripe_secret_key.clone());

    let viewer = ViewerService::new(db.clone(), google);

    // The cookie jar key is derived once here rather than per request
    let cookie_key = Key::derive_from(&config.cookie_signing_key);

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        viewer,
        stripe,
        cookie_key,
    });

    // Build router
    let app = stayhaven::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stayhaven=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
