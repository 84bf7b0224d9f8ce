// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Stripe Connect client for linking host payout accounts.

use serde::Deserialize;

use crate::error::AppError;

const TOKEN_URL: &str = "https://connect.stripe.com/oauth/token";

/// Stripe Connect OAuth client.
#[derive(Clone)]
pub struct StripeService {
    http: Option<reqwest::Client>,
    secret_key: String,
    #[cfg(debug_assertions)]
    mock_wallet: Option<String>,
}

impl StripeService {
    /// Create a new Stripe client with the platform secret key.
    pub fn new(secret_key: String) -> Self {
        Self {
            http: Some(reqwest::Client::new()),
            secret_key,
            #[cfg(debug_assertions)]
            mock_wallet: None,
        }
    }

    /// Create a mock Stripe service for testing (offline mode).
    ///
    /// `connect` resolves to the canned account id, or to a
    /// [`AppError::PaymentProvider`] error when `None`. Only available in
    /// debug/test builds.
    #[cfg(debug_assertions)]
    pub fn new_mock(wallet: Option<String>) -> Self {
        Self {
            http: None,
            secret_key: "sk_mock".to_string(),
            mock_wallet: wallet,
        }
    }

    /// Exchange a Connect authorization code for the connected account id.
    pub async fn connect(&self, code: &str) -> Result<String, AppError> {
        // Mock mode (Debug builds only)
        #[cfg(debug_assertions)]
        {
            if self.http.is_none() {
                return self.mock_wallet.clone().ok_or_else(|| {
                    AppError::PaymentProvider("grant returned no account id".to_string())
                });
            }
        }

        let http = self
            .http
            .as_ref()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Stripe client not connected")))?;

        let response = http
            .post(TOKEN_URL)
            .form(&[
                ("client_secret", self.secret_key.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::PaymentProvider(format!("Connect request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::PaymentProvider(format!(
                "Connect failed: HTTP {}: {}",
                status, body
            )));
        }

        let grant: ConnectResponse = response
            .json()
            .await
            .map_err(|e| AppError::PaymentProvider(format!("JSON parse error: {}", e)))?;

        grant
            .stripe_user_id
            .ok_or_else(|| AppError::PaymentProvider("grant returned no account id".to_string()))
    }
}

/// OAuth connect response; the connected account id is all we keep.
#[derive(Debug, Deserialize)]
struct ConnectResponse {
    #[serde(default)]
    stripe_user_id: Option<String>,
}
