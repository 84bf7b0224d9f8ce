//! Application configuration loaded from environment variables.
//!
//! Secrets are read once at startup and cached in memory; in production the
//! deployment injects them as environment variables.

use std::env;

/// Minimum length of the cookie signing key. The signed-cookie jar derives
/// its key from these bytes and refuses anything shorter.
const MIN_COOKIE_KEY_BYTES: usize = 32;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Google OAuth client ID (public)
    pub google_client_id: String,
    /// Redirect URL registered with Google for the OAuth callback
    pub google_redirect_url: String,
    /// Frontend URL for CORS and cookie-security decisions
    pub frontend_url: String,
    /// GCP project ID (Firestore)
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,

    // --- Secrets ---
    /// Google OAuth client secret
    pub google_client_secret: String,
    /// Stripe secret key used for the Connect code exchange
    pub stripe_secret_key: String,
    /// Key material for signing the session cookie (raw bytes)
    pub cookie_signing_key: Vec<u8>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let cookie_signing_key = env::var("COOKIE_SIGNING_KEY")
            .map_err(|_| ConfigError::Missing("COOKIE_SIGNING_KEY"))?
            .into_bytes();
        if cookie_signing_key.len() < MIN_COOKIE_KEY_BYTES {
            return Err(ConfigError::Invalid(
                "COOKIE_SIGNING_KEY must be at least 32 bytes",
            ));
        }

        Ok(Self {
            // Non-sensitive config from env
            google_client_id: env::var("GOOGLE_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("GOOGLE_CLIENT_ID"))?,
            google_redirect_url: env::var("GOOGLE_REDIRECT_URL")
                .map_err(|_| ConfigError::Missing("GOOGLE_REDIRECT_URL"))?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "9000".to_string())
                .parse()
                .unwrap_or(9000),

            // Secrets - injected as env vars by the deployment
            google_client_secret: env::var("GOOGLE_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("GOOGLE_CLIENT_SECRET"))?,
            stripe_secret_key: env::var("STRIPE_SECRET_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRIPE_SECRET_KEY"))?,
            cookie_signing_key,
        })
    }

    /// Whether session cookies should carry the `Secure` attribute.
    ///
    /// Local development serves the frontend over plain HTTP on localhost;
    /// everywhere else the cookie is HTTPS-only.
    pub fn secure_cookies(&self) -> bool {
        !(self.frontend_url.starts_with("http://localhost")
            || self.frontend_url.starts_with("http://127.0.0.1"))
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            google_client_id: "test_google_client_id".to_string(),
            google_redirect_url: "http://localhost:9000/login".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 9000,
            google_client_secret: "test_google_secret".to_string(),
            stripe_secret_key: "sk_test_secret".to_string(),
            cookie_signing_key: b"stayhaven-test-cookie-signing-key-needs-32-bytes-or-more!"
                .to_vec(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}
