// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Viewer identity resolution.
//!
//! Decides, for every login call, whether the caller is completing a fresh
//! OAuth exchange, silently re-authenticating through the session cookie,
//! or unauthenticated, rotating the persisted session token in all paths
//! that find a user. Also answers the authorization re-check that
//! sensitive mutations (wallet linking) gate on.
//!
//! All session state lives in the user document plus the client-held
//! cookie. Nothing is cached in process: concurrent logins for one user
//! are last-write-wins on the token field, and the losing client simply
//! fails its next authorization check.

use subtle::ConstantTimeEq;

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::User;
use crate::services::google::GoogleService;
use crate::session;

/// Outcome of a login resolution.
///
/// `Created` is a completed OAuth exchange (the caller must set the session
/// cookie), `Refreshed` a cookie re-authentication (cookie stays as-is),
/// `NoSession` a resolution that found nobody (the caller clears the
/// cookie). Finding no session is a normal outcome, not an error.
#[derive(Debug)]
pub enum SessionOutcome {
    Created(User),
    Refreshed(User),
    NoSession,
}

/// High-level viewer resolution service.
#[derive(Clone)]
pub struct ViewerService {
    db: FirestoreDb,
    google: GoogleService,
}

impl ViewerService {
    pub fn new(db: FirestoreDb, google: GoogleService) -> Self {
        Self { db, google }
    }

    /// The provider consent URL the client should send the browser to.
    pub fn auth_url(&self) -> String {
        self.google.auth_url()
    }

    /// Resolve a login call.
    ///
    /// A fresh token is minted before branching, so every call spends a
    /// token value whether or not anyone is found. Provider errors
    /// (`AuthProvider`, `ProfileIncomplete`) pass through untouched; any
    /// other failure is wrapped in `LoginFailed` so a half-run resolution
    /// never surfaces as a viewer.
    pub async fn log_in(
        &self,
        code: Option<&str>,
        cookie_user_id: Option<&str>,
    ) -> Result<SessionOutcome, AppError> {
        let token = session::mint_token().map_err(AppError::into_login_failure)?;

        match code {
            Some(code) => self
                .log_in_via_oauth(code, &token)
                .await
                .map(SessionOutcome::Created)
                .map_err(AppError::into_login_failure),
            None => self
                .log_in_via_cookie(cookie_user_id, &token)
                .await
                .map_err(AppError::into_login_failure),
        }
    }

    /// OAuth path: exchange the code, extract the identity, upsert the user
    /// with the fresh token.
    async fn log_in_via_oauth(&self, code: &str, token: &str) -> Result<User, AppError> {
        let profile = self
            .google
            .exchange_code(code)
            .await?
            .ok_or_else(|| AppError::AuthProvider("no profile returned".to_string()))?;
        let identity = profile.identity()?;

        let (user, created) = match self.db.get_user(&identity.id).await? {
            Some(mut user) => {
                user.name = identity.name;
                user.avatar = identity.avatar;
                user.contact = identity.contact;
                user.token = token.to_string();
                (user, false)
            }
            None => (User::from_identity(identity, token.to_string()), true),
        };

        self.db.upsert_user(&user).await?;

        tracing::info!(user_id = %user.id, created, "OAuth login resolved");

        Ok(user)
    }

    /// Cookie path: rotate the token on the user named by the cookie, if
    /// one exists. A cookie naming nobody resolves to no session.
    async fn log_in_via_cookie(
        &self,
        cookie_user_id: Option<&str>,
        token: &str,
    ) -> Result<SessionOutcome, AppError> {
        let Some(user_id) = cookie_user_id else {
            return Ok(SessionOutcome::NoSession);
        };

        match self.db.rotate_user_token(user_id, token).await? {
            Some(user) => {
                tracing::info!(user_id = %user.id, "Cookie login resolved");
                Ok(SessionOutcome::Refreshed(user))
            }
            None => {
                tracing::debug!(user_id = %user_id, "Session cookie names no known user");
                Ok(SessionOutcome::NoSession)
            }
        }
    }

    /// Re-derive the caller for a sensitive mutation.
    ///
    /// The cookie identifies *who*, the presented header token proves the
    /// session is still the current one. Succeeds only when both are
    /// present, the user exists, and the tokens match; the comparison is
    /// constant-time since the persisted token is the secret here. A stale
    /// cookie is left in place; a superseded session should not log out
    /// the browser that superseded it.
    pub async fn authorize(
        &self,
        cookie_user_id: Option<&str>,
        presented_token: Option<&str>,
    ) -> Result<Option<User>, AppError> {
        let (Some(user_id), Some(presented)) = (cookie_user_id, presented_token) else {
            return Ok(None);
        };

        let Some(user) = self.db.get_user(user_id).await? else {
            return Ok(None);
        };

        let token_matches: bool = user.token.as_bytes().ct_eq(presented.as_bytes()).into();
        Ok(token_matches.then_some(user))
    }
}
