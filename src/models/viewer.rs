// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Viewer wire projection.
//!
//! The `Viewer` is the response-only view of the resolved session identity.
//! It is never persisted; every login/logout resolution derives a fresh one
//! from the `User` record (or from its absence). Field names are part of the
//! wire contract and serialize in camelCase.

use serde::Serialize;

use crate::models::User;

/// Client-facing projection of the current session identity.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Computed at projection time: `true` when a wallet id exists,
    /// otherwise omitted entirely, never `false`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_wallet: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Marks that a login/logout resolution was attempted, distinguishing
    /// "asked and found nothing" from "not yet asked".
    pub did_request: bool,
}

impl Viewer {
    /// Project a resolved user into the wire shape.
    pub fn of(user: &User) -> Self {
        Self {
            id: Some(user.id.clone()),
            has_wallet: user.wallet_id.is_some().then_some(true),
            token: Some(user.token.clone()),
            avatar: Some(user.avatar.clone()),
            did_request: true,
        }
    }

    /// Projection for a resolution that found no session.
    pub fn anonymous() -> Self {
        Self {
            id: None,
            has_wallet: None,
            token: None,
            avatar: None,
            did_request: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(wallet_id: Option<&str>) -> User {
        User {
            id: "g-1".to_string(),
            token: "1f".repeat(16),
            name: "Ann".to_string(),
            avatar: "http://a".to_string(),
            contact: "a@x.com".to_string(),
            wallet_id: wallet_id.map(str::to_string),
            income: 0,
            listings: Vec::new(),
            bookings: Vec::new(),
        }
    }

    #[test]
    fn test_projection_of_user_without_wallet() {
        let viewer = Viewer::of(&sample_user(None));
        assert_eq!(viewer.id.as_deref(), Some("g-1"));
        assert_eq!(viewer.avatar.as_deref(), Some("http://a"));
        assert!(viewer.did_request);
        // hasWallet is computed, and absent rather than false.
        assert_eq!(viewer.has_wallet, None);
    }

    #[test]
    fn test_projection_of_user_with_wallet() {
        let viewer = Viewer::of(&sample_user(Some("acct_123")));
        assert_eq!(viewer.has_wallet, Some(true));
    }

    #[test]
    fn test_anonymous_projection_only_marks_the_attempt() {
        let viewer = Viewer::anonymous();
        assert!(viewer.did_request);
        assert!(viewer.id.is_none());
        assert!(viewer.token.is_none());
        assert!(viewer.avatar.is_none());
        assert!(viewer.has_wallet.is_none());
    }
}
