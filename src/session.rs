// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session cookie and token helpers.
//!
//! The session lives in a signed cookie named [`VIEWER_COOKIE`] whose value
//! is the user id, paired with a per-login random token persisted on the
//! user record. Mutating requests echo that token in the
//! [`CSRF_HEADER`] header so a bare cookie replay is not enough to act as
//! the user.

use axum_extra::extract::cookie::{Cookie, SameSite};
use ring::rand::{SecureRandom, SystemRandom};

use crate::error::{AppError, Result};

/// Name of the signed session cookie. Its value is the user id.
pub const VIEWER_COOKIE: &str = "viewer";

/// Request header carrying the session token for authorized calls.
pub const CSRF_HEADER: &str = "X-CSRF-TOKEN";

const TOKEN_BYTES: usize = 16;

/// Mint a fresh session token: 16 random bytes, hex-encoded.
pub fn mint_token() -> Result<String> {
    let rng = SystemRandom::new();
    let mut bytes = [0u8; TOKEN_BYTES];
    rng.fill(&mut bytes)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("system RNG failure")))?;
    Ok(hex::encode(bytes))
}

/// Build the session cookie for a logged-in user.
///
/// `secure` is decided from the deployment environment (see
/// `Config::secure_cookies`): localhost development runs without TLS, so the
/// Secure attribute would make the browser drop the cookie there.
pub fn viewer_cookie(user_id: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((VIEWER_COOKIE, user_id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .max_age(time::Duration::days(365))
        .build()
}

/// Expired cookie that clears the session, added to the response jar on
/// every path that ends without a session. Attributes match
/// [`viewer_cookie`]; browsers only honor the removal when the path and
/// security attributes match the original.
pub fn removal_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = viewer_cookie("", secure);
    cookie.make_removal();
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_token_is_32_hex_chars() {
        let token = mint_token().unwrap();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_mint_token_is_unique_per_call() {
        let a = mint_token().unwrap();
        let b = mint_token().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_viewer_cookie_attributes() {
        let cookie = viewer_cookie("user-1", true);
        assert_eq!(cookie.name(), VIEWER_COOKIE);
        assert_eq!(cookie.value(), "user-1");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(365)));
    }

    #[test]
    fn test_viewer_cookie_not_secure_for_local_dev() {
        let cookie = viewer_cookie("user-1", false);
        assert_eq!(cookie.secure(), Some(false));
    }

    #[test]
    fn test_removal_cookie_is_expired_with_matching_attributes() {
        let cookie = removal_cookie(true);
        assert_eq!(cookie.name(), VIEWER_COOKIE);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.secure(), Some(true));
    }
}
