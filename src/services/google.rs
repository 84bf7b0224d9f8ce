// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google identity client for OAuth sign-in.
//!
//! Handles:
//! - Consent URL construction
//! - Authorization-code exchange at the token endpoint
//! - Profile fetch from the People API
//! - First-candidate identity extraction from the People response

use serde::Deserialize;

use crate::error::AppError;

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const PEOPLE_URL: &str =
    "https://people.googleapis.com/v1/people/me?personFields=names,photos,emailAddresses";

/// Identity fields distilled from a People API profile.
///
/// `id` is the provider's stable subject id and doubles as the user
/// document id. `contact` is the primary email address.
#[derive(Debug, Clone)]
pub struct GoogleIdentity {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub contact: String,
}

/// Google OAuth / People API client.
#[derive(Clone)]
pub struct GoogleService {
    http: Option<reqwest::Client>,
    client_id: String,
    client_secret: String,
    redirect_url: String,
    #[cfg(debug_assertions)]
    mock_profile: Option<PersonResponse>,
}

impl GoogleService {
    /// Create a new Google client with OAuth credentials.
    pub fn new(client_id: String, client_secret: String, redirect_url: String) -> Self {
        Self {
            http: Some(reqwest::Client::new()),
            client_id,
            client_secret,
            redirect_url,
            #[cfg(debug_assertions)]
            mock_profile: None,
        }
    }

    /// Create a mock Google service for testing (offline mode).
    ///
    /// `exchange_code` returns the canned profile (or `None`) without any
    /// network traffic. Only available in debug/test builds.
    #[cfg(debug_assertions)]
    pub fn new_mock(profile: Option<PersonResponse>) -> Self {
        Self {
            http: None,
            client_id: "mock-client".to_string(),
            client_secret: "mock-secret".to_string(),
            redirect_url: "http://localhost:9000/login".to_string(),
            mock_profile: profile,
        }
    }

    /// Build the consent URL the client should redirect the browser to.
    pub fn auth_url(&self) -> String {
        format!(
            "{}?\
             client_id={}&\
             redirect_uri={}&\
             response_type=code&\
             access_type=online&\
             scope={}",
            AUTH_URL,
            self.client_id,
            urlencoding::encode(&self.redirect_url),
            urlencoding::encode(
                "https://www.googleapis.com/auth/userinfo.email \
                 https://www.googleapis.com/auth/userinfo.profile"
            ),
        )
    }

    /// Exchange an authorization code for the signed-in user's profile.
    ///
    /// Returns `Ok(None)` when the provider completes the exchange but
    /// hands back no profile. Transport and HTTP failures map to
    /// [`AppError::AuthProvider`].
    pub async fn exchange_code(&self, code: &str) -> Result<Option<PersonResponse>, AppError> {
        // Mock mode (Debug builds only)
        #[cfg(debug_assertions)]
        {
            if self.http.is_none() {
                return Ok(self.mock_profile.clone());
            }
        }

        let http = self
            .http
            .as_ref()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Google client not connected")))?;

        let response = http
            .post(TOKEN_URL)
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::AuthProvider(format!("Token exchange request failed: {}", e)))?;

        let tokens: TokenResponse = self.check_response_json(response, "Token exchange").await?;

        let response = http
            .get(PEOPLE_URL)
            .bearer_auth(&tokens.access_token)
            .send()
            .await
            .map_err(|e| AppError::AuthProvider(format!("Profile request failed: {}", e)))?;

        let profile: PersonResponse = self.check_response_json(response, "Profile fetch").await?;

        tracing::debug!("Fetched People API profile");

        Ok(Some(profile))
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
        what: &str,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::AuthProvider(format!(
                "{} failed: HTTP {}: {}",
                what, status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::AuthProvider(format!("{} JSON parse error: {}", what, e)))
    }
}

/// Token endpoint response. Only the access token is used; the identity
/// comes from the People API rather than the id_token.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// People API `people/me` response, trimmed to the requested person fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonResponse {
    #[serde(default)]
    pub names: Vec<PersonName>,
    #[serde(default)]
    pub photos: Vec<PersonPhoto>,
    #[serde(default)]
    pub email_addresses: Vec<PersonEmail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonName {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub metadata: Option<PersonMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonMetadata {
    #[serde(default)]
    pub source: Option<PersonSource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonSource {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonPhoto {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonEmail {
    #[serde(default)]
    pub value: Option<String>,
}

impl PersonResponse {
    /// First-candidate extraction: the first name, photo, and email entry
    /// decide the identity. Any missing piece fails the login outright
    /// rather than storing a partial profile.
    pub fn identity(&self) -> Result<GoogleIdentity, AppError> {
        let first_name = self.names.first();

        let id = first_name
            .and_then(|n| n.metadata.as_ref())
            .and_then(|m| m.source.as_ref())
            .and_then(|s| s.id.as_ref())
            .ok_or(AppError::ProfileIncomplete("id"))?;

        let name = first_name
            .and_then(|n| n.display_name.as_ref())
            .ok_or(AppError::ProfileIncomplete("name"))?;

        let avatar = self
            .photos
            .first()
            .and_then(|p| p.url.as_ref())
            .ok_or(AppError::ProfileIncomplete("avatar"))?;

        let contact = self
            .email_addresses
            .first()
            .and_then(|e| e.value.as_ref())
            .ok_or(AppError::ProfileIncomplete("contact"))?;

        Ok(GoogleIdentity {
            id: id.clone(),
            name: name.clone(),
            avatar: avatar.clone(),
            contact: contact.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_profile() -> PersonResponse {
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

    #[test]
    fn test_auth_url_contains_credentials_and_scopes() {
        let google = GoogleService::new_mock(None);
        let url = google.auth_url();

        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("client_id=mock-client"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains(&format!(
            "redirect_uri={}",
            urlencoding::encode("http://localhost:9000/login")
        )));
        assert!(url.contains("userinfo.email"));
        assert!(url.contains("userinfo.profile"));
    }

    #[test]
    fn test_identity_extraction_uses_first_candidates() {
        let mut profile = complete_profile();
        profile.names.push(PersonName {
            display_name: Some("Second".to_string()),
            metadata: None,
        });
        profile.photos.push(PersonPhoto { url: None });

        let identity = profile.identity().unwrap();
        assert_eq!(identity.id, "g-1");
        assert_eq!(identity.name, "Ann");
        assert_eq!(identity.avatar, "http://a");
        assert_eq!(identity.contact, "a@x.com");
    }

    #[test]
    fn test_identity_missing_source_id() {
        let mut profile = complete_profile();
        profile.names[0].metadata = None;

        match profile.identity() {
            Err(AppError::ProfileIncomplete(field)) => assert_eq!(field, "id"),
            other => panic!("expected ProfileIncomplete, got {:?}", other),
        }
    }

    #[test]
    fn test_identity_empty_profile_reports_id_first() {
        let profile = PersonResponse::default();
        match profile.identity() {
            Err(AppError::ProfileIncomplete(field)) => assert_eq!(field, "id"),
            other => panic!("expected ProfileIncomplete, got {:?}", other),
        }
    }

    #[test]
    fn test_identity_missing_photo_and_email() {
        let mut profile = complete_profile();
        profile.photos.clear();
        match profile.identity() {
            Err(AppError::ProfileIncomplete(field)) => assert_eq!(field, "avatar"),
            other => panic!("expected ProfileIncomplete, got {:?}", other),
        }

        let mut profile = complete_profile();
        profile.email_addresses[0].value = None;
        match profile.identity() {
            Err(AppError::ProfileIncomplete(field)) => assert_eq!(field, "contact"),
            other => panic!("expected ProfileIncomplete, got {:?}", other),
        }
    }

    #[test]
    fn test_person_response_parses_people_api_shape() {
        let json = r#"{
            "resourceName": "people/g-1",
            "names": [
                {
                    "displayName": "Ann",
                    "metadata": {"primary": true, "source": {"type": "PROFILE", "id": "g-1"}}
                }
            ],
            "photos": [{"url": "http://a"}],
            "emailAddresses": [{"value": "a@x.com"}]
        }"#;

        let profile: PersonResponse = serde_json::from_str(json).unwrap();
        let identity = profile.identity().unwrap();
        assert_eq!(identity.id, "g-1");
        assert_eq!(identity.contact, "a@x.com");
    }

    #[tokio::test]
    async fn test_mock_exchange_returns_canned_profile() {
        let google = GoogleService::new_mock(Some(complete_profile()));
        let profile = google.exchange_code("any-code").await.unwrap();
        assert!(profile.is_some());
    }

    #[tokio::test]
    async fn test_mock_exchange_returns_none_when_unconfigured() {
        let google = GoogleService::new_mock(None);
        let profile = google.exchange_code("any-code").await.unwrap();
        assert!(profile.is_none());
    }
}
