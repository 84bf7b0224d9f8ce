// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (identity, session token, wallet state)
//!
//! Listings and bookings live in their own collections but are only
//! referenced by id from the user document here.

#[cfg(debug_assertions)]
use dashmap::DashMap;
#[cfg(debug_assertions)]
use std::sync::Arc;

use crate::db::collections;
use crate::error::AppError;
use crate::models::User;

/// In-memory stand-in for the Firestore collections, used by debug builds
/// when no client is configured. Keyed the same way as the real documents.
#[cfg(debug_assertions)]
#[derive(Default)]
struct MemCollections {
    users: DashMap<String, User>,
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
    #[cfg(debug_assertions)]
    mem: Arc<MemCollections>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
            #[cfg(debug_assertions)]
            mem: Arc::default(),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        // Use ExternalJwtFunctionSource to provide a dummy token without needing async-trait
        // or a custom TokenSource implementation struct.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
            #[cfg(debug_assertions)]
            mem: Arc::default(),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// Debug builds back this with an in-memory store so user operations
    /// behave like the real collections; release builds return an error
    /// from every operation.
    pub fn new_mock() -> Self {
        Self {
            client: None,
            #[cfg(debug_assertions)]
            mem: Arc::default(),
        }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by id (the identity provider's stable subject id).
    pub async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        #[cfg(debug_assertions)]
        if self.client.is_none() {
            return Ok(self.mem.users.get(id).map(|entry| entry.value().clone()));
        }

        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a user document.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        #[cfg(debug_assertions)]
        if self.client.is_none() {
            self.mem.users.insert(user.id.clone(), user.clone());
            return Ok(());
        }

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Replace the session token on an existing user.
    ///
    /// Returns the updated user, or `None` when no document exists for the
    /// id (a stale or forged cookie).
    pub async fn rotate_user_token(
        &self,
        id: &str,
        token: &str,
    ) -> Result<Option<User>, AppError> {
        #[cfg(debug_assertions)]
        if self.client.is_none() {
            return Ok(self.mem.users.get_mut(id).map(|mut user| {
                user.token = token.to_string();
                user.clone()
            }));
        }

        let Some(mut user) = self.get_user(id).await? else {
            return Ok(None);
        };
        user.token = token.to_string();
        self.upsert_user(&user).await?;
        Ok(Some(user))
    }

    /// Set or clear the payment wallet id on an existing user.
    ///
    /// Returns the updated user, or `None` when no document exists for
    /// the id.
    pub async fn set_user_wallet(
        &self,
        id: &str,
        wallet_id: Option<String>,
    ) -> Result<Option<User>, AppError> {
        #[cfg(debug_assertions)]
        if self.client.is_none() {
            return Ok(self.mem.users.get_mut(id).map(|mut user| {
                user.wallet_id = wallet_id.clone();
                user.clone()
            }));
        }

        let Some(mut user) = self.get_user(id).await? else {
            return Ok(None);
        };
        user.wallet_id = wallet_id;
        self.upsert_user(&user).await?;
        Ok(Some(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(id: &str) -> User {
        User {
            id: id.to_string(),
            token: "aa".repeat(16),
            name: "Ann".to_string(),
            avatar: "http://a".to_string(),
            contact: "a@x.com".to_string(),
            wallet_id: None,
            income: 0,
            listings: Vec::new(),
            bookings: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_mock_get_user_missing() {
        let db = FirestoreDb::new_mock();
        assert!(db.get_user("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_mock_upsert_then_get_roundtrip() {
        let db = FirestoreDb::new_mock();
        db.upsert_user(&sample_user("g-1")).await.unwrap();

        let user = db.get_user("g-1").await.unwrap().unwrap();
        assert_eq!(user.name, "Ann");
    }

    #[tokio::test]
    async fn test_mock_rotate_token_updates_existing_user() {
        let db = FirestoreDb::new_mock();
        db.upsert_user(&sample_user("g-1")).await.unwrap();

        let rotated = db
            .rotate_user_token("g-1", &"bb".repeat(16))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(rotated.token, "bb".repeat(16));

        let stored = db.get_user("g-1").await.unwrap().unwrap();
        assert_eq!(stored.token, "bb".repeat(16));
    }

    #[tokio::test]
    async fn test_mock_rotate_token_for_missing_user() {
        let db = FirestoreDb::new_mock();
        let rotated = db.rotate_user_token("ghost", "cc").await.unwrap();
        assert!(rotated.is_none());
    }

    #[tokio::test]
    async fn test_mock_set_and_clear_wallet() {
        let db = FirestoreDb::new_mock();
        db.upsert_user(&sample_user("g-1")).await.unwrap();

        let with_wallet = db
            .set_user_wallet("g-1", Some("acct_123".to_string()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(with_wallet.wallet_id.as_deref(), Some("acct_123"));

        let cleared = db.set_user_wallet("g-1", None).await.unwrap().unwrap();
        assert!(cleared.wallet_id.is_none());
    }
}
