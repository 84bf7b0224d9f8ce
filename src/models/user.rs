//! User model for storage.

use serde::{Deserialize, Serialize};

use crate::services::google::GoogleIdentity;

/// User account stored in Firestore, one document per external identity.
///
/// The document id equals `id`; the id is assigned by the identity provider
/// and never changes after the record is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Stable Google identity id (also used as document ID)
    pub id: String,
    /// Current session token; a new login overwrites the previous one
    pub token: String,
    /// Display name
    pub name: String,
    /// Avatar URL
    pub avatar: String,
    /// Contact address (email)
    pub contact: String,
    /// Linked Stripe account id, if the user connected a payout wallet
    pub wallet_id: Option<String>,
    /// Aggregate income across the user's listings (minor currency units)
    pub income: i64,
    /// Owned listing document ids, in creation order
    pub listings: Vec<String>,
    /// Booking document ids, in creation order
    pub bookings: Vec<String>,
}

impl User {
    /// Build a brand-new account from a provider identity and a freshly
    /// minted session token. First logins start with no income, no wallet
    /// and empty listing/booking lists.
    pub fn from_identity(identity: GoogleIdentity, token: String) -> Self {
        Self {
            id: identity.id,
            token,
            name: identity.name,
            avatar: identity.avatar,
            contact: identity.contact,
            wallet_id: None,
            income: 0,
            listings: Vec::new(),
            bookings: Vec::new(),
        }
    }
}
