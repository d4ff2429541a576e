//! User model for storage and API.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;

/// User profile stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID (also used as document ID)
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Email address, lowercased (login identifier)
    pub email: String,
    /// PBKDF2 hash, see `services::password`
    pub password_hash: String,
    /// When the user registered
    pub created_at: String,
    /// Last successful login
    #[serde(default)]
    pub last_login: Option<String>,
}

/// Reservation of an email address, keyed by the encoded address.
///
/// Created before the user document so that two registrations for the same
/// address cannot both succeed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailClaim {
    pub user_id: Uuid,
    pub created_at: String,
}

/// Public view of a user (never includes the password hash).
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: String,
    pub last_login: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
            last_login: user.last_login,
        }
    }
}
