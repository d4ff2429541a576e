//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// One document per registered email; doc id from `email_claim_id`.
    pub const USER_EMAILS: &str = "users_by_email";
    pub const ACTIVITIES: &str = "activities";
}
