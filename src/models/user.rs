// SPDX-License-Identifier: MIT

//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// User profile stored in Firestore.
///
/// Created once at first login from the RunKeeper profile and never
/// refreshed on subsequent logins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Internal user ID ("RKU" + RunKeeper numeric user ID, also the document ID)
    pub id: String,
    /// Display name
    pub name: String,
    /// Gender (may be withheld)
    pub gender: Option<String>,
    /// Athlete type (e.g. "Runner")
    pub athlete_type: Option<String>,
    /// Free-form location
    pub location: Option<String>,
    /// Profile picture URL
    pub picture: Option<String>,
    /// Public RunKeeper profile URL
    pub profile_url: Option<String>,
    /// When the user first connected (ISO 8601)
    pub created_at: String,
}
