// SPDX-License-Identifier: MIT

//! Identity resolution for RunKeeper logins.
//!
//! A login event carries an internal user key (derived from the RunKeeper
//! numeric user ID) and an access token. Resolution either finds the stored
//! user or creates one from the remote profile, then schedules a background
//! workout import. Import errors never reach the login response.

use crate::db::WorkoutStore;
use crate::error::AppError;
use crate::models::User;
use crate::services::importer::WorkoutImporter;
use crate::services::runkeeper::{RemoteActivityApi, RunKeeperProfile};
use std::sync::Arc;

/// Prefix identifying internally-stored RunKeeper user IDs.
pub const USER_ID_PREFIX: &str = "RKU";

/// Build the internal user key for a RunKeeper numeric user ID.
pub fn user_key_for(remote_user_id: u64) -> String {
    format!("{}{}", USER_ID_PREFIX, remote_user_id)
}

/// Whether a stored identifier belongs to the RunKeeper provider.
pub fn is_runkeeper_id(id: &str) -> bool {
    id.starts_with(USER_ID_PREFIX)
}

/// Resolves login events to user records and triggers imports.
#[derive(Clone)]
pub struct IdentityResolver {
    store: Arc<dyn WorkoutStore>,
    client: Arc<dyn RemoteActivityApi>,
    importer: WorkoutImporter,
}

impl IdentityResolver {
    pub fn new(
        store: Arc<dyn WorkoutStore>,
        client: Arc<dyn RemoteActivityApi>,
        importer: WorkoutImporter,
    ) -> Self {
        Self {
            store,
            client,
            importer,
        }
    }

    /// Resolve a user key to a user record, creating the record on first login.
    ///
    /// On success, and if a token is present, a workout import is scheduled
    /// in the background; the caller gets the user back immediately.
    pub async fn resolve(
        &self,
        user_key: &str,
        access_token: Option<&str>,
    ) -> Result<User, AppError> {
        if let Some(user) = self.store.get_user(user_key).await? {
            tracing::debug!(user_key = %user_key, "Resolved existing user");
            self.trigger_import(user_key, access_token);
            return Ok(user);
        }

        // First login: creating the record needs a token for the profile fetch.
        let Some(token) = access_token else {
            return Err(AppError::NotFound(format!("user {}", user_key)));
        };

        let profile = self
            .client
            .fetch_profile(token)
            .await?
            .ok_or(AppError::MissingProfile)?;

        let user = build_user(&profile, user_key);
        self.store.put_user(&user).await?;

        tracing::info!(user_key = %user_key, name = %user.name, "Created user from RunKeeper profile");

        self.trigger_import(user_key, Some(token));
        Ok(user)
    }

    /// Stable identifier handed to the session layer.
    pub fn serialize_user(&self, user: &User) -> String {
        user.id.clone()
    }

    /// Re-resolve a user purely from a stored session identifier.
    ///
    /// No fresh token is available here, so no import is triggered.
    pub async fn deserialize_user(&self, id: &str) -> Result<User, AppError> {
        if !is_runkeeper_id(id) {
            return Err(AppError::UnknownUser(id.to_string()));
        }
        self.resolve(id, None).await
    }

    /// Fire-and-forget import trigger; never blocks or fails the caller.
    fn trigger_import(&self, user_key: &str, access_token: Option<&str>) {
        if let Some(token) = access_token {
            self.importer
                .spawn_import(user_key.to_string(), token.to_string());
        }
    }
}

/// Build the canonical user record from a RunKeeper profile.
fn build_user(profile: &RunKeeperProfile, user_key: &str) -> User {
    User {
        id: user_key.to_string(),
        name: profile.name.clone().unwrap_or_default(),
        gender: profile.gender.clone(),
        athlete_type: profile.athlete_type.clone(),
        location: profile.location.clone(),
        picture: profile.normal_picture.clone(),
        profile_url: profile.profile.clone(),
        created_at: chrono::Utc::now().to_rfc3339(),
    }
}
