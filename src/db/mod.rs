// SPDX-License-Identifier: MIT

//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

use crate::error::AppError;
use crate::models::{User, Workout};
use async_trait::async_trait;
use std::collections::HashSet;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Workouts live in a subcollection under each user document.
    pub const WORKOUTS: &str = "workouts";
}

/// Storage operations the import pipeline depends on.
///
/// Implemented by [`FirestoreDb`] in production and by in-memory doubles in
/// tests. Workout writes are upserts keyed by the derived workout ID, so
/// re-writing the same record is harmless.
#[async_trait]
pub trait WorkoutStore: Send + Sync {
    /// Read a user profile by internal user ID.
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError>;

    /// Store a user profile (written once at creation).
    async fn put_user(&self, user: &User) -> Result<(), AppError>;

    /// Point-in-time snapshot of the workout IDs already stored for a user.
    async fn workout_ids(&self, user_id: &str) -> Result<HashSet<String>, AppError>;

    /// Store a workout under the user's workout namespace.
    async fn put_workout(
        &self,
        user_id: &str,
        workout_id: &str,
        workout: &Workout,
    ) -> Result<(), AppError>;
}
