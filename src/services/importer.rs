// SPDX-License-Identifier: MIT

//! Workout import pipeline.
//!
//! One `import_all` pass:
//! 1. Snapshot the workout IDs already stored for the user (single read).
//! 2. Fetch the activity feed; a feed failure aborts the whole pass.
//! 3. Process items with bounded concurrency: derive the workout ID from the
//!    activity URI, skip anything already known, map the exercise type, and
//!    persist the rest. Per-item failures never stop sibling items.
//!
//! Runs as a background effect of login; results are logged, never returned
//! to an HTTP caller.

use crate::db::WorkoutStore;
use crate::error::AppError;
use crate::models::{ExerciseType, Workout};
use crate::services::runkeeper::{ActivityItem, RemoteActivityApi};
use futures_util::{stream, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;

/// Maximum number of per-item operations in flight at once. Bounds store
/// write load for accounts with large histories.
pub const MAX_CONCURRENT_IMPORTS: usize = 20;

/// Prefix every activity URI must carry; the remainder is the activity ID.
pub const ACTIVITY_URI_PREFIX: &str = "/fitnessActivities/";

/// Prefix for internal workout IDs.
pub const WORKOUT_ID_PREFIX: &str = "RKW";

/// Derive the internal workout ID from an activity's resource path.
///
/// Deterministic, so the same remote activity always maps to the same
/// internal record; that is the deduplication key.
pub fn workout_id_from_uri(uri: &str) -> Result<String, AppError> {
    uri.strip_prefix(ACTIVITY_URI_PREFIX)
        .filter(|suffix| !suffix.is_empty())
        .map(|suffix| format!("{}{}", WORKOUT_ID_PREFIX, suffix))
        .ok_or_else(|| AppError::MalformedReference(uri.to_string()))
}

/// Outcome of processing one feed item.
enum ItemOutcome {
    Imported,
    /// Already known; the deduplication gate, not an error.
    Skipped,
}

/// Aggregate result of one import pass.
#[derive(Debug, Default)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<AppError>,
}

/// Imports a user's RunKeeper activity feed into the store.
#[derive(Clone)]
pub struct WorkoutImporter {
    store: Arc<dyn WorkoutStore>,
    client: Arc<dyn RemoteActivityApi>,
    max_concurrency: usize,
}

impl WorkoutImporter {
    pub fn new(store: Arc<dyn WorkoutStore>, client: Arc<dyn RemoteActivityApi>) -> Self {
        Self::with_concurrency(store, client, MAX_CONCURRENT_IMPORTS)
    }

    /// Create an importer with a custom concurrency cap.
    pub fn with_concurrency(
        store: Arc<dyn WorkoutStore>,
        client: Arc<dyn RemoteActivityApi>,
        max_concurrency: usize,
    ) -> Self {
        Self {
            store,
            client,
            max_concurrency,
        }
    }

    /// Import all not-yet-known workouts for a user.
    ///
    /// The known-ID set is read once before the fetch; two overlapping runs
    /// can both write the same new workout, which is benign because writes
    /// are upserts keyed by the derived ID.
    pub async fn import_all(
        &self,
        user_id: &str,
        access_token: &str,
    ) -> Result<ImportSummary, AppError> {
        let known = self.store.workout_ids(user_id).await?;

        let feed = self.client.fetch_activity_feed(access_token).await?;

        tracing::info!(
            user_id = %user_id,
            known = known.len(),
            fetched = feed.items.len(),
            "Importing activity feed"
        );

        let known = Arc::new(known);

        let results: Vec<Result<ItemOutcome, AppError>> = stream::iter(feed.items)
            .map(|item| {
                let known = Arc::clone(&known);
                async move { self.process_item(user_id, &known, item).await }
            })
            .buffer_unordered(self.max_concurrency)
            .collect()
            .await;

        let mut summary = ImportSummary::default();
        for result in results {
            match result {
                Ok(ItemOutcome::Imported) => summary.imported += 1,
                Ok(ItemOutcome::Skipped) => summary.skipped += 1,
                Err(e) => summary.errors.push(e),
            }
        }

        Ok(summary)
    }

    /// Process one feed item against the known-ID snapshot.
    async fn process_item(
        &self,
        user_id: &str,
        known: &HashSet<String>,
        item: ActivityItem,
    ) -> Result<ItemOutcome, AppError> {
        let workout_id = workout_id_from_uri(&item.uri)?;

        if known.contains(&workout_id) {
            return Ok(ItemOutcome::Skipped);
        }

        let workout = Workout {
            exercise_type: ExerciseType::from_remote_label(&item.activity_type),
            start_time: item.start_time,
            total_distance: item.total_distance,
            total_duration: item.duration,
        };

        self.store.put_workout(user_id, &workout_id, &workout).await?;

        tracing::debug!(user_id = %user_id, workout_id = %workout_id, "Stored workout");
        Ok(ItemOutcome::Imported)
    }

    /// Run `import_all` as a fire-and-forget background task.
    ///
    /// Import failures are logged only; nothing propagates to the login flow.
    pub fn spawn_import(&self, user_id: String, access_token: String) {
        let importer = self.clone();
        tokio::spawn(async move {
            match importer.import_all(&user_id, &access_token).await {
                Ok(summary) => {
                    tracing::info!(
                        user_id = %user_id,
                        imported = summary.imported,
                        skipped = summary.skipped,
                        item_errors = summary.errors.len(),
                        "Workout import finished"
                    );
                    for error in &summary.errors {
                        tracing::warn!(user_id = %user_id, error = %error, "Workout item failed");
                    }
                }
                Err(e) => {
                    tracing::error!(user_id = %user_id, error = %e, "Workout import aborted");
                }
            }
        });
    }
}
