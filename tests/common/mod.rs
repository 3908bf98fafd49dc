// SPDX-License-Identifier: MIT

//! Shared test doubles: an instrumented in-memory store and a stub
//! RunKeeper API.

use async_trait::async_trait;
use fitspector::db::WorkoutStore;
use fitspector::error::{AppError, RemoteError};
use fitspector::models::{User, Workout};
use fitspector::services::runkeeper::{
    ActivityFeed, ActivityItem, RemoteActivityApi, RunKeeperProfile, RunKeeperUser,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// In-memory store that counts concurrent writes.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<HashMap<String, User>>,
    workouts: Mutex<HashMap<String, HashMap<String, Workout>>>,
    /// Workout IDs whose writes should fail (per-item failure injection).
    pub fail_workout_ids: Mutex<HashSet<String>>,
    /// Artificial write latency, to make concurrency observable.
    pub write_delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    write_count: AtomicUsize,
}

#[allow(dead_code)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_write_delay(delay: Duration) -> Self {
        Self {
            write_delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn insert_user(&self, user: User) {
        self.users.lock().unwrap().insert(user.id.clone(), user);
    }

    pub fn insert_workout(&self, user_id: &str, workout_id: &str, workout: Workout) {
        self.workouts
            .lock()
            .unwrap()
            .entry(user_id.to_string())
            .or_default()
            .insert(workout_id.to_string(), workout);
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn workout_count(&self, user_id: &str) -> usize {
        self.workouts
            .lock()
            .unwrap()
            .get(user_id)
            .map_or(0, HashMap::len)
    }

    pub fn get_workout(&self, user_id: &str, workout_id: &str) -> Option<Workout> {
        self.workouts
            .lock()
            .unwrap()
            .get(user_id)
            .and_then(|m| m.get(workout_id))
            .cloned()
    }

    /// Highest number of writes observed in flight at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Total successful workout writes.
    pub fn write_count(&self) -> usize {
        self.write_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WorkoutStore for MemoryStore {
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().get(user_id).cloned())
    }

    async fn put_user(&self, user: &User) -> Result<(), AppError> {
        self.users
            .lock()
            .unwrap()
            .insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn workout_ids(&self, user_id: &str) -> Result<HashSet<String>, AppError> {
        Ok(self
            .workouts
            .lock()
            .unwrap()
            .get(user_id)
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default())
    }

    async fn put_workout(
        &self,
        user_id: &str,
        workout_id: &str,
        workout: &Workout,
    ) -> Result<(), AppError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(delay) = self.write_delay {
            tokio::time::sleep(delay).await;
        }

        let result = if self.fail_workout_ids.lock().unwrap().contains(workout_id) {
            Err(AppError::Database(format!("injected failure for {}", workout_id)))
        } else {
            self.workouts
                .lock()
                .unwrap()
                .entry(user_id.to_string())
                .or_default()
                .insert(workout_id.to_string(), workout.clone());
            self.write_count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// Stub RunKeeper API with canned responses and call counters.
#[derive(Default)]
pub struct StubActivityApi {
    pub items: Vec<ActivityItem>,
    pub profile: Option<RunKeeperProfile>,
    pub fail_feed: bool,
    pub fail_profile: bool,
    pub profile_calls: AtomicUsize,
    pub feed_calls: AtomicUsize,
}

#[allow(dead_code)]
impl StubActivityApi {
    pub fn with_items(items: Vec<ActivityItem>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    pub fn with_profile(profile: RunKeeperProfile) -> Self {
        Self {
            profile: Some(profile),
            ..Self::default()
        }
    }

    pub fn failing_feed() -> Self {
        Self {
            fail_feed: true,
            ..Self::default()
        }
    }

    pub fn failing_profile() -> Self {
        Self {
            fail_profile: true,
            ..Self::default()
        }
    }

    pub fn profile_calls(&self) -> usize {
        self.profile_calls.load(Ordering::SeqCst)
    }

    pub fn feed_calls(&self) -> usize {
        self.feed_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteActivityApi for StubActivityApi {
    async fn fetch_user_info(&self, _access_token: &str) -> Result<RunKeeperUser, RemoteError> {
        Err(RemoteError::Unexpected("not stubbed".to_string()))
    }

    async fn fetch_profile(
        &self,
        _access_token: &str,
    ) -> Result<Option<RunKeeperProfile>, RemoteError> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_profile {
            return Err(RemoteError::Auth);
        }
        Ok(self.profile.clone())
    }

    async fn fetch_activity_feed(&self, _access_token: &str) -> Result<ActivityFeed, RemoteError> {
        self.feed_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_feed {
            return Err(RemoteError::Network("connection reset".to_string()));
        }
        Ok(ActivityFeed {
            size: Some(self.items.len() as u32),
            items: self.items.clone(),
        })
    }
}

/// A feed item for a running activity with the given remote ID.
#[allow(dead_code)]
pub fn running_item(remote_id: u64) -> ActivityItem {
    ActivityItem {
        uri: format!("/fitnessActivities/{}", remote_id),
        activity_type: "Running".to_string(),
        start_time: "Sat, 1 Jan 2022 10:00:00".to_string(),
        total_distance: Some(5000.0),
        duration: 1800.0,
    }
}

/// A minimal stored user for setup.
#[allow(dead_code)]
pub fn test_user(id: &str) -> User {
    User {
        id: id.to_string(),
        name: "Test Runner".to_string(),
        gender: None,
        athlete_type: Some("Runner".to_string()),
        location: None,
        picture: None,
        profile_url: None,
        created_at: "2022-01-01T00:00:00Z".to_string(),
    }
}

/// Poll a condition until it holds or a second passes.
#[allow(dead_code)]
pub async fn wait_until<F: Fn() -> bool>(cond: F) -> bool {
    for _ in 0..100 {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    cond()
}
