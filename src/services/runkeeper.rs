// SPDX-License-Identifier: MIT

//! RunKeeper (Health Graph) API client.
//!
//! Three authenticated resources, each with its own vendor media type:
//! - `/user` - account info (numeric user ID + resource paths)
//! - `/profile` - profile attributes, fetched at account-creation time
//! - `/fitnessActivities` - the activity feed, capped at one page
//!
//! The client classifies failures into [`RemoteError`] and never retries;
//! retry policy belongs to the caller.

use crate::error::RemoteError;
use async_trait::async_trait;
use reqwest::{header, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

const RUNKEEPER_API_URL: &str = "https://api.runkeeper.com";
const RUNKEEPER_TOKEN_URL: &str = "https://runkeeper.com/apps/token";
pub const RUNKEEPER_AUTHORIZE_URL: &str = "https://runkeeper.com/apps/authorize";

/// Maximum number of feed items requested; the API caps page size and the
/// client does not paginate past the first page.
pub const DEFAULT_FEED_PAGE_SIZE: u32 = 1000;

const ACCEPT_USER: &str = "application/vnd.com.runkeeper.User+json";
const ACCEPT_PROFILE: &str = "application/vnd.com.runkeeper.Profile+json";
const ACCEPT_ACTIVITY_FEED: &str = "application/vnd.com.runkeeper.FitnessActivityFeed+json";

/// Read access to the RunKeeper resources the core consumes.
///
/// Implemented by [`RunKeeperClient`] and by stub doubles in tests.
#[async_trait]
pub trait RemoteActivityApi: Send + Sync {
    /// Fetch `/user`: account info for the bearer of the token.
    async fn fetch_user_info(&self, access_token: &str) -> Result<RunKeeperUser, RemoteError>;

    /// Fetch `/profile`: profile attributes, used when creating a user.
    ///
    /// `None` means the request succeeded but carried no usable profile.
    async fn fetch_profile(
        &self,
        access_token: &str,
    ) -> Result<Option<RunKeeperProfile>, RemoteError>;

    /// Fetch `/fitnessActivities`: the first (capped) page of the feed.
    async fn fetch_activity_feed(&self, access_token: &str) -> Result<ActivityFeed, RemoteError>;
}

/// RunKeeper API client.
#[derive(Clone)]
pub struct RunKeeperClient {
    http: reqwest::Client,
    base_url: String,
    token_url: String,
    client_id: String,
    client_secret: String,
    feed_page_size: u32,
}

impl RunKeeperClient {
    /// Create a new RunKeeper client with OAuth credentials.
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: RUNKEEPER_API_URL.to_string(),
            token_url: RUNKEEPER_TOKEN_URL.to_string(),
            client_id,
            client_secret,
            feed_page_size: DEFAULT_FEED_PAGE_SIZE,
        }
    }

    /// Point the client at a different API base URL (tests).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Point the client at a different token endpoint (tests).
    pub fn with_token_url(mut self, token_url: String) -> Self {
        self.token_url = token_url;
        self
    }

    /// Exchange an authorization code for an access token.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenExchangeResponse, RemoteError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", redirect_uri),
            ])
            .send()
            .await
            .map_err(|e| RemoteError::Network(format!("Token exchange failed: {}", e)))?;

        Self::decode_response(response).await
    }

    /// Generic authenticated GET with the resource's Accept header.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path_and_query: &str,
        accept: &'static str,
        access_token: &str,
    ) -> Result<T, RemoteError> {
        let url = format!("{}{}", self.base_url, path_and_query);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .header(header::ACCEPT, accept)
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        Self::decode_response(response).await
    }

    /// Classify the response status and parse the JSON body.
    async fn decode_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, RemoteError> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(RemoteError::Auth);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Unexpected(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| RemoteError::Unexpected(format!("JSON parse error: {}", e)))
    }
}

#[async_trait]
impl RemoteActivityApi for RunKeeperClient {
    async fn fetch_user_info(&self, access_token: &str) -> Result<RunKeeperUser, RemoteError> {
        self.get_json("/user", ACCEPT_USER, access_token).await
    }

    async fn fetch_profile(
        &self,
        access_token: &str,
    ) -> Result<Option<RunKeeperProfile>, RemoteError> {
        self.get_json("/profile", ACCEPT_PROFILE, access_token)
            .await
    }

    async fn fetch_activity_feed(&self, access_token: &str) -> Result<ActivityFeed, RemoteError> {
        let path = format!("/fitnessActivities?pageSize={}", self.feed_page_size);
        self.get_json(&path, ACCEPT_ACTIVITY_FEED, access_token)
            .await
    }
}

/// Token exchange response from RunKeeper.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenExchangeResponse {
    pub access_token: String,
    pub token_type: String,
}

/// `/user` response: account identity.
#[derive(Debug, Clone, Deserialize)]
pub struct RunKeeperUser {
    /// RunKeeper numeric user ID
    #[serde(rename = "userID")]
    pub user_id: u64,
}

/// `/profile` response: profile attributes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunKeeperProfile {
    pub name: Option<String>,
    pub gender: Option<String>,
    pub athlete_type: Option<String>,
    pub location: Option<String>,
    pub normal_picture: Option<String>,
    /// Public profile URL
    pub profile: Option<String>,
}

/// `/fitnessActivities` response: one page of the activity feed.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivityFeed {
    #[serde(default)]
    pub size: Option<u32>,
    #[serde(default)]
    pub items: Vec<ActivityItem>,
}

/// A single activity in the feed.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivityItem {
    /// Resource path, e.g. "/fitnessActivities/123456"
    pub uri: String,
    /// RunKeeper activity-type label, e.g. "Running"
    #[serde(rename = "type")]
    pub activity_type: String,
    /// Start time as supplied by RunKeeper (opaque)
    pub start_time: String,
    /// Total distance in meters (absent for some activity types)
    pub total_distance: Option<f64>,
    /// Duration in seconds
    pub duration: f64,
}
