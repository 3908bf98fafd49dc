// SPDX-License-Identifier: MIT

//! API routes for authenticated users.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use serde::Serialize;
use std::sync::Arc;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/me", get(get_me))
}

/// Current user response.
#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub picture: Option<String>,
    pub profile_url: Option<String>,
}

/// Get current user profile.
///
/// Re-resolves the session identifier through the identity resolver, which
/// also rejects identifiers from unrecognized providers.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<UserResponse>> {
    let user = state.resolver.deserialize_user(&auth.user_id).await?;

    Ok(Json(UserResponse {
        id: user.id,
        name: user.name,
        picture: user.picture,
        profile_url: user.profile_url,
    }))
}
