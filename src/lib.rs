// SPDX-License-Identifier: MIT

//! Fitspector: link a RunKeeper account and import its workout history.
//!
//! This crate provides the backend API that resolves RunKeeper identities
//! to internal user records and imports their activity feeds into Firestore.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::FirestoreDb;
use services::{IdentityResolver, RunKeeperClient};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub runkeeper: RunKeeperClient,
    pub resolver: IdentityResolver,
}
