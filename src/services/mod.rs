// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod identity;
pub mod importer;
pub mod runkeeper;

pub use identity::IdentityResolver;
pub use importer::WorkoutImporter;
pub use runkeeper::{RemoteActivityApi, RunKeeperClient};
