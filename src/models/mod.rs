// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod user;
pub mod workout;

pub use user::User;
pub use workout::{ExerciseType, Workout};
