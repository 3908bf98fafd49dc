// SPDX-License-Identifier: MIT

//! Workout model and the RunKeeper activity-type mapping.

use serde::{Deserialize, Serialize};

/// Internal exercise taxonomy.
///
/// Serialized as the historical three-letter codes so that records written
/// by earlier versions of the importer keep deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExerciseType {
    #[serde(rename = "run")]
    Run,
    #[serde(rename = "bik")]
    Bike,
    #[serde(rename = "hik")]
    Hike,
    #[serde(rename = "ski")]
    DownhillSki,
    #[serde(rename = "xcs")]
    CrossCountrySki,
    #[serde(rename = "swi")]
    Swim,
    #[serde(rename = "row")]
    Row,
    #[serde(rename = "oth")]
    Other,
}

impl ExerciseType {
    /// Map a RunKeeper activity-type label to the internal taxonomy.
    ///
    /// Total: every label maps to a valid variant. Labels outside the table
    /// map to `Other` and are reported as a warning, nothing more.
    pub fn from_remote_label(label: &str) -> Self {
        match label {
            "Running" => Self::Run,
            "Cycling" | "Mountain Biking" => Self::Bike,
            "Walking" | "Hiking" => Self::Hike,
            "Downhill Skiing" => Self::DownhillSki,
            "Cross-Country Skiing" => Self::CrossCountrySki,
            "Swimming" => Self::Swim,
            "Rowing" => Self::Row,
            "Elliptical" | "Wheelchair" | "Snowboarding" | "Skating" | "Other" => Self::Other,
            unknown => {
                tracing::warn!(label = %unknown, "Unknown RunKeeper workout type");
                Self::Other
            }
        }
    }
}

/// Workout record stored under `users/{userId}/workouts/{workoutId}`.
///
/// Field names stay camelCase for compatibility with existing stored data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    /// Mapped exercise type
    pub exercise_type: ExerciseType,
    /// Start time as supplied by RunKeeper (opaque, not reparsed)
    pub start_time: String,
    /// Total distance in meters (absent for some activity types)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_distance: Option<f64>,
    /// Total duration in seconds
    pub total_duration: f64,
}
