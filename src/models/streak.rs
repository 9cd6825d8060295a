//! Streak model: consecutive calendar days with at least one submission.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-user study streak. One row per user, created lazily on the first
/// quiz submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Streak {
    pub id: i64,
    pub user_id: String,
    pub current_streak: i64,
    pub last_study_date: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Zero-value streak returned when a user has never submitted a quiz.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmptyStreak {
    pub current_streak: i64,
    pub last_study_date: Option<DateTime<Utc>>,
}
