//! Topic model: a user's saved block of study text plus a derived summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Owned;

/// Number of characters of content kept in the derived summary.
const SUMMARY_LEN: usize = 100;

/// A saved block of study material.
///
/// Immutable after creation; the summary is derived once from the content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub original_content: String,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

impl Owned for Topic {
    fn owner_id(&self) -> &str {
        &self.user_id
    }
}

/// Request body for creating a new topic.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTopicRequest {
    pub title: String,
    pub content: String,
}

/// Derive the stored summary from the full content: the first 100
/// characters plus an ellipsis marker.
pub fn summarize(content: &str) -> String {
    let prefix: String = content.chars().take(SUMMARY_LEN).collect();
    format!("{}...", prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_truncates_long_content() {
        let content = "x".repeat(250);
        let summary = summarize(&content);
        assert_eq!(summary, format!("{}...", "x".repeat(100)));
    }

    #[test]
    fn summary_of_short_content_keeps_everything() {
        assert_eq!(summarize("short note"), "short note...");
    }

    #[test]
    fn summary_respects_char_boundaries() {
        // Multi-byte characters must not be split mid-codepoint.
        let content = "é".repeat(150);
        let summary = summarize(&content);
        assert_eq!(summary, format!("{}...", "é".repeat(100)));
    }
}
