//! Quiz model and the embedded question value type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Owned;

/// Number of answer options every question must carry.
pub const OPTION_COUNT: usize = 4;

/// One multiple-choice question, stored as JSON inside the quiz row.
///
/// Invariant: `correct_answer` equals one of `options`, and `options`
/// holds exactly [`OPTION_COUNT`] entries. Enforced by [`QuestionItem::is_well_formed`]
/// when a generated quiz is accepted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuestionItem {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
}

impl QuestionItem {
    /// Check the shape invariant: four options, correct answer among them.
    pub fn is_well_formed(&self) -> bool {
        self.options.len() == OPTION_COUNT && self.options.contains(&self.correct_answer)
    }
}

/// A generated quiz tied to one topic and one user.
///
/// `score` and `completed_at` are null until the single submit, then set
/// together and never changed again.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: i64,
    pub topic_id: i64,
    pub user_id: String,
    pub title: String,
    pub questions: Vec<QuestionItem>,
    pub score: Option<i64>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Owned for Quiz {
    fn owner_id(&self) -> &str {
        &self.user_id
    }
}

/// Request body for generating a quiz from a topic.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuizRequest {
    pub topic_id: i64,
}

/// Request body for submitting a completed quiz.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizRequest {
    pub score: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(options: &[&str], answer: &str) -> QuestionItem {
        QuestionItem {
            question: "What is Rust?".to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
            correct_answer: answer.to_string(),
            explanation: "Rust is a systems language.".to_string(),
        }
    }

    #[test]
    fn well_formed_question_passes() {
        assert!(question(&["a", "b", "c", "d"], "b").is_well_formed());
    }

    #[test]
    fn answer_outside_options_is_rejected() {
        assert!(!question(&["a", "b", "c", "d"], "e").is_well_formed());
    }

    #[test]
    fn wrong_option_count_is_rejected() {
        assert!(!question(&["a", "b", "c"], "a").is_well_formed());
        assert!(!question(&["a", "b", "c", "d", "e"], "a").is_well_formed());
    }
}
