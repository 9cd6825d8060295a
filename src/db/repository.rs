//! Database repository for CRUD operations.
//!
//! Uses prepared statements; the streak read-modify-write runs inside a
//! single transaction so concurrent submissions cannot double-count a day.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{summarize, CreateTopicRequest, QuestionItem, Quiz, Streak, Topic};
use crate::streak::{classify, next_streak, StreakAction};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== TOPIC OPERATIONS ====================

    /// List a user's topics, newest first.
    pub async fn list_topics(&self, user_id: &str) -> Result<Vec<Topic>, AppError> {
        let rows = sqlx::query(
            "SELECT id, user_id, title, original_content, summary, created_at
             FROM topics WHERE user_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(topic_from_row).collect())
    }

    /// Get a topic by ID.
    pub async fn get_topic(&self, id: i64) -> Result<Option<Topic>, AppError> {
        let row = sqlx::query(
            "SELECT id, user_id, title, original_content, summary, created_at
             FROM topics WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(topic_from_row))
    }

    /// Create a new topic. The summary is derived from the content once,
    /// at creation time.
    pub async fn create_topic(
        &self,
        user_id: &str,
        request: &CreateTopicRequest,
    ) -> Result<Topic, AppError> {
        let now = Utc::now();
        let summary = summarize(&request.content);

        let result = sqlx::query(
            "INSERT INTO topics (user_id, title, original_content, summary, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(&request.title)
        .bind(&request.content)
        .bind(&summary)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Topic {
            id: result.last_insert_rowid(),
            user_id: user_id.to_string(),
            title: request.title.clone(),
            original_content: request.content.clone(),
            summary,
            created_at: now,
        })
    }

    /// Delete a topic. Dependent quizzes are left in place; their
    /// topic_id becomes a dangling reference by design.
    pub async fn delete_topic(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM topics WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Topic {} not found", id)));
        }

        Ok(())
    }

    // ==================== QUIZ OPERATIONS ====================

    /// Get a quiz by ID.
    pub async fn get_quiz(&self, id: i64) -> Result<Option<Quiz>, AppError> {
        let row = sqlx::query(
            "SELECT id, topic_id, user_id, title, questions, score, completed_at, created_at
             FROM quizzes WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(quiz_from_row))
    }

    /// Persist a freshly generated quiz with no score yet.
    pub async fn create_quiz(
        &self,
        user_id: &str,
        topic_id: i64,
        title: &str,
        questions: &[QuestionItem],
    ) -> Result<Quiz, AppError> {
        let now = Utc::now();
        let questions_json =
            serde_json::to_string(questions).map_err(|e| AppError::Internal(e.to_string()))?;

        let result = sqlx::query(
            "INSERT INTO quizzes (topic_id, user_id, title, questions, score, completed_at, created_at)
             VALUES (?, ?, ?, ?, NULL, NULL, ?)",
        )
        .bind(topic_id)
        .bind(user_id)
        .bind(title)
        .bind(&questions_json)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Quiz {
            id: result.last_insert_rowid(),
            topic_id,
            user_id: user_id.to_string(),
            title: title.to_string(),
            questions: questions.to_vec(),
            score: None,
            completed_at: None,
            created_at: now,
        })
    }

    /// Record a quiz's final score. Writes exactly once: the UPDATE is
    /// guarded on `completed_at IS NULL`, so a concurrent second submit
    /// loses and surfaces as a validation error.
    pub async fn submit_quiz(
        &self,
        id: i64,
        score: i64,
        now: DateTime<Utc>,
    ) -> Result<Quiz, AppError> {
        let result = sqlx::query(
            "UPDATE quizzes SET score = ?, completed_at = ?
             WHERE id = ? AND completed_at IS NULL",
        )
        .bind(score)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::Validation(format!(
                "Quiz {} has already been submitted",
                id
            )));
        }

        self.get_quiz(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz {} not found", id)))
    }

    // ==================== STREAK OPERATIONS ====================

    /// Get a user's streak, if one exists yet.
    pub async fn get_streak(&self, user_id: &str) -> Result<Option<Streak>, AppError> {
        let row = sqlx::query(
            "SELECT id, user_id, current_streak, last_study_date, updated_at
             FROM streaks WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(streak_from_row))
    }

    /// Apply the streak rule for a qualifying submission at `now`.
    ///
    /// Returns the (possibly unchanged) streak and whether it changed.
    /// The read-classify-write runs in one transaction.
    pub async fn record_study_activity(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<(Streak, bool), AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            "SELECT id, user_id, current_streak, last_study_date, updated_at
             FROM streaks WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            // First submission ever for this user.
            let result = sqlx::query(
                "INSERT INTO streaks (user_id, current_streak, last_study_date, updated_at)
                 VALUES (?, 1, ?, ?)",
            )
            .bind(user_id)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;

            let streak = Streak {
                id: result.last_insert_rowid(),
                user_id: user_id.to_string(),
                current_streak: 1,
                last_study_date: Some(now),
                updated_at: now,
            };
            return Ok((streak, true));
        };

        let mut streak = streak_from_row(&row);
        let action = classify(streak.last_study_date, now);

        if action == StreakAction::AlreadyCounted {
            // Same calendar day: leave the record untouched.
            tx.commit().await?;
            return Ok((streak, false));
        }

        let new_count = next_streak(action, streak.current_streak);

        sqlx::query(
            "UPDATE streaks SET current_streak = ?, last_study_date = ?, updated_at = ?
             WHERE user_id = ?",
        )
        .bind(new_count)
        .bind(now)
        .bind(now)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        streak.current_streak = new_count;
        streak.last_study_date = Some(now);
        streak.updated_at = now;
        Ok((streak, true))
    }
}

// Helper functions for row conversion

fn topic_from_row(row: &sqlx::sqlite::SqliteRow) -> Topic {
    Topic {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        original_content: row.get("original_content"),
        summary: row.get("summary"),
        created_at: row.get("created_at"),
    }
}

fn quiz_from_row(row: &sqlx::sqlite::SqliteRow) -> Quiz {
    let id: i64 = row.get("id");
    let questions_json: String = row.get("questions");
    Quiz {
        id,
        topic_id: row.get("topic_id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        questions: parse_questions_column(id, &questions_json),
        score: row.get("score"),
        completed_at: row.get("completed_at"),
        created_at: row.get("created_at"),
    }
}

/// Decode the stored questions JSON. A corrupted column falls back to an
/// empty quiz rather than failing the whole read, but loudly.
fn parse_questions_column(quiz_id: i64, json: &str) -> Vec<QuestionItem> {
    serde_json::from_str(json).unwrap_or_else(|e| {
        tracing::warn!(quiz_id, "Corrupted questions column, serving empty quiz: {}", e);
        Vec::new()
    })
}

fn streak_from_row(row: &sqlx::sqlite::SqliteRow) -> Streak {
    Streak {
        id: row.get("id"),
        user_id: row.get("user_id"),
        current_streak: row.get("current_streak"),
        last_study_date: row.get("last_study_date"),
        updated_at: row.get("updated_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupted_questions_column_yields_empty_quiz() {
        assert!(parse_questions_column(7, "not valid json").is_empty());
        assert!(parse_questions_column(7, "").is_empty());
    }

    #[test]
    fn valid_questions_column_round_trips() {
        let json = r#"[{"question":"Q","options":["a","b","c","d"],"correctAnswer":"a","explanation":"e"}]"#;
        let questions = parse_questions_column(7, json);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].correct_answer, "a");
    }
}
