//! Quiz API endpoints: generation, lookup, submission.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;

use super::ensure_owned;
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::{GenerateQuizRequest, Quiz, Streak, SubmitQuizRequest};
use crate::AppState;

/// Response body for a quiz submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizResponse {
    pub quiz: Quiz,
    pub streak: Streak,
    pub streak_updated: bool,
}

/// POST /api/quizzes/generate - Generate a quiz from one of the caller's topics.
///
/// The topic stands alone as useful study material, so it is not rolled
/// back when generation fails; no quiz row is written on failure either.
pub async fn generate_quiz(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<GenerateQuizRequest>,
) -> Result<(StatusCode, Json<Quiz>), AppError> {
    let topic = ensure_owned(
        state.repo.get_topic(request.topic_id).await?,
        &user_id,
        "Topic",
    )?;

    let questions = state.quiz_gen.generate(&topic.original_content).await?;
    tracing::info!(
        topic_id = topic.id,
        count = questions.len(),
        "Generated quiz questions"
    );

    let title = format!("Quiz: {}", topic.title);
    let quiz = state
        .repo
        .create_quiz(&user_id, topic.id, &title, &questions)
        .await?;

    Ok((StatusCode::CREATED, Json(quiz)))
}

/// GET /api/quizzes/{id} - Get a single quiz owned by the caller.
pub async fn get_quiz(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Quiz>, AppError> {
    let quiz = ensure_owned(state.repo.get_quiz(id).await?, &user_id, "Quiz")?;
    Ok(Json(quiz))
}

/// POST /api/quizzes/{id}/submit - Record the caller's final score.
///
/// Sets score and completion timestamp exactly once, then applies the
/// streak rule for the submission day.
pub async fn submit_quiz(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
    Json(request): Json<SubmitQuizRequest>,
) -> Result<Json<SubmitQuizResponse>, AppError> {
    let quiz = ensure_owned(state.repo.get_quiz(id).await?, &user_id, "Quiz")?;
    if quiz.completed_at.is_some() {
        return Err(AppError::Validation(format!(
            "Quiz {} has already been submitted",
            id
        )));
    }

    let now = Utc::now();
    let quiz = state.repo.submit_quiz(id, request.score, now).await?;
    let (streak, streak_updated) = state.repo.record_study_activity(&user_id, now).await?;

    tracing::info!(
        quiz_id = id,
        score = request.score,
        streak = streak.current_streak,
        streak_updated,
        "Submitted quiz"
    );

    Ok(Json(SubmitQuizResponse {
        quiz,
        streak,
        streak_updated,
    }))
}
