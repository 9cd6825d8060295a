//! Topic API endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::ensure_owned;
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::{CreateTopicRequest, Topic};
use crate::AppState;

/// Minimum length of topic content worth generating a quiz from.
const MIN_CONTENT_LEN: usize = 10;

/// GET /api/topics - List the caller's topics, newest first.
pub async fn list_topics(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Topic>>, AppError> {
    let topics = state.repo.list_topics(&user_id).await?;
    Ok(Json(topics))
}

/// POST /api/topics - Create a new topic.
pub async fn create_topic(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<CreateTopicRequest>,
) -> Result<(StatusCode, Json<Topic>), AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    if request.content.chars().count() < MIN_CONTENT_LEN {
        return Err(AppError::Validation(format!(
            "Content must be at least {} characters",
            MIN_CONTENT_LEN
        )));
    }

    let topic = state.repo.create_topic(&user_id, &request).await?;
    tracing::info!(topic_id = topic.id, "Created topic");

    Ok((StatusCode::CREATED, Json(topic)))
}

/// GET /api/topics/{id} - Get a single topic owned by the caller.
pub async fn get_topic(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Topic>, AppError> {
    let topic = ensure_owned(state.repo.get_topic(id).await?, &user_id, "Topic")?;
    Ok(Json(topic))
}

/// DELETE /api/topics/{id} - Delete a topic owned by the caller.
///
/// Quizzes generated from the topic are not deleted; they keep a
/// dangling topic reference.
pub async fn delete_topic(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    ensure_owned(state.repo.get_topic(id).await?, &user_id, "Topic")?;
    state.repo.delete_topic(id).await?;
    tracing::info!(topic_id = id, "Deleted topic");

    Ok(StatusCode::NO_CONTENT)
}
