//! Streak API endpoint.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::EmptyStreak;
use crate::AppState;

/// GET /api/streak - Get the caller's current streak.
///
/// A user who has never submitted a quiz gets a zero-value streak rather
/// than a 404.
pub async fn get_streak(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Response, AppError> {
    match state.repo.get_streak(&user_id).await? {
        Some(streak) => Ok(Json(streak).into_response()),
        None => Ok(Json(EmptyStreak::default()).into_response()),
    }
}
