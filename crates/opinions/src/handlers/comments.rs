use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use opinions_core::opinion::{Comment, CreateCommentRequest, CreatedComment};

use crate::{handlers::AppError, state::AppState};

/// List the comments of an opinion, oldest first (GET /api/opinions/{opinion_id}/comments).
pub async fn list_comments(
    State(state): State<AppState>,
    Path(opinion_id): Path<String>,
) -> Result<Json<Vec<Comment>>, AppError> {
    let comments = state.comment_repo.list_comments(&opinion_id).await?;

    tracing::debug!(opinion_id = %opinion_id, count = comments.len(), "Listed comments");

    Ok(Json(comments))
}

/// Comment on an opinion (POST /api/opinions/{opinion_id}/comments).
///
/// The opinion is not required to exist.
pub async fn create_comment(
    State(state): State<AppState>,
    Path(opinion_id): Path<String>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let comment_id = state
        .comment_repo
        .save_comment(&opinion_id, &payload.mail_address, &payload.comment)
        .await?;

    tracing::info!(opinion_id = %opinion_id, comment_id = %comment_id, "Created comment");

    Ok((StatusCode::CREATED, Json(CreatedComment { comment_id })))
}
