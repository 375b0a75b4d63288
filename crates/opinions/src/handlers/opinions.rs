use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use opinions_core::opinion::{CreateOpinionRequest, CreatedOpinion, Opinion};

use crate::{handlers::AppError, state::AppState};

/// List all opinions (GET /api/opinions).
pub async fn list_opinions(State(state): State<AppState>) -> Result<Json<Vec<Opinion>>, AppError> {
    let opinions = state.opinion_repo.list_opinions().await?;

    tracing::debug!(count = opinions.len(), "Listed opinions");

    Ok(Json(opinions))
}

/// Submit a new opinion (POST /api/opinions).
pub async fn create_opinion(
    State(state): State<AppState>,
    Json(payload): Json<CreateOpinionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = state
        .opinion_repo
        .save_opinion(
            &payload.mail_address,
            payload.coordinate.latitude,
            payload.coordinate.longitude,
            &payload.opinion,
        )
        .await?;

    tracing::info!(opinion_id = %id, "Created opinion");

    Ok((StatusCode::CREATED, Json(CreatedOpinion { id })))
}
