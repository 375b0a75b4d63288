use axum::{
    extract::{Path, Query, State},
    Json,
};

use opinions_core::opinion::{Reaction, ReactionInfo, ReactionInfoQuery, SaveReactionRequest};

use crate::{handlers::AppError, state::AppState};

/// Set a user's reaction on an opinion (PUT /api/opinions/{opinion_id}/reactions).
pub async fn save_reaction(
    State(state): State<AppState>,
    Path(opinion_id): Path<String>,
    Json(payload): Json<SaveReactionRequest>,
) -> Result<Json<Reaction>, AppError> {
    let reaction = state
        .reaction_repo
        .save_reaction(&opinion_id, &payload.mail_address, payload.is_reactioned)
        .await?;

    tracing::info!(
        opinion_id = %opinion_id,
        is_reactioned = reaction.is_reactioned,
        "Saved reaction"
    );

    Ok(Json(reaction))
}

/// Get the caller's reaction and the opinion's reaction count
/// (GET /api/opinions/{opinion_id}/reactions?mailAddress=...).
pub async fn get_reaction_info(
    State(state): State<AppState>,
    Path(opinion_id): Path<String>,
    Query(query): Query<ReactionInfoQuery>,
) -> Result<Json<ReactionInfo>, AppError> {
    let info = state
        .reaction_repo
        .get_reaction_info(&opinion_id, &query.mail_address)
        .await?;

    Ok(Json(info))
}
