//! Review API Handlers

use axum::{Json, extract::State, http::StatusCode};
use shared::models::{Review, ReviewCreate};

use crate::auth::CurrentActor;
use crate::core::ServerState;
use crate::utils::AppResult;

pub async fn create(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Json(payload): Json<ReviewCreate>,
) -> AppResult<(StatusCode, Json<Review>)> {
    let review = state.reviews.create(&actor, payload)?;
    Ok((StatusCode::CREATED, Json(review)))
}
