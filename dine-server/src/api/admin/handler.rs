//! Admin API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::message::{ChangeEvent, ChangeEventType};
use shared::models::{Restaurant, RestaurantStatus};

use crate::auth::{CurrentActor, require_admin};
use crate::core::ServerState;
use crate::utils::AppResult;

pub async fn approve(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Path(id): Path<i64>,
) -> AppResult<Json<Restaurant>> {
    set_status(&state, &actor, id, RestaurantStatus::Approved)
}

pub async fn reject(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Path(id): Path<i64>,
) -> AppResult<Json<Restaurant>> {
    set_status(&state, &actor, id, RestaurantStatus::Rejected)
}

fn set_status(
    state: &ServerState,
    actor: &CurrentActor,
    id: i64,
    status: RestaurantStatus,
) -> AppResult<Json<Restaurant>> {
    require_admin(actor)?;
    let (restaurant, changed) = state.catalog.set_restaurant_status(id, status)?;
    if !changed {
        tracing::debug!(restaurant_id = id, status = %status, "Restaurant status unchanged");
        return Ok(Json(restaurant));
    }

    tracing::info!(restaurant_id = id, status = %status, admin_id = %actor.id, "Restaurant status changed");
    let event_type = match status {
        RestaurantStatus::Approved => ChangeEventType::RestaurantApproved,
        _ => ChangeEventType::RestaurantRejected,
    };
    state
        .notifier
        .publish(ChangeEvent::new(event_type, id, id.to_string(), &restaurant));
    Ok(Json(restaurant))
}
