//! Reservation API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use shared::models::{Reservation, ReservationCreate};

use crate::auth::{CurrentActor, require_staff};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub restaurant_id: Option<i64>,
}

pub async fn create(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Json(payload): Json<ReservationCreate>,
) -> AppResult<(StatusCode, Json<Reservation>)> {
    let reservation = state.reservations.create(&actor, payload)?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

/// Caller's own reservations, or a restaurant's (staff)
pub async fn list(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Reservation>>> {
    let reservations = match query.restaurant_id {
        Some(restaurant_id) => {
            require_staff(&actor)?;
            state.reservations.list_for_restaurant(restaurant_id)?
        }
        None => state.reservations.list_for_customer(&actor.id)?,
    };
    Ok(Json(reservations))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Path(id): Path<String>,
) -> AppResult<Json<Reservation>> {
    let reservation = state.reservations.get(&id)?;
    if !actor.may_act_for(&reservation.customer_id) {
        security_log!(
            "WARN",
            "reservation_read_forbidden",
            actor_id = actor.id.as_str(),
            reservation_id = id.as_str()
        );
        return Err(AppError::forbidden("Reservation belongs to another customer"));
    }
    Ok(Json(reservation))
}

pub async fn confirm(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Path(id): Path<String>,
) -> AppResult<Json<Reservation>> {
    require_staff(&actor)?;
    Ok(Json(state.reservations.confirm(&id)?))
}

pub async fn cancel(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Path(id): Path<String>,
) -> AppResult<Json<Reservation>> {
    Ok(Json(state.reservations.cancel(&id, Some(&actor.0))?))
}

pub async fn complete(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Path(id): Path<String>,
) -> AppResult<Json<Reservation>> {
    require_staff(&actor)?;
    Ok(Json(state.reservations.complete(&id)?))
}
