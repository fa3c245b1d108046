//! Restaurant API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;
use shared::models::{DiningTable, Restaurant, Review};

use crate::catalog::{Catalog, CatalogError};
use crate::core::ServerState;
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: NaiveDate,
    pub time_slot_id: i64,
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Restaurant>> {
    let restaurant = state
        .catalog
        .restaurant(id)
        .ok_or(CatalogError::RestaurantNotFound(id))?;
    Ok(Json(restaurant))
}

/// Active tables still free for (time slot, date)
///
/// A snapshot only; booking goes through `POST /api/reservations`.
pub async fn availability(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<Vec<DiningTable>>> {
    let tables = state
        .reservations
        .available_tables(id, query.time_slot_id, query.date)?;
    Ok(Json(tables))
}

pub async fn reviews(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Review>>> {
    Ok(Json(state.reviews.list(id)?))
}
