//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use shared::models::{
    Order, OrderAdvance, OrderCreate, OrderCreated, OrderItemInput, OrderStatus, QuantityUpdate,
};

use crate::auth::{CurrentActor, require_staff};
use crate::core::ServerState;
use crate::orders::ItemOp;
use crate::security_log;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub restaurant_id: Option<i64>,
    pub status: Option<OrderStatus>,
}

pub async fn create(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Json(payload): Json<OrderCreate>,
) -> AppResult<(StatusCode, Json<OrderCreated>)> {
    let created = state.orders.create(&actor, payload)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Caller's own orders, or a restaurant's (staff, optional status filter)
pub async fn list(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = match query.restaurant_id {
        Some(restaurant_id) => {
            require_staff(&actor)?;
            state.orders.list_for_restaurant(restaurant_id, query.status)?
        }
        None => {
            let mut orders = state.orders.list_for_customer(&actor.id)?;
            if let Some(status) = query.status {
                orders.retain(|o| o.status == status);
            }
            orders
        }
    };
    Ok(Json(orders))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = state.orders.get(&id)?;
    if !actor.may_act_for(&order.customer_id) {
        security_log!(
            "WARN",
            "order_read_forbidden",
            actor_id = actor.id.as_str(),
            order_id = id.as_str()
        );
        return Err(AppError::forbidden("Order belongs to another customer"));
    }
    Ok(Json(order))
}

pub async fn add_item(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Path(id): Path<String>,
    Json(payload): Json<OrderItemInput>,
) -> AppResult<Json<Order>> {
    let op = ItemOp::Add {
        menu_item_id: payload.menu_item_id,
        quantity: payload.quantity,
    };
    Ok(Json(state.orders.mutate_items(&id, op, Some(&actor.0))?))
}

pub async fn remove_item(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Path((id, menu_item_id)): Path<(String, i64)>,
) -> AppResult<Json<Order>> {
    let op = ItemOp::Remove { menu_item_id };
    Ok(Json(state.orders.mutate_items(&id, op, Some(&actor.0))?))
}

pub async fn set_quantity(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Path((id, menu_item_id)): Path<(String, i64)>,
    Json(payload): Json<QuantityUpdate>,
) -> AppResult<Json<Order>> {
    let op = ItemOp::SetQuantity {
        menu_item_id,
        quantity: payload.quantity,
    };
    Ok(Json(state.orders.mutate_items(&id, op, Some(&actor.0))?))
}

pub async fn cancel(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.orders.cancel(&id, Some(&actor.0))?))
}

pub async fn advance(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Path(id): Path<String>,
    Json(payload): Json<OrderAdvance>,
) -> AppResult<Json<Order>> {
    require_staff(&actor)?;
    Ok(Json(state.orders.advance(&id, payload.status)?))
}
