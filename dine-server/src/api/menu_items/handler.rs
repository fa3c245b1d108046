//! Menu Item API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::message::{ChangeEvent, ChangeEventType};
use shared::models::{MenuItem, MenuItemPriceUpdate};

use crate::auth::{CurrentActor, require_staff};
use crate::core::ServerState;
use crate::utils::AppResult;

pub async fn update_price(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Path(id): Path<i64>,
    Json(payload): Json<MenuItemPriceUpdate>,
) -> AppResult<Json<MenuItem>> {
    require_staff(&actor)?;
    let item = state.catalog.update_menu_price(id, payload.price)?;

    tracing::info!(menu_item_id = id, price = %item.price, "Menu item price changed");
    state.notifier.publish(ChangeEvent::new(
        ChangeEventType::MenuItemPriceChanged,
        item.restaurant_id,
        id.to_string(),
        &item,
    ));
    Ok(Json(item))
}
