//! Menu Item Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Menu item entity (菜品)
///
/// `price` is the current price. Order lines take a snapshot when added,
/// so later price changes only affect items added afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MenuItem {
    pub id: i64,
    pub restaurant_id: i64,
    pub name: String,
    pub price: Decimal,
    pub is_active: bool,
}

/// Update menu item price payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemPriceUpdate {
    pub price: Decimal,
}
