//! Catalog - 餐厅 / 桌台 / 时段 / 菜品 查询
//!
//! 核心组件只通过 [`Catalog`] trait 读取目录数据；
//! [`InMemoryCatalog`] 提供管理操作 (审批、改价) 与 JSON 种子加载。

use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{DiningTable, MenuItem, Restaurant, RestaurantStatus, TimeSlot};
use std::path::Path;
use thiserror::Error;

/// Prices are whole cents
pub const PRICE_SCALE: u32 = 2;

/// Upper bound for a unit price; keeps `price × quantity` sums far from the
/// `Decimal` range
pub const MAX_PRICE: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 2);

/// Read-only catalog lookups used by the lifecycles
pub trait Catalog: Send + Sync {
    fn restaurant(&self, id: i64) -> Option<Restaurant>;
    fn table(&self, id: i64) -> Option<DiningTable>;
    fn time_slot(&self, id: i64) -> Option<TimeSlot>;
    fn menu_item(&self, id: i64) -> Option<MenuItem>;
    /// All tables of a restaurant, ordered by id
    fn tables_for_restaurant(&self, restaurant_id: i64) -> Vec<DiningTable>;
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Restaurant not found: {0}")]
    RestaurantNotFound(i64),

    #[error("Menu item not found: {0}")]
    MenuItemNotFound(i64),

    #[error("Invalid price {price} for menu item {menu_item_id}")]
    InvalidPrice { menu_item_id: i64, price: Decimal },

    #[error("Restaurant {id} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        id: i64,
        from: RestaurantStatus,
        to: RestaurantStatus,
    },

    #[error("Time slot {0} must start before it ends")]
    InvalidTimeSlot(i64),

    #[error("Failed to read catalog seed: {0}")]
    SeedIo(#[from] std::io::Error),

    #[error("Failed to parse catalog seed: {0}")]
    SeedParse(#[from] serde_json::Error),
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::RestaurantNotFound(id) => {
                AppError::new(ErrorCode::RestaurantNotFound).with_detail("restaurant_id", id)
            }
            CatalogError::MenuItemNotFound(id) => {
                AppError::new(ErrorCode::MenuItemNotFound).with_detail("menu_item_id", id)
            }
            CatalogError::InvalidPrice { menu_item_id, price } => {
                AppError::new(ErrorCode::MenuItemInvalidPrice)
                    .with_detail("menu_item_id", menu_item_id)
                    .with_detail("price", price.to_string())
            }
            CatalogError::InvalidStatusTransition { id, from, to } => {
                AppError::new(ErrorCode::RestaurantInvalidTransition)
                    .with_detail("restaurant_id", id)
                    .with_detail("from", from.to_string())
                    .with_detail("to", to.to_string())
            }
            CatalogError::InvalidTimeSlot(id) => {
                AppError::new(ErrorCode::TimeSlotInvalid).with_detail("time_slot_id", id)
            }
            CatalogError::SeedIo(_) | CatalogError::SeedParse(_) => {
                AppError::new(ErrorCode::ConfigError)
            }
        }
    }
}

/// JSON seed file layout
#[derive(Debug, Default, Deserialize)]
pub struct CatalogSeed {
    #[serde(default)]
    pub restaurants: Vec<Restaurant>,
    #[serde(default)]
    pub tables: Vec<DiningTable>,
    #[serde(default)]
    pub time_slots: Vec<TimeSlot>,
    #[serde(default)]
    pub menu_items: Vec<MenuItem>,
}

/// DashMap-backed catalog
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    restaurants: DashMap<i64, Restaurant>,
    tables: DashMap<i64, DiningTable>,
    time_slots: DashMap<i64, TimeSlot>,
    menu_items: DashMap<i64, MenuItem>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON seed file
    pub fn from_seed_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let bytes = std::fs::read(path.as_ref())?;
        let seed: CatalogSeed = serde_json::from_slice(&bytes)?;
        let catalog = Self::from_seed(seed)?;
        tracing::info!(
            path = %path.as_ref().display(),
            restaurants = catalog.restaurants.len(),
            tables = catalog.tables.len(),
            time_slots = catalog.time_slots.len(),
            menu_items = catalog.menu_items.len(),
            "Catalog seed loaded"
        );
        Ok(catalog)
    }

    pub fn from_seed(seed: CatalogSeed) -> Result<Self, CatalogError> {
        let catalog = Self::new();
        for restaurant in seed.restaurants {
            catalog.upsert_restaurant(restaurant);
        }
        for table in seed.tables {
            catalog.upsert_table(table);
        }
        for slot in seed.time_slots {
            catalog.upsert_time_slot(slot)?;
        }
        for item in seed.menu_items {
            catalog.upsert_menu_item(item)?;
        }
        Ok(catalog)
    }

    // ========== Upserts ==========

    pub fn upsert_restaurant(&self, restaurant: Restaurant) {
        self.restaurants.insert(restaurant.id, restaurant);
    }

    pub fn upsert_table(&self, table: DiningTable) {
        self.tables.insert(table.id, table);
    }

    pub fn upsert_time_slot(&self, slot: TimeSlot) -> Result<(), CatalogError> {
        if !slot.is_well_formed() {
            return Err(CatalogError::InvalidTimeSlot(slot.id));
        }
        self.time_slots.insert(slot.id, slot);
        Ok(())
    }

    pub fn upsert_menu_item(&self, item: MenuItem) -> Result<(), CatalogError> {
        validate_price(item.id, item.price)?;
        self.menu_items.insert(item.id, item);
        Ok(())
    }

    // ========== Management ==========

    /// Admin approval workflow
    ///
    /// Returns the restaurant and whether the status changed. Repeating the
    /// current status is a no-op; any other move off a decided status fails.
    pub fn set_restaurant_status(
        &self,
        restaurant_id: i64,
        status: RestaurantStatus,
    ) -> Result<(Restaurant, bool), CatalogError> {
        let mut restaurant = self
            .restaurants
            .get_mut(&restaurant_id)
            .ok_or(CatalogError::RestaurantNotFound(restaurant_id))?;
        if restaurant.status == status {
            return Ok((restaurant.clone(), false));
        }
        if !restaurant.status.can_transition_to(status) {
            return Err(CatalogError::InvalidStatusTransition {
                id: restaurant_id,
                from: restaurant.status,
                to: status,
            });
        }
        restaurant.status = status;
        Ok((restaurant.clone(), true))
    }

    /// Change the current price; existing order snapshots are untouched
    pub fn update_menu_price(
        &self,
        menu_item_id: i64,
        price: Decimal,
    ) -> Result<MenuItem, CatalogError> {
        validate_price(menu_item_id, price)?;
        let mut item = self
            .menu_items
            .get_mut(&menu_item_id)
            .ok_or(CatalogError::MenuItemNotFound(menu_item_id))?;
        item.price = price;
        Ok(item.clone())
    }
}

/// Non-negative, at most [`PRICE_SCALE`] places, at most [`MAX_PRICE`]
fn validate_price(menu_item_id: i64, price: Decimal) -> Result<(), CatalogError> {
    if price.is_sign_negative() || price.normalize().scale() > PRICE_SCALE || price > MAX_PRICE {
        return Err(CatalogError::InvalidPrice {
            menu_item_id,
            price,
        });
    }
    Ok(())
}

impl Catalog for InMemoryCatalog {
    fn restaurant(&self, id: i64) -> Option<Restaurant> {
        self.restaurants.get(&id).map(|r| r.value().clone())
    }

    fn table(&self, id: i64) -> Option<DiningTable> {
        self.tables.get(&id).map(|t| t.value().clone())
    }

    fn time_slot(&self, id: i64) -> Option<TimeSlot> {
        self.time_slots.get(&id).map(|s| s.value().clone())
    }

    fn menu_item(&self, id: i64) -> Option<MenuItem> {
        self.menu_items.get(&id).map(|m| m.value().clone())
    }

    fn tables_for_restaurant(&self, restaurant_id: i64) -> Vec<DiningTable> {
        let mut tables: Vec<DiningTable> = self
            .tables
            .iter()
            .filter(|t| t.restaurant_id == restaurant_id)
            .map(|t| t.value().clone())
            .collect();
        tables.sort_by_key(|t| t.id);
        tables
    }
}
