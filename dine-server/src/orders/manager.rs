//! OrdersManager - 订单状态机
//!
//! # Mutation Flow
//!
//! ```text
//! lock(order_id)
//!     ├─ 1. load → ownership check
//!     ├─ 2. status check (Pending only, else OrderLocked)
//!     ├─ 3. ledger op on a working copy of the items
//!     ├─ 4. recompute_total
//!     └─ 5. save (order + items in one write)
//! unlock → publish OrderItemsChanged
//! ```
//!
//! A failed step leaves the stored order untouched.

use super::error::{OrderError, OrderResult};
use super::ledger;
use crate::catalog::Catalog;
use crate::notify::ChangeNotifier;
use crate::storage::BookingStore;
use crate::utils::KeyedLocks;
use shared::message::{ChangeEvent, ChangeEventType};
use shared::models::{MenuItem, Order, OrderCreate, OrderCreated, OrderStatus};
use shared::types::{Actor, now_millis};
use std::sync::Arc;

/// Item mutation applied to a Pending order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOp {
    Add { menu_item_id: i64, quantity: i32 },
    Remove { menu_item_id: i64 },
    SetQuantity { menu_item_id: i64, quantity: i32 },
}

pub struct OrdersManager {
    catalog: Arc<dyn Catalog>,
    store: Arc<dyn BookingStore>,
    notifier: ChangeNotifier,
    locks: KeyedLocks<String>,
}

impl std::fmt::Debug for OrdersManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrdersManager")
            .field("store", &"<BookingStore>")
            .field("locked_orders", &self.locks.len())
            .finish()
    }
}

impl OrdersManager {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        store: Arc<dyn BookingStore>,
        notifier: ChangeNotifier,
    ) -> Self {
        Self {
            catalog,
            store,
            notifier,
            locks: KeyedLocks::new(),
        }
    }

    // ========== Commands ==========

    /// Open a Pending order, optionally seeded with a batch of items
    ///
    /// Lines with an unknown / inactive / foreign menu item, a bad quantity or
    /// an out-of-range amount are skipped and reported back; the total covers what was inserted.
    pub fn create(&self, actor: &Actor, req: OrderCreate) -> OrderResult<OrderCreated> {
        let restaurant = self
            .catalog
            .restaurant(req.restaurant_id)
            .ok_or(OrderError::RestaurantNotFound(req.restaurant_id))?;
        if !restaurant.is_open_for_business() {
            return Err(OrderError::RestaurantNotApproved(req.restaurant_id));
        }

        let mut items = Vec::with_capacity(req.items.len());
        let mut skipped_menu_item_ids = Vec::new();
        for input in &req.items {
            let added = self
                .resolve_menu_item(req.restaurant_id, input.menu_item_id)
                .and_then(|menu_item| {
                    let mut candidate = items.clone();
                    ledger::add_item(&mut candidate, &menu_item, input.quantity)?;
                    ledger::recompute_total(&candidate)?;
                    items = candidate;
                    Ok(())
                });
            if let Err(e) = added {
                tracing::warn!(
                    restaurant_id = req.restaurant_id,
                    menu_item_id = input.menu_item_id,
                    error = %e,
                    "Skipping order line"
                );
                skipped_menu_item_ids.push(input.menu_item_id);
            }
        }

        let now = now_millis();
        let order = Order {
            id: uuid::Uuid::new_v4().to_string(),
            restaurant_id: req.restaurant_id,
            customer_id: actor.id.clone(),
            status: OrderStatus::Pending,
            total_amount: ledger::recompute_total(&items)?,
            items,
            created_at: now,
            updated_at: now,
        };
        self.store.save_order(&order)?;

        tracing::info!(
            order_id = %order.id,
            customer_id = %order.customer_id,
            items = order.items.len(),
            skipped = skipped_menu_item_ids.len(),
            total = %order.total_amount,
            "Order created"
        );
        self.publish(ChangeEventType::OrderCreated, &order);
        Ok(OrderCreated {
            order,
            skipped_menu_item_ids,
        })
    }

    /// Add / remove / set quantity on a Pending order
    pub fn mutate_items(&self, id: &str, op: ItemOp, actor: Option<&Actor>) -> OrderResult<Order> {
        let order = self.with_order(id, actor, |order| {
            if !order.status.is_mutable() {
                return Err(OrderError::OrderLocked {
                    id: order.id.clone(),
                    status: order.status,
                });
            }

            let mut items = order.items.clone();
            match op {
                ItemOp::Add {
                    menu_item_id,
                    quantity,
                } => {
                    let menu_item = self.resolve_menu_item(order.restaurant_id, menu_item_id)?;
                    ledger::add_item(&mut items, &menu_item, quantity)?;
                }
                ItemOp::Remove { menu_item_id } => {
                    ledger::remove_item(&mut items, menu_item_id)?;
                }
                ItemOp::SetQuantity {
                    menu_item_id,
                    quantity,
                } => {
                    ledger::set_quantity(&mut items, menu_item_id, quantity)?;
                }
            }

            order.total_amount = ledger::recompute_total(&items)?;
            order.items = items;
            Ok(())
        })?;

        tracing::info!(order_id = %id, op = ?op, total = %order.total_amount, "Order items changed");
        self.publish(ChangeEventType::OrderItemsChanged, &order);
        Ok(order)
    }

    /// Pending | InProgress → Cancelled
    pub fn cancel(&self, id: &str, actor: Option<&Actor>) -> OrderResult<Order> {
        let order = self.with_order(id, actor, |order| {
            if !order.status.can_transition_to(OrderStatus::Cancelled) {
                return Err(OrderError::NotCancellable {
                    id: order.id.clone(),
                    status: order.status,
                });
            }
            order.status = OrderStatus::Cancelled;
            Ok(())
        })?;

        tracing::info!(order_id = %id, "Order cancelled");
        self.publish(ChangeEventType::OrderCancelled, &order);
        Ok(order)
    }

    /// One step forward on Pending → InProgress → Completed
    ///
    /// Skips, moves backwards and `Cancelled` are rejected; cancel has its own operation.
    pub fn advance(&self, id: &str, next: OrderStatus) -> OrderResult<Order> {
        let order = self.with_order(id, None, |order| {
            if order.status.next_forward() != Some(next) {
                return Err(OrderError::InvalidTransition {
                    id: order.id.clone(),
                    from: order.status,
                    to: next,
                });
            }
            order.status = next;
            Ok(())
        })?;

        tracing::info!(order_id = %id, status = %next, "Order advanced");
        self.publish(ChangeEventType::OrderStatusChanged, &order);
        Ok(order)
    }

    /// Load → check owner → mutate → save, serialized per order id
    fn with_order(
        &self,
        id: &str,
        actor: Option<&Actor>,
        mutate: impl FnOnce(&mut Order) -> OrderResult<()>,
    ) -> OrderResult<Order> {
        let key = id.to_string();
        self.locks.with_lock(&key, || {
            let mut order = self.get(id)?;

            if let Some(actor) = actor
                && !actor.may_act_for(&order.customer_id)
            {
                crate::security_log!(
                    "WARN",
                    "order_forbidden",
                    actor_id = actor.id.as_str(),
                    order_id = id
                );
                return Err(OrderError::Forbidden {
                    id: id.to_string(),
                    actor_id: actor.id.clone(),
                });
            }

            mutate(&mut order)?;
            order.updated_at = now_millis();
            self.store.save_order(&order)?;
            Ok(order)
        })
    }

    fn resolve_menu_item(&self, restaurant_id: i64, menu_item_id: i64) -> OrderResult<MenuItem> {
        self.catalog
            .menu_item(menu_item_id)
            .filter(|m| m.restaurant_id == restaurant_id && m.is_active)
            .ok_or(OrderError::MenuItemNotFound(menu_item_id))
    }

    fn publish(&self, event_type: ChangeEventType, order: &Order) {
        self.notifier.publish(ChangeEvent::new(
            event_type,
            order.restaurant_id,
            &order.id,
            order,
        ));
    }

    // ========== Queries ==========

    pub fn get(&self, id: &str) -> OrderResult<Order> {
        self.store
            .get_order(id)?
            .ok_or_else(|| OrderError::NotFound(id.to_string()))
    }

    /// Newest first
    pub fn list_for_customer(&self, customer_id: &str) -> OrderResult<Vec<Order>> {
        self.list_where(|o| o.customer_id == customer_id)
    }

    /// Newest first, optionally filtered by status
    pub fn list_for_restaurant(
        &self,
        restaurant_id: i64,
        status: Option<OrderStatus>,
    ) -> OrderResult<Vec<Order>> {
        self.list_where(|o| {
            o.restaurant_id == restaurant_id && status.is_none_or(|s| o.status == s)
        })
    }

    fn list_where(&self, predicate: impl Fn(&Order) -> bool) -> OrderResult<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .store
            .list_orders()?
            .into_iter()
            .filter(|o| predicate(o))
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    /// Stored total matches the items (diagnostics / tests)
    pub fn verify_total(order: &Order) -> bool {
        ledger::recompute_total(&order.items).is_ok_and(|total| total == order.total_amount)
    }
}
