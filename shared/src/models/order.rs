//! Order Model

use crate::types::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order status
///
/// ```text
/// Pending ──▶ InProgress ──▶ Completed
///    │            │
///    └────────────┴──▶ Cancelled
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Transition table: every status reachable in one step
    pub const fn allowed_next(self) -> &'static [OrderStatus] {
        use OrderStatus::*;
        match self {
            Pending => &[InProgress, Cancelled],
            InProgress => &[Completed, Cancelled],
            Completed | Cancelled => &[],
        }
    }

    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        self.allowed_next().contains(&next)
    }

    /// Next status on the forward path (Pending → InProgress → Completed)
    pub const fn next_forward(self) -> Option<OrderStatus> {
        match self {
            Self::Pending => Some(Self::InProgress),
            Self::InProgress => Some(Self::Completed),
            Self::Completed | Self::Cancelled => None,
        }
    }

    /// Items may only change before the order is sent to the kitchen
    pub const fn is_mutable(self) -> bool {
        matches!(self, Self::Pending)
    }

    pub const fn is_terminal(self) -> bool {
        self.allowed_next().is_empty()
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

/// Order line item
///
/// Unique per menu item inside an order; quantity is always >= 1.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderItem {
    pub menu_item_id: i64,
    pub name: String,
    pub quantity: i32,
    /// Menu price at the moment the item was first added
    pub unit_price_snapshot: Decimal,
}

/// Order entity
///
/// `total_amount` is derived from `items` and rewritten after every mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Order {
    pub id: String,
    pub restaurant_id: i64,
    pub customer_id: String,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub total_amount: Decimal,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Requested line in order creation / add item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub menu_item_id: i64,
    pub quantity: i32,
}

/// Create order payload (customer comes from the actor)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub restaurant_id: i64,
    #[serde(default)]
    pub items: Vec<OrderItemInput>,
}

/// Created order plus the requested menu items that could not be added
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreated {
    pub order: Order,
    pub skipped_menu_item_ids: Vec<i64>,
}

/// Set quantity payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantityUpdate {
    pub quantity: i32,
}

/// Advance status payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderAdvance {
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    #[test]
    fn test_forward_path() {
        assert_eq!(Pending.next_forward(), Some(InProgress));
        assert_eq!(InProgress.next_forward(), Some(Completed));
        assert_eq!(Completed.next_forward(), None);
        assert_eq!(Cancelled.next_forward(), None);
    }

    #[test]
    fn test_transition_table() {
        assert!(Pending.can_transition_to(InProgress));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(!Pending.can_transition_to(Completed));
        assert!(InProgress.can_transition_to(Completed));
        assert!(InProgress.can_transition_to(Cancelled));
        assert!(!InProgress.can_transition_to(Pending));
        assert!(Completed.is_terminal());
        assert!(Cancelled.is_terminal());
    }

    #[test]
    fn test_only_pending_is_mutable() {
        assert!(Pending.is_mutable());
        assert!(!InProgress.is_mutable());
        assert!(!Completed.is_mutable());
        assert!(!Cancelled.is_mutable());
    }

    #[test]
    fn test_status_serde() {
        assert_eq!(
            serde_json::to_string(&InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        let advance: OrderAdvance = serde_json::from_str(r#"{"status":"COMPLETED"}"#).unwrap();
        assert_eq!(advance.status, Completed);
    }
}
