//! 变更事件消息类型定义
//!
//! 这些类型在 dine-server 和 clients 之间共享，用于
//! 进程内订阅（broadcast）和推送通道（SSE / webhook）。

use crate::types::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// 变更事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeEventType {
    ReservationCreated,
    ReservationConfirmed,
    ReservationCancelled,
    ReservationCompleted,
    OrderCreated,
    OrderItemsChanged,
    OrderStatusChanged,
    OrderCancelled,
    RestaurantApproved,
    RestaurantRejected,
    MenuItemPriceChanged,
    ReviewCreated,
}

impl ChangeEventType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ReservationCreated => "reservation_created",
            Self::ReservationConfirmed => "reservation_confirmed",
            Self::ReservationCancelled => "reservation_cancelled",
            Self::ReservationCompleted => "reservation_completed",
            Self::OrderCreated => "order_created",
            Self::OrderItemsChanged => "order_items_changed",
            Self::OrderStatusChanged => "order_status_changed",
            Self::OrderCancelled => "order_cancelled",
            Self::RestaurantApproved => "restaurant_approved",
            Self::RestaurantRejected => "restaurant_rejected",
            Self::MenuItemPriceChanged => "menu_item_price_changed",
            Self::ReviewCreated => "review_created",
        }
    }
}

impl fmt::Display for ChangeEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 变更事件 - 已提交状态变更的通知信封
///
/// 只在变更持久化之后发布；payload 是变更后的实体快照 (JSON)。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub event_id: Uuid,
    pub event_type: ChangeEventType,
    /// 所属餐厅，订阅方按此过滤
    pub restaurant_id: i64,
    /// 变更的资源 ID (reservation / order / menu item / review)
    pub resource_id: String,
    pub payload: serde_json::Value,
    pub timestamp: Timestamp,
}

impl ChangeEvent {
    /// 创建事件，payload 序列化失败时退化为 null
    pub fn new<T: Serialize>(
        event_type: ChangeEventType,
        restaurant_id: i64,
        resource_id: impl Into<String>,
        payload: &T,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            event_type,
            restaurant_id,
            resource_id: resource_id.into(),
            payload: serde_json::to_value(payload).unwrap_or(serde_json::Value::Null),
            timestamp: crate::types::now_millis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_serde_matches_display() {
        let json = serde_json::to_string(&ChangeEventType::OrderItemsChanged).unwrap();
        assert_eq!(json, format!("\"{}\"", ChangeEventType::OrderItemsChanged));
    }

    #[test]
    fn test_change_event_new() {
        #[derive(Serialize)]
        struct Payload {
            total: u32,
        }

        let event = ChangeEvent::new(
            ChangeEventType::OrderCreated,
            7,
            "order-1",
            &Payload { total: 13 },
        );
        assert_eq!(event.restaurant_id, 7);
        assert_eq!(event.resource_id, "order-1");
        assert_eq!(event.payload["total"], 13);
        assert!(event.timestamp > 0);
    }
}
