//! Order errors

use crate::storage::StorageError;
use shared::error::{AppError, ErrorCode};
use shared::models::OrderStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Order not found: {0}")]
    NotFound(String),

    #[error("Restaurant not found: {0}")]
    RestaurantNotFound(i64),

    #[error("Restaurant {0} is not approved")]
    RestaurantNotApproved(i64),

    #[error("Order {id} is {status}, items can no longer change")]
    OrderLocked { id: String, status: OrderStatus },

    #[error("Order {id} cannot be cancelled from {status}")]
    NotCancellable { id: String, status: OrderStatus },

    #[error("Order {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: OrderStatus,
        to: OrderStatus,
    },

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i32),

    #[error("Order amount out of range at menu item {0}")]
    AmountOverflow(i64),

    #[error("Menu item not found: {0}")]
    MenuItemNotFound(i64),

    #[error("Menu item {0} is not in the order")]
    ItemNotFound(i64),

    #[error("Actor {actor_id} may not modify order {id}")]
    Forbidden { id: String, actor_id: String },
}

pub type OrderResult<T> = Result<T, OrderError>;

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::Storage(e) => {
                tracing::error!(error = %e, "Order storage error");
                AppError::internal()
            }
            OrderError::NotFound(id) => {
                AppError::new(ErrorCode::OrderNotFound).with_detail("order_id", id)
            }
            OrderError::RestaurantNotFound(id) => {
                AppError::new(ErrorCode::RestaurantNotFound).with_detail("restaurant_id", id)
            }
            OrderError::RestaurantNotApproved(id) => {
                AppError::new(ErrorCode::RestaurantNotApproved).with_detail("restaurant_id", id)
            }
            OrderError::OrderLocked { id, status } => AppError::new(ErrorCode::OrderLocked)
                .with_detail("order_id", id)
                .with_detail("status", status.to_string()),
            OrderError::NotCancellable { id, status } => {
                AppError::new(ErrorCode::OrderNotCancellable)
                    .with_detail("order_id", id)
                    .with_detail("status", status.to_string())
            }
            OrderError::InvalidTransition { id, from, to } => {
                AppError::new(ErrorCode::InvalidTransition)
                    .with_detail("order_id", id)
                    .with_detail("from", from.to_string())
                    .with_detail("to", to.to_string())
            }
            OrderError::InvalidQuantity(quantity) => {
                AppError::new(ErrorCode::InvalidQuantity).with_detail("quantity", quantity)
            }
            OrderError::AmountOverflow(id) => {
                AppError::new(ErrorCode::OrderAmountOverflow).with_detail("menu_item_id", id)
            }
            OrderError::MenuItemNotFound(id) => {
                AppError::new(ErrorCode::MenuItemNotFound).with_detail("menu_item_id", id)
            }
            OrderError::ItemNotFound(id) => {
                AppError::new(ErrorCode::OrderItemNotFound).with_detail("menu_item_id", id)
            }
            OrderError::Forbidden { id, .. } => {
                AppError::forbidden("Order belongs to another customer").with_detail("order_id", id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_is_generic() {
        let err: AppError = OrderError::Storage(StorageError::Io(std::io::Error::other(
            "/var/lib/dine/dine.redb: permission denied",
        )))
        .into();
        assert_eq!(err.code, ErrorCode::InternalError);
        assert!(!err.message.contains("dine.redb"));
        assert!(err.details.is_none());
    }

    #[test]
    fn test_taxonomy_codes() {
        let err: AppError = OrderError::OrderLocked {
            id: "o1".into(),
            status: OrderStatus::InProgress,
        }
        .into();
        assert_eq!(err.code, ErrorCode::OrderLocked);
        assert_eq!(err.http_status(), http::StatusCode::CONFLICT);

        let err: AppError = OrderError::ItemNotFound(7).into();
        assert_eq!(err.code, ErrorCode::OrderItemNotFound);

        let err: AppError = OrderError::InvalidQuantity(0).into();
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);

        let err: AppError = OrderError::AmountOverflow(501).into();
        assert_eq!(err.code, ErrorCode::OrderAmountOverflow);
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
    }
}
