//! Admin API Module - 餐厅审批
//!
//! 只有 `Approved` 的餐厅接受预订和订单。

mod handler;

use axum::{Router, routing::put};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/admin/restaurants/{id}/approve",
            put(handler::approve),
        )
        .route("/api/admin/restaurants/{id}/reject", put(handler::reject))
}
