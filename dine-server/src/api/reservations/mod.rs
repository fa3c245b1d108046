//! Reservation API Module
//!
//! | 路径 | 方法 | 说明 | 角色 |
//! |------|------|------|------|
//! | /api/reservations | POST | 预订桌台时段 | 任意 |
//! | /api/reservations | GET | 我的预订 / 餐厅预订 (`restaurant_id`) | 任意 / staff |
//! | /api/reservations/{id} | GET | 详情 | 本人 / staff |
//! | /api/reservations/{id}/confirm | POST | 确认 | staff |
//! | /api/reservations/{id}/cancel | POST | 取消，释放时段 | 本人 / staff |
//! | /api/reservations/{id}/complete | POST | 完成，释放时段 | staff |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/reservations",
            post(handler::create).get(handler::list),
        )
        .route("/api/reservations/{id}", get(handler::get_by_id))
        .route("/api/reservations/{id}/confirm", post(handler::confirm))
        .route("/api/reservations/{id}/cancel", post(handler::cancel))
        .route("/api/reservations/{id}/complete", post(handler::complete))
}
