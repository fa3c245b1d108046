//! Order API Module
//!
//! Item mutations are only accepted while the order is `PENDING`.
//!
//! | 路径 | 方法 | 说明 | 角色 |
//! |------|------|------|------|
//! | /api/orders | POST | 下单 (可带初始菜品) | 任意 |
//! | /api/orders | GET | 我的订单 / 餐厅订单 (`restaurant_id`, `status`) | 任意 / staff |
//! | /api/orders/{id} | GET | 详情 | 本人 / staff |
//! | /api/orders/{id}/items | POST | 加菜 | 本人 / staff |
//! | /api/orders/{id}/items/{menu_item_id} | DELETE | 删菜 | 本人 / staff |
//! | /api/orders/{id}/items/{menu_item_id}/quantity | PUT | 改数量 (<= 0 删除) | 本人 / staff |
//! | /api/orders/{id}/cancel | POST | 取消 | 本人 / staff |
//! | /api/orders/{id}/advance | POST | 推进状态 | staff |

mod handler;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/orders", post(handler::create).get(handler::list))
        .route("/api/orders/{id}", get(handler::get_by_id))
        .route("/api/orders/{id}/items", post(handler::add_item))
        .route(
            "/api/orders/{id}/items/{menu_item_id}",
            delete(handler::remove_item),
        )
        .route(
            "/api/orders/{id}/items/{menu_item_id}/quantity",
            put(handler::set_quantity),
        )
        .route("/api/orders/{id}/cancel", post(handler::cancel))
        .route("/api/orders/{id}/advance", post(handler::advance))
}
