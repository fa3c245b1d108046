//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`restaurants`] - 餐厅详情、可预订桌台、评价列表
//! - [`reservations`] - 预订
//! - [`orders`] - 订单与明细
//! - [`menu_items`] - 菜品改价
//! - [`reviews`] - 发表评价
//! - [`admin`] - 餐厅审批
//! - [`events`] - SSE 变更推送

pub mod admin;
pub mod events;
pub mod health;
pub mod menu_items;
pub mod orders;
pub mod reservations;
pub mod restaurants;
pub mod reviews;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        // Public
        .merge(health::router())
        .merge(restaurants::router())
        .merge(events::router())
        // Actor required
        .merge(reservations::router())
        .merge(orders::router())
        .merge(reviews::router())
        // Staff / admin
        .merge(menu_items::router())
        .merge(admin::router())
}

/// Build a fully configured application with all middleware and state
///
/// Used by the HTTP server and by `oneshot` tests
pub fn build_app(state: ServerState) -> Router {
    let timeout = state.config.request_timeout();
    build_router().with_state(state).layer(
        ServiceBuilder::new()
            // Trace - outermost, logs every request at INFO
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(timeout))
            .layer(CorsLayer::permissive()),
    )
}
