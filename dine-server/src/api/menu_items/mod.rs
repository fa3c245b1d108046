//! Menu Item API Module
//!
//! Price changes only affect items added afterwards; placed order lines keep
//! their snapshot.

mod handler;

use axum::{Router, routing::put};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/menu-items/{id}/price", put(handler::update_price))
}
