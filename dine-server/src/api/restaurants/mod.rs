//! Restaurant API Module
//!
//! Public read endpoints: table availability and reviews.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/restaurants/{id}", get(handler::get_by_id))
        .route(
            "/api/restaurants/{id}/availability",
            get(handler::availability),
        )
        .route("/api/restaurants/{id}/reviews", get(handler::reviews))
}
