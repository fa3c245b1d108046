//! Actor Extractor
//!
//! Reads the caller identity asserted by the upstream auth layer

use axum::{extract::FromRequestParts, http::request::Parts};
use shared::types::{Actor, ActorRole};

use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

pub const ACTOR_ID_HEADER: &str = "x-actor-id";
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

/// Authenticated caller of the current request
#[derive(Debug, Clone)]
pub struct CurrentActor(pub Actor);

impl std::ops::Deref for CurrentActor {
    type Target = Actor;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<ServerState> for CurrentActor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Check if already extracted
        if let Some(actor) = parts.extensions.get::<CurrentActor>() {
            return Ok(actor.clone());
        }

        let id = parts
            .headers
            .get(ACTOR_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty());
        let Some(id) = id else {
            security_log!("WARN", "actor_missing", uri = format!("{:?}", parts.uri));
            return Err(AppError::not_authenticated());
        };

        let role = match parts.headers.get(ACTOR_ROLE_HEADER) {
            None => ActorRole::default(),
            Some(value) => value
                .to_str()
                .ok()
                .and_then(|s| s.parse::<ActorRole>().ok())
                .ok_or_else(|| AppError::invalid_request("Invalid X-Actor-Role header"))?,
        };

        let actor = CurrentActor(Actor {
            id: id.to_string(),
            role,
        });
        parts.extensions.insert(actor.clone());
        Ok(actor)
    }
}
