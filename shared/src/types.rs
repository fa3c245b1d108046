//! Common types for the shared crate
//!
//! Utility types used across the framework

use serde::{Deserialize, Serialize};

/// Timestamp type (Unix milliseconds)
pub type Timestamp = i64;

/// Current time as Unix milliseconds
pub fn now_millis() -> Timestamp {
    chrono::Utc::now().timestamp_millis()
}

/// Role of the calling actor, as asserted by the identity layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
    #[default]
    Customer,
    Staff,
    Admin,
}

impl std::str::FromStr for ActorRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "customer" => Ok(Self::Customer),
            "staff" => Ok(Self::Staff),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown actor role: {other}")),
        }
    }
}

/// Authenticated caller (opaque id + role)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub role: ActorRole,
}

impl Actor {
    pub fn customer(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: ActorRole::Customer,
        }
    }

    pub fn staff(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: ActorRole::Staff,
        }
    }

    pub fn admin(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: ActorRole::Admin,
        }
    }

    /// Staff and admins act on behalf of the restaurant
    pub fn is_staff(&self) -> bool {
        matches!(self.role, ActorRole::Staff | ActorRole::Admin)
    }

    pub fn is_admin(&self) -> bool {
        self.role == ActorRole::Admin
    }

    /// Owner or staff may mutate a customer-owned resource
    pub fn may_act_for(&self, owner_id: &str) -> bool {
        self.is_staff() || self.id == owner_id
    }
}
