//! Restaurant Model

use serde::{Deserialize, Serialize};

/// Restaurant approval status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RestaurantStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl RestaurantStatus {
    /// Approval is decided once: Pending → Approved | Rejected
    pub const fn allowed_next(self) -> &'static [RestaurantStatus] {
        use RestaurantStatus::*;
        match self {
            Pending => &[Approved, Rejected],
            Approved | Rejected => &[],
        }
    }

    pub fn can_transition_to(self, next: RestaurantStatus) -> bool {
        self.allowed_next().contains(&next)
    }
}

impl std::fmt::Display for RestaurantStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        };
        f.write_str(s)
    }
}

/// Restaurant entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub status: RestaurantStatus,
    /// Owner reference (opaque actor id)
    pub owner_id: String,
}

impl Restaurant {
    /// Only approved restaurants accept orders and reservations
    pub fn is_open_for_business(&self) -> bool {
        self.status == RestaurantStatus::Approved
    }
}
