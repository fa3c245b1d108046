//! Reservation Model

use crate::types::Timestamp;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reservation status
///
/// ```text
/// Pending ──confirm──▶ Confirmed ──complete──▶ Completed
///    │                    │
///    └──────cancel────────┴──────▶ Cancelled
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl ReservationStatus {
    /// Transition table: every status reachable in one step
    pub const fn allowed_next(self) -> &'static [ReservationStatus] {
        use ReservationStatus::*;
        match self {
            Pending => &[Confirmed, Cancelled],
            Confirmed => &[Completed, Cancelled],
            Cancelled | Completed => &[],
        }
    }

    pub fn can_transition_to(self, next: ReservationStatus) -> bool {
        self.allowed_next().contains(&next)
    }

    /// Pending / Confirmed reservations hold their calendar slot
    pub const fn holds_slot(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    pub const fn is_terminal(self) -> bool {
        self.allowed_next().is_empty()
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
            Self::Completed => "COMPLETED",
        };
        f.write_str(s)
    }
}

/// Reservation entity (预订)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reservation {
    pub id: String,
    pub restaurant_id: i64,
    pub table_id: i64,
    pub time_slot_id: i64,
    pub date: NaiveDate,
    pub customer_id: String,
    pub status: ReservationStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Create reservation payload (customer comes from the actor)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCreate {
    pub restaurant_id: i64,
    pub table_id: i64,
    pub time_slot_id: i64,
    pub date: NaiveDate,
}
