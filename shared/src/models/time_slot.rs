//! Time Slot Model

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Bookable time-of-day window of a restaurant (时段)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeSlot {
    pub id: i64,
    pub restaurant_id: i64,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl TimeSlot {
    /// start < end
    pub fn is_well_formed(&self) -> bool {
        self.start_time < self.end_time
    }
}
