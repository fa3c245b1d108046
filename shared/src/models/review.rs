//! Review Model

use crate::types::Timestamp;
use serde::{Deserialize, Serialize};

/// Lowest accepted rating
pub const MIN_RATING: i32 = 1;
/// Highest accepted rating
pub const MAX_RATING: i32 = 5;

/// Restaurant review
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Review {
    pub id: String,
    pub restaurant_id: i64,
    pub customer_id: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: Timestamp,
}

/// Create review payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewCreate {
    pub restaurant_id: i64,
    pub rating: i32,
    pub comment: Option<String>,
}
