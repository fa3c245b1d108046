//! Reservation lifecycle
//!
//! - [`ReservationManager`] - 预订状态机 + 桌台时段分配
//! - [`ReservationError`] - 预订错误

mod error;
mod manager;

#[cfg(test)]
mod tests;

pub use error::{ReservationError, ReservationResult};
pub use manager::{ConfirmationPolicy, ReservationManager};
