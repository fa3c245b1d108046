//! Reservation errors

use crate::calendar::SlotKey;
use crate::storage::StorageError;
use chrono::NaiveDate;
use shared::error::{AppError, ErrorCode};
use shared::models::ReservationStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReservationError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Reservation not found: {0}")]
    NotFound(String),

    #[error("Restaurant not found: {0}")]
    RestaurantNotFound(i64),

    #[error("Restaurant {0} is not approved")]
    RestaurantNotApproved(i64),

    #[error("Table {table_id} not found in restaurant {restaurant_id}")]
    TableNotFound { restaurant_id: i64, table_id: i64 },

    #[error("Table {0} is not active")]
    TableInactive(i64),

    #[error("Time slot {time_slot_id} not found in restaurant {restaurant_id}")]
    TimeSlotNotFound {
        restaurant_id: i64,
        time_slot_id: i64,
    },

    #[error("Time slot {0} is malformed")]
    TimeSlotInvalid(i64),

    #[error("Reservation date {0} is in the past")]
    DateInPast(NaiveDate),

    #[error("Slot {0} is already reserved")]
    SlotUnavailable(SlotKey),

    #[error("Reservation {id} cannot be cancelled from {status}")]
    NotCancellable {
        id: String,
        status: ReservationStatus,
    },

    #[error("Reservation {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: ReservationStatus,
        to: ReservationStatus,
    },

    #[error("Actor {actor_id} may not modify reservation {id}")]
    Forbidden { id: String, actor_id: String },
}

pub type ReservationResult<T> = Result<T, ReservationError>;

impl From<ReservationError> for AppError {
    fn from(err: ReservationError) -> Self {
        match err {
            ReservationError::Storage(e) => {
                tracing::error!(error = %e, "Reservation storage error");
                AppError::internal()
            }
            ReservationError::NotFound(id) => {
                AppError::new(ErrorCode::ReservationNotFound).with_detail("reservation_id", id)
            }
            ReservationError::RestaurantNotFound(id) => {
                AppError::new(ErrorCode::RestaurantNotFound).with_detail("restaurant_id", id)
            }
            ReservationError::RestaurantNotApproved(id) => {
                AppError::new(ErrorCode::RestaurantNotApproved).with_detail("restaurant_id", id)
            }
            ReservationError::TableNotFound { table_id, .. } => {
                AppError::new(ErrorCode::TableNotFound).with_detail("table_id", table_id)
            }
            ReservationError::TableInactive(id) => {
                AppError::new(ErrorCode::TableInactive).with_detail("table_id", id)
            }
            ReservationError::TimeSlotNotFound { time_slot_id, .. } => {
                AppError::new(ErrorCode::TimeSlotNotFound).with_detail("time_slot_id", time_slot_id)
            }
            ReservationError::TimeSlotInvalid(id) => {
                AppError::new(ErrorCode::TimeSlotInvalid).with_detail("time_slot_id", id)
            }
            ReservationError::DateInPast(date) => AppError::new(ErrorCode::ReservationDateInPast)
                .with_detail("date", date.to_string()),
            // holder id belongs to another customer, never echoed
            ReservationError::SlotUnavailable(slot) => AppError::new(ErrorCode::SlotUnavailable)
                .with_detail("table_id", slot.table_id)
                .with_detail("time_slot_id", slot.time_slot_id)
                .with_detail("date", slot.date.to_string()),
            ReservationError::NotCancellable { id, status } => {
                AppError::new(ErrorCode::ReservationNotCancellable)
                    .with_detail("reservation_id", id)
                    .with_detail("status", status.to_string())
            }
            ReservationError::InvalidTransition { id, from, to } => {
                AppError::new(ErrorCode::ReservationInvalidTransition)
                    .with_detail("reservation_id", id)
                    .with_detail("from", from.to_string())
                    .with_detail("to", to.to_string())
            }
            ReservationError::Forbidden { id, .. } => {
                AppError::forbidden("Reservation belongs to another customer")
                    .with_detail("reservation_id", id)
            }
        }
    }
}
