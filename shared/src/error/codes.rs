//! Unified error codes for the Dine framework
//!
//! This module defines all error codes used across dine-server and its clients.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Restaurant errors
//! - 4xxx: Order errors
//! - 5xxx: Reservation errors
//! - 6xxx: Menu errors
//! - 7xxx: Table / time slot errors
//! - 8xxx: Review errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 1xxx: Auth ====================
    /// Caller did not supply an actor identity
    NotAuthenticated = 1001,

    // ==================== 2xxx: Permission ====================
    /// Permission denied (actor does not own the resource)
    PermissionDenied = 2001,
    /// Staff role required
    StaffRequired = 2002,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 3xxx: Restaurant ====================
    /// Restaurant not found
    RestaurantNotFound = 3001,
    /// Restaurant is not approved
    RestaurantNotApproved = 3002,
    /// Approval state change not allowed from the current status
    RestaurantInvalidTransition = 3003,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order is no longer pending, items are locked
    OrderLocked = 4002,
    /// Order cannot be cancelled from its current status
    OrderNotCancellable = 4003,
    /// Requested order status transition is not allowed
    InvalidTransition = 4004,
    /// Order item not found
    OrderItemNotFound = 4006,
    /// Quantity is out of range
    InvalidQuantity = 4008,
    /// Line or order amount exceeds the representable range
    OrderAmountOverflow = 4009,

    // ==================== 5xxx: Reservation ====================
    /// Reservation not found
    ReservationNotFound = 5001,
    /// Table / time slot / date is already held by another reservation
    SlotUnavailable = 5002,
    /// Reservation cannot be cancelled from its current status
    ReservationNotCancellable = 5003,
    /// Requested reservation status transition is not allowed
    ReservationInvalidTransition = 5004,
    /// Reservation date is in the past
    ReservationDateInPast = 5005,

    // ==================== 6xxx: Menu ====================
    /// Menu item not found (or not orderable)
    MenuItemNotFound = 6001,
    /// Menu item price is invalid
    MenuItemInvalidPrice = 6002,

    // ==================== 7xxx: Table ====================
    /// Table not found
    TableNotFound = 7001,
    /// Table is not active
    TableInactive = 7002,
    /// Time slot not found
    TimeSlotNotFound = 7101,
    /// Time slot is malformed (start >= end)
    TimeSlotInvalid = 7102,

    // ==================== 8xxx: Review ====================
    /// Rating must be between 1 and 5
    InvalidRating = 8001,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::InvalidRequest => "Invalid request",

            // Auth
            ErrorCode::NotAuthenticated => "Actor is not authenticated",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::StaffRequired => "Restaurant staff role is required",
            ErrorCode::AdminRequired => "Administrator role is required",

            // Restaurant
            ErrorCode::RestaurantNotFound => "Restaurant not found",
            ErrorCode::RestaurantNotApproved => "Restaurant is not approved",
            ErrorCode::RestaurantInvalidTransition => "Invalid restaurant status transition",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderLocked => "Order can no longer be modified",
            ErrorCode::OrderNotCancellable => "Order cannot be cancelled",
            ErrorCode::InvalidTransition => "Invalid order status transition",
            ErrorCode::OrderItemNotFound => "Order item not found",
            ErrorCode::InvalidQuantity => "Invalid quantity",
            ErrorCode::OrderAmountOverflow => "Order amount is out of range",

            // Reservation
            ErrorCode::ReservationNotFound => "Reservation not found",
            ErrorCode::SlotUnavailable => "Table is already booked for this time slot",
            ErrorCode::ReservationNotCancellable => "Reservation cannot be cancelled",
            ErrorCode::ReservationInvalidTransition => "Invalid reservation status transition",
            ErrorCode::ReservationDateInPast => "Reservation date is in the past",

            // Menu
            ErrorCode::MenuItemNotFound => "Menu item not found",
            ErrorCode::MenuItemInvalidPrice => "Menu item has invalid price",

            // Table
            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::TableInactive => "Table is not active",
            ErrorCode::TimeSlotNotFound => "Time slot not found",
            ErrorCode::TimeSlotInvalid => "Time slot is invalid",

            // Review
            ErrorCode::InvalidRating => "Rating must be between 1 and 5",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            5 => Ok(ErrorCode::InvalidRequest),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::StaffRequired),
            2003 => Ok(ErrorCode::AdminRequired),

            // Restaurant
            3001 => Ok(ErrorCode::RestaurantNotFound),
            3002 => Ok(ErrorCode::RestaurantNotApproved),
            3003 => Ok(ErrorCode::RestaurantInvalidTransition),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderLocked),
            4003 => Ok(ErrorCode::OrderNotCancellable),
            4004 => Ok(ErrorCode::InvalidTransition),
            4006 => Ok(ErrorCode::OrderItemNotFound),
            4008 => Ok(ErrorCode::InvalidQuantity),
            4009 => Ok(ErrorCode::OrderAmountOverflow),

            // Reservation
            5001 => Ok(ErrorCode::ReservationNotFound),
            5002 => Ok(ErrorCode::SlotUnavailable),
            5003 => Ok(ErrorCode::ReservationNotCancellable),
            5004 => Ok(ErrorCode::ReservationInvalidTransition),
            5005 => Ok(ErrorCode::ReservationDateInPast),

            // Menu
            6001 => Ok(ErrorCode::MenuItemNotFound),
            6002 => Ok(ErrorCode::MenuItemInvalidPrice),

            // Table
            7001 => Ok(ErrorCode::TableNotFound),
            7002 => Ok(ErrorCode::TableInactive),
            7101 => Ok(ErrorCode::TimeSlotNotFound),
            7102 => Ok(ErrorCode::TimeSlotInvalid),

            // Review
            8001 => Ok(ErrorCode::InvalidRating),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::PermissionDenied.code(), 2001);
        assert_eq!(ErrorCode::RestaurantNotApproved.code(), 3002);
        assert_eq!(ErrorCode::OrderLocked.code(), 4002);
        assert_eq!(ErrorCode::InvalidTransition.code(), 4004);
        assert_eq!(ErrorCode::SlotUnavailable.code(), 5002);
        assert_eq!(ErrorCode::MenuItemNotFound.code(), 6001);
        assert_eq!(ErrorCode::TimeSlotNotFound.code(), 7101);
        assert_eq!(ErrorCode::InvalidRating.code(), 8001);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
        assert_eq!(ErrorCode::ConfigError.code(), 9005);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::SlotUnavailable.is_success());
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(4002), Ok(ErrorCode::OrderLocked));
        assert_eq!(ErrorCode::try_from(5002), Ok(ErrorCode::SlotUnavailable));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(4005), Err(InvalidErrorCode(4005)));
        assert_eq!(ErrorCode::try_from(65535), Err(InvalidErrorCode(65535)));
        // retired general / system codes are not accepted
        for retired in [1, 2, 3, 4, 9002, 9004] {
            assert_eq!(ErrorCode::try_from(retired), Err(InvalidErrorCode(retired)));
        }
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::SlotUnavailable).unwrap();
        assert_eq!(json, "5002");
        let code: ErrorCode = serde_json::from_str("4002").unwrap();
        assert_eq!(code, ErrorCode::OrderLocked);
    }
}
