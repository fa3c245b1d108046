//! Shared types for Dine framework
//!
//! Error taxonomy, domain models and the change-event envelope,
//! used by dine-server and its API clients.

pub mod error;
pub mod message;
pub mod models;
pub mod types;

// Message re-exports (for convenient access)
pub use message::{ChangeEvent, ChangeEventType};
pub use types::{Actor, ActorRole, Timestamp};
