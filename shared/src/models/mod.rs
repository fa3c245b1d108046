//! Data models
//!
//! Shared between dine-server and its clients (via API).
//! Catalog IDs are `i64`; reservation / order / review IDs are UUID strings.
//! Customer and actor references are opaque strings supplied by the identity layer.

pub mod dining_table;
pub mod menu_item;
pub mod order;
pub mod reservation;
pub mod restaurant;
pub mod review;
pub mod time_slot;

// Re-exports
pub use dining_table::*;
pub use menu_item::*;
pub use order::*;
pub use reservation::*;
pub use restaurant::*;
pub use review::*;
pub use time_slot::*;
