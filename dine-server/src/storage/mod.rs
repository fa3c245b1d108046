//! Persistence layer
//!
//! [`BookingStore`] 是核心组件依赖的持久化接口；实现方负责单条记录的原子写入。
//! 按 key 的读-改-写隔离由上层 (`KeyedLocks` / `ResourceCalendar`) 保证。
//!
//! | 实现 | 用途 |
//! |------|------|
//! | [`MemoryStore`] | 测试、`STORAGE_BACKEND=memory` |
//! | [`RedbStore`] | 默认，嵌入式 redb 持久化 |

mod memory;
mod redb_store;

pub use memory::MemoryStore;
pub use redb_store::RedbStore;

use shared::models::{Order, Reservation, Review};
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Durable store for reservations, orders (with their items) and reviews
///
/// Every `save_*` replaces the whole record in one write.
pub trait BookingStore: Send + Sync {
    fn save_reservation(&self, reservation: &Reservation) -> StorageResult<()>;
    fn get_reservation(&self, id: &str) -> StorageResult<Option<Reservation>>;
    fn list_reservations(&self) -> StorageResult<Vec<Reservation>>;

    fn save_order(&self, order: &Order) -> StorageResult<()>;
    fn get_order(&self, id: &str) -> StorageResult<Option<Order>>;
    fn list_orders(&self) -> StorageResult<Vec<Order>>;

    fn save_review(&self, review: &Review) -> StorageResult<()>;
    fn list_reviews(&self, restaurant_id: i64) -> StorageResult<Vec<Review>>;

    /// Reservations currently holding a calendar slot (Pending / Confirmed)
    fn active_reservations(&self) -> StorageResult<Vec<Reservation>> {
        Ok(self
            .list_reservations()?
            .into_iter()
            .filter(|r| r.status.holds_slot())
            .collect())
    }
}
