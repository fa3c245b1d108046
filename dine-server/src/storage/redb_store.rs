//! redb-based storage
//!
//! # Tables
//!
//! | Table | Key | Value |
//! |-------|-----|-------|
//! | `reservations` | `reservation_id` | JSON `Reservation` |
//! | `orders` | `order_id` | JSON `Order` (items embedded, written together) |
//! | `reviews` | `review_id` | JSON `Review` |
//!
//! # Durability
//!
//! redb commits with `Durability::Immediate` by default: a save is durable
//! once `commit()` returns, and the file stays consistent across power loss.

use super::{BookingStore, StorageResult};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::models::{Order, Reservation, Review};
use std::path::Path;
use std::sync::Arc;

/// key = record id, value = JSON bytes
type JsonTable = TableDefinition<'static, &'static str, &'static [u8]>;

const RESERVATIONS_TABLE: JsonTable = TableDefinition::new("reservations");
const ORDERS_TABLE: JsonTable = TableDefinition::new("orders");
const REVIEWS_TABLE: JsonTable = TableDefinition::new("reviews");

/// Booking storage backed by redb
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        // Create all tables if they don't exist
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(RESERVATIONS_TABLE)?;
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(REVIEWS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    fn put<T: Serialize>(
        &self,
        table_def: JsonTable,
        key: &str,
        value: &T,
    ) -> StorageResult<()> {
        let bytes = serde_json::to_vec(value)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(table_def)?;
            table.insert(key, bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn get<T: DeserializeOwned>(
        &self,
        table_def: JsonTable,
        key: &str,
    ) -> StorageResult<Option<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(table_def)?;

        match table.get(key)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    fn scan<T: DeserializeOwned>(
        &self,
        table_def: JsonTable,
    ) -> StorageResult<Vec<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(table_def)?;

        let mut items = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            items.push(serde_json::from_slice(value.value())?);
        }
        Ok(items)
    }
}

impl BookingStore for RedbStore {
    fn save_reservation(&self, reservation: &Reservation) -> StorageResult<()> {
        self.put(RESERVATIONS_TABLE, &reservation.id, reservation)
    }

    fn get_reservation(&self, id: &str) -> StorageResult<Option<Reservation>> {
        self.get(RESERVATIONS_TABLE, id)
    }

    fn list_reservations(&self) -> StorageResult<Vec<Reservation>> {
        self.scan(RESERVATIONS_TABLE)
    }

    fn save_order(&self, order: &Order) -> StorageResult<()> {
        self.put(ORDERS_TABLE, &order.id, order)
    }

    fn get_order(&self, id: &str) -> StorageResult<Option<Order>> {
        self.get(ORDERS_TABLE, id)
    }

    fn list_orders(&self) -> StorageResult<Vec<Order>> {
        self.scan(ORDERS_TABLE)
    }

    fn save_review(&self, review: &Review) -> StorageResult<()> {
        self.put(REVIEWS_TABLE, &review.id, review)
    }

    fn list_reviews(&self, restaurant_id: i64) -> StorageResult<Vec<Review>> {
        Ok(self
            .scan::<Review>(REVIEWS_TABLE)?
            .into_iter()
            .filter(|r| r.restaurant_id == restaurant_id)
            .collect())
    }
}
