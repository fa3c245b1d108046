//! In-memory store (DashMap)

use super::{BookingStore, StorageResult};
use dashmap::DashMap;
use shared::models::{Order, Reservation, Review};

#[derive(Debug, Default)]
pub struct MemoryStore {
    reservations: DashMap<String, Reservation>,
    orders: DashMap<String, Order>,
    reviews: DashMap<String, Review>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BookingStore for MemoryStore {
    fn save_reservation(&self, reservation: &Reservation) -> StorageResult<()> {
        self.reservations
            .insert(reservation.id.clone(), reservation.clone());
        Ok(())
    }

    fn get_reservation(&self, id: &str) -> StorageResult<Option<Reservation>> {
        Ok(self.reservations.get(id).map(|r| r.value().clone()))
    }

    fn list_reservations(&self) -> StorageResult<Vec<Reservation>> {
        Ok(self.reservations.iter().map(|r| r.value().clone()).collect())
    }

    fn save_order(&self, order: &Order) -> StorageResult<()> {
        self.orders.insert(order.id.clone(), order.clone());
        Ok(())
    }

    fn get_order(&self, id: &str) -> StorageResult<Option<Order>> {
        Ok(self.orders.get(id).map(|o| o.value().clone()))
    }

    fn list_orders(&self) -> StorageResult<Vec<Order>> {
        Ok(self.orders.iter().map(|o| o.value().clone()).collect())
    }

    fn save_review(&self, review: &Review) -> StorageResult<()> {
        self.reviews.insert(review.id.clone(), review.clone());
        Ok(())
    }

    fn list_reviews(&self, restaurant_id: i64) -> StorageResult<Vec<Review>> {
        Ok(self
            .reviews
            .iter()
            .filter(|r| r.restaurant_id == restaurant_id)
            .map(|r| r.value().clone())
            .collect())
    }
}
