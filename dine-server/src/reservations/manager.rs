//! ReservationManager - 预订状态机
//!
//! # Create Flow
//!
//! ```text
//! create(actor, req)
//!     ├─ 1. Validate restaurant / table / time slot / date
//!     ├─ 2. calendar.try_allocate(slot, id)   ── Conflict → SlotUnavailable
//!     ├─ 3. store.save_reservation            ── Err → calendar.release → Err
//!     └─ 4. Publish ReservationCreated
//! ```
//!
//! # Transition Flow
//!
//! ```text
//! lock(reservation_id)
//!     ├─ load → ownership check → transition table check
//!     ├─ save
//!     └─ release slot (Cancelled / Completed)
//! unlock → publish
//! ```

use super::error::{ReservationError, ReservationResult};
use crate::calendar::{Allocation, ResourceCalendar, SlotKey};
use crate::catalog::Catalog;
use crate::notify::ChangeNotifier;
use crate::storage::BookingStore;
use crate::utils::KeyedLocks;
use chrono::{NaiveDate, Utc};
use shared::message::{ChangeEvent, ChangeEventType};
use shared::models::{DiningTable, Reservation, ReservationCreate, ReservationStatus};
use shared::types::{Actor, now_millis};
use std::sync::Arc;

/// Initial status of a newly created reservation
///
/// Both variants hold the slot from the moment of creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmationPolicy {
    /// Created `Pending`; staff confirm explicitly
    #[default]
    RequireStaff,
    /// Created directly `Confirmed`
    AutoConfirm,
}

impl ConfirmationPolicy {
    fn initial_status(self) -> ReservationStatus {
        match self {
            Self::RequireStaff => ReservationStatus::Pending,
            Self::AutoConfirm => ReservationStatus::Confirmed,
        }
    }
}

pub struct ReservationManager {
    calendar: Arc<ResourceCalendar>,
    catalog: Arc<dyn Catalog>,
    store: Arc<dyn BookingStore>,
    notifier: ChangeNotifier,
    policy: ConfirmationPolicy,
    locks: KeyedLocks<String>,
}

impl std::fmt::Debug for ReservationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservationManager")
            .field("occupied_slots", &self.calendar.len())
            .field("policy", &self.policy)
            .finish()
    }
}

fn slot_of(reservation: &Reservation) -> SlotKey {
    SlotKey::new(
        reservation.restaurant_id,
        reservation.table_id,
        reservation.time_slot_id,
        reservation.date,
    )
}

fn event_type_for(status: ReservationStatus) -> ChangeEventType {
    match status {
        ReservationStatus::Pending => ChangeEventType::ReservationCreated,
        ReservationStatus::Confirmed => ChangeEventType::ReservationConfirmed,
        ReservationStatus::Cancelled => ChangeEventType::ReservationCancelled,
        ReservationStatus::Completed => ChangeEventType::ReservationCompleted,
    }
}

impl ReservationManager {
    pub fn new(
        calendar: Arc<ResourceCalendar>,
        catalog: Arc<dyn Catalog>,
        store: Arc<dyn BookingStore>,
        notifier: ChangeNotifier,
        policy: ConfirmationPolicy,
    ) -> Self {
        Self {
            calendar,
            catalog,
            store,
            notifier,
            policy,
            locks: KeyedLocks::new(),
        }
    }

    pub fn calendar(&self) -> &Arc<ResourceCalendar> {
        &self.calendar
    }

    /// Rebuild calendar occupancy from persisted Pending / Confirmed reservations
    pub fn recover(&self) -> ReservationResult<usize> {
        let active = self.store.active_reservations()?;
        let mut restored = 0;
        for reservation in &active {
            match self.calendar.try_allocate(slot_of(reservation), &reservation.id) {
                Allocation::Allocated => restored += 1,
                Allocation::Conflict { holder } => {
                    tracing::error!(
                        reservation_id = %reservation.id,
                        holder = %holder,
                        slot = %slot_of(reservation),
                        "Persisted reservations overlap on one slot"
                    );
                }
            }
        }
        tracing::info!(restored, "Calendar recovered from storage");
        Ok(restored)
    }

    // ========== Commands ==========

    /// Book a table for a time slot on a date
    pub fn create(&self, actor: &Actor, req: ReservationCreate) -> ReservationResult<Reservation> {
        self.validate(&req)?;

        let id = uuid::Uuid::new_v4().to_string();
        let slot = SlotKey::new(req.restaurant_id, req.table_id, req.time_slot_id, req.date);

        if let Allocation::Conflict { holder } = self.calendar.try_allocate(slot, &id) {
            tracing::info!(slot = %slot, holder = %holder, "Reservation rejected, slot taken");
            return Err(ReservationError::SlotUnavailable(slot));
        }

        let now = now_millis();
        let reservation = Reservation {
            id: id.clone(),
            restaurant_id: req.restaurant_id,
            table_id: req.table_id,
            time_slot_id: req.time_slot_id,
            date: req.date,
            customer_id: actor.id.clone(),
            status: self.policy.initial_status(),
            created_at: now,
            updated_at: now,
        };

        // allocation and persistence are one unit
        if let Err(e) = self.store.save_reservation(&reservation) {
            self.calendar.release(&slot, &id);
            tracing::error!(reservation_id = %id, slot = %slot, error = %e, "Failed to persist reservation, slot released");
            return Err(e.into());
        }

        tracing::info!(
            reservation_id = %id,
            customer_id = %reservation.customer_id,
            slot = %slot,
            status = %reservation.status,
            "Reservation created"
        );
        self.notifier.publish(ChangeEvent::new(
            ChangeEventType::ReservationCreated,
            reservation.restaurant_id,
            &reservation.id,
            &reservation,
        ));
        Ok(reservation)
    }

    /// Pending → Confirmed (already Confirmed is a no-op)
    pub fn confirm(&self, id: &str) -> ReservationResult<Reservation> {
        self.transition(id, None, ReservationStatus::Confirmed)
    }

    /// Pending | Confirmed → Cancelled, releases the slot
    ///
    /// With an actor supplied, only the owner (or staff) may cancel.
    pub fn cancel(&self, id: &str, actor: Option<&Actor>) -> ReservationResult<Reservation> {
        self.transition(id, actor, ReservationStatus::Cancelled)
    }

    /// Confirmed → Completed, releases the slot
    pub fn complete(&self, id: &str) -> ReservationResult<Reservation> {
        self.transition(id, None, ReservationStatus::Completed)
    }

    fn transition(
        &self,
        id: &str,
        actor: Option<&Actor>,
        next: ReservationStatus,
    ) -> ReservationResult<Reservation> {
        let key = id.to_string();
        let (reservation, changed) = self.locks.with_lock(&key, || -> ReservationResult<_> {
            let mut reservation = self
                .store
                .get_reservation(id)?
                .ok_or_else(|| ReservationError::NotFound(id.to_string()))?;

            if let Some(actor) = actor
                && !actor.may_act_for(&reservation.customer_id)
            {
                crate::security_log!(
                    "WARN",
                    "reservation_forbidden",
                    actor_id = actor.id.as_str(),
                    reservation_id = id
                );
                return Err(ReservationError::Forbidden {
                    id: id.to_string(),
                    actor_id: actor.id.clone(),
                });
            }

            if reservation.status == next && next == ReservationStatus::Confirmed {
                return Ok((reservation, false));
            }

            if !reservation.status.can_transition_to(next) {
                return Err(if next == ReservationStatus::Cancelled {
                    ReservationError::NotCancellable {
                        id: id.to_string(),
                        status: reservation.status,
                    }
                } else {
                    ReservationError::InvalidTransition {
                        id: id.to_string(),
                        from: reservation.status,
                        to: next,
                    }
                });
            }

            let from = reservation.status;
            reservation.status = next;
            reservation.updated_at = now_millis();
            self.store.save_reservation(&reservation)?;

            if !next.holds_slot() {
                self.calendar.release(&slot_of(&reservation), &reservation.id);
            }

            tracing::info!(reservation_id = %id, from = %from, to = %next, "Reservation transitioned");
            Ok((reservation, true))
        })?;

        if changed {
            self.notifier.publish(ChangeEvent::new(
                event_type_for(next),
                reservation.restaurant_id,
                &reservation.id,
                &reservation,
            ));
        }
        Ok(reservation)
    }

    // ========== Queries ==========

    pub fn get(&self, id: &str) -> ReservationResult<Reservation> {
        self.store
            .get_reservation(id)?
            .ok_or_else(|| ReservationError::NotFound(id.to_string()))
    }

    /// Newest first
    pub fn list_for_customer(&self, customer_id: &str) -> ReservationResult<Vec<Reservation>> {
        self.list_where(|r| r.customer_id == customer_id)
    }

    /// Newest first
    pub fn list_for_restaurant(&self, restaurant_id: i64) -> ReservationResult<Vec<Reservation>> {
        self.list_where(|r| r.restaurant_id == restaurant_id)
    }

    fn list_where(
        &self,
        predicate: impl Fn(&Reservation) -> bool,
    ) -> ReservationResult<Vec<Reservation>> {
        let mut reservations: Vec<Reservation> = self
            .store
            .list_reservations()?
            .into_iter()
            .filter(|r| predicate(r))
            .collect();
        reservations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reservations)
    }

    /// Active tables not occupied for (time slot, date)
    ///
    /// Best-effort snapshot; only `create` reserves.
    pub fn available_tables(
        &self,
        restaurant_id: i64,
        time_slot_id: i64,
        date: NaiveDate,
    ) -> ReservationResult<Vec<DiningTable>> {
        self.catalog
            .restaurant(restaurant_id)
            .ok_or(ReservationError::RestaurantNotFound(restaurant_id))?;
        self.catalog
            .time_slot(time_slot_id)
            .filter(|s| s.restaurant_id == restaurant_id)
            .ok_or(ReservationError::TimeSlotNotFound {
                restaurant_id,
                time_slot_id,
            })?;

        let occupied = self
            .calendar
            .occupied_tables(restaurant_id, time_slot_id, date);
        Ok(self
            .catalog
            .tables_for_restaurant(restaurant_id)
            .into_iter()
            .filter(|t| t.is_active && !occupied.contains(&t.id))
            .collect())
    }

    // ========== Validation ==========

    fn validate(&self, req: &ReservationCreate) -> ReservationResult<()> {
        let restaurant = self
            .catalog
            .restaurant(req.restaurant_id)
            .ok_or(ReservationError::RestaurantNotFound(req.restaurant_id))?;
        if !restaurant.is_open_for_business() {
            return Err(ReservationError::RestaurantNotApproved(req.restaurant_id));
        }

        let table = self
            .catalog
            .table(req.table_id)
            .filter(|t| t.restaurant_id == req.restaurant_id)
            .ok_or(ReservationError::TableNotFound {
                restaurant_id: req.restaurant_id,
                table_id: req.table_id,
            })?;
        if !table.is_active {
            return Err(ReservationError::TableInactive(table.id));
        }

        let slot = self
            .catalog
            .time_slot(req.time_slot_id)
            .filter(|s| s.restaurant_id == req.restaurant_id)
            .ok_or(ReservationError::TimeSlotNotFound {
                restaurant_id: req.restaurant_id,
                time_slot_id: req.time_slot_id,
            })?;
        if !slot.is_well_formed() {
            return Err(ReservationError::TimeSlotInvalid(slot.id));
        }

        if req.date < Utc::now().date_naive() {
            return Err(ReservationError::DateInPast(req.date));
        }
        Ok(())
    }
}
