use super::*;
use crate::calendar::{ResourceCalendar, SlotKey};
use crate::catalog::InMemoryCatalog;
use crate::notify::ChangeNotifier;
use crate::storage::{BookingStore, MemoryStore, StorageError, StorageResult};
use chrono::{Days, NaiveDate, NaiveTime, Utc};
use shared::message::{ChangeEvent, ChangeEventType};
use shared::models::{
    DiningTable, Order, Reservation, ReservationCreate, ReservationStatus, Restaurant,
    RestaurantStatus, Review, TimeSlot,
};
use shared::types::Actor;
use std::sync::{Arc, Barrier};
use std::thread;
use tokio::sync::mpsc;

// ========================================================================
// Fixtures
// ========================================================================

const R1: i64 = 1;
const R_PENDING: i64 = 2;
const T1: i64 = 11;
const T2: i64 = 12;
const T_INACTIVE: i64 = 13;
const T_OTHER: i64 = 21;
const SLOT: i64 = 100;
const SLOT_OTHER: i64 = 200;

fn booking_date() -> NaiveDate {
    Utc::now().date_naive() + Days::new(7)
}

fn test_catalog() -> Arc<InMemoryCatalog> {
    let catalog = InMemoryCatalog::new();
    catalog.upsert_restaurant(Restaurant {
        id: R1,
        name: "Harbor Grill".to_string(),
        status: RestaurantStatus::Approved,
        owner_id: "owner-1".to_string(),
    });
    catalog.upsert_restaurant(Restaurant {
        id: R_PENDING,
        name: "Noodle Bar".to_string(),
        status: RestaurantStatus::Pending,
        owner_id: "owner-2".to_string(),
    });
    for (id, restaurant_id, is_active) in [
        (T1, R1, true),
        (T2, R1, true),
        (T_INACTIVE, R1, false),
        (T_OTHER, R_PENDING, true),
    ] {
        catalog.upsert_table(DiningTable {
            id,
            restaurant_id,
            name: format!("T{id}"),
            capacity: 4,
            is_active,
        });
    }
    for (id, restaurant_id) in [(SLOT, R1), (SLOT_OTHER, R_PENDING)] {
        catalog
            .upsert_time_slot(TimeSlot {
                id,
                restaurant_id,
                start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
            })
            .unwrap();
    }
    Arc::new(catalog)
}

struct Harness {
    manager: ReservationManager,
    store: Arc<dyn BookingStore>,
    events: mpsc::Receiver<ChangeEvent>,
}

fn create_test_manager_with(
    store: Arc<dyn BookingStore>,
    policy: ConfirmationPolicy,
) -> Harness {
    let (notifier, events) = ChangeNotifier::new(64);
    let manager = ReservationManager::new(
        Arc::new(ResourceCalendar::new()),
        test_catalog(),
        store.clone(),
        notifier,
        policy,
    );
    Harness {
        manager,
        store,
        events,
    }
}

fn create_test_manager() -> Harness {
    create_test_manager_with(Arc::new(MemoryStore::new()), ConfirmationPolicy::RequireStaff)
}

fn request(table_id: i64) -> ReservationCreate {
    ReservationCreate {
        restaurant_id: R1,
        table_id,
        time_slot_id: SLOT,
        date: booking_date(),
    }
}

fn slot(table_id: i64) -> SlotKey {
    SlotKey::new(R1, table_id, SLOT, booking_date())
}

fn drain(events: &mut mpsc::Receiver<ChangeEvent>) -> Vec<ChangeEventType> {
    let mut types = Vec::new();
    while let Ok(event) = events.try_recv() {
        types.push(event.event_type);
    }
    types
}

/// Store whose reservation writes always fail
struct FailingStore {
    inner: MemoryStore,
}

fn write_failure() -> StorageError {
    StorageError::Io(std::io::Error::other("disk unavailable"))
}

impl BookingStore for FailingStore {
    fn save_reservation(&self, _reservation: &Reservation) -> StorageResult<()> {
        Err(write_failure())
    }
    fn get_reservation(&self, id: &str) -> StorageResult<Option<Reservation>> {
        self.inner.get_reservation(id)
    }
    fn list_reservations(&self) -> StorageResult<Vec<Reservation>> {
        self.inner.list_reservations()
    }
    fn save_order(&self, order: &Order) -> StorageResult<()> {
        self.inner.save_order(order)
    }
    fn get_order(&self, id: &str) -> StorageResult<Option<Order>> {
        self.inner.get_order(id)
    }
    fn list_orders(&self) -> StorageResult<Vec<Order>> {
        self.inner.list_orders()
    }
    fn save_review(&self, review: &Review) -> StorageResult<()> {
        self.inner.save_review(review)
    }
    fn list_reviews(&self, restaurant_id: i64) -> StorageResult<Vec<Review>> {
        self.inner.list_reviews(restaurant_id)
    }
}

// ========================================================================
// Create
// ========================================================================

#[test]
fn test_create_holds_slot_as_pending() {
    let mut h = create_test_manager();
    let alice = Actor::customer("alice");

    let reservation = h.manager.create(&alice, request(T1)).unwrap();

    assert_eq!(reservation.status, ReservationStatus::Pending);
    assert_eq!(reservation.customer_id, "alice");
    assert_eq!(
        h.manager.calendar().holder(&slot(T1)),
        Some(reservation.id.clone())
    );
    assert!(h.store.get_reservation(&reservation.id).unwrap().is_some());
    assert_eq!(drain(&mut h.events), vec![ChangeEventType::ReservationCreated]);
}

#[test]
fn test_auto_confirm_policy() {
    let h = create_test_manager_with(Arc::new(MemoryStore::new()), ConfirmationPolicy::AutoConfirm);
    let reservation = h.manager.create(&Actor::customer("alice"), request(T1)).unwrap();
    assert_eq!(reservation.status, ReservationStatus::Confirmed);
    assert!(!h.manager.calendar().is_available(&slot(T1)));
}

#[test]
fn test_conflict_then_retry_after_cancel() {
    let h = create_test_manager();
    let alice = Actor::customer("alice");
    let bob = Actor::customer("bob");

    let a = h.manager.create(&alice, request(T1)).unwrap();

    let err = h.manager.create(&bob, request(T1)).unwrap_err();
    assert!(matches!(err, ReservationError::SlotUnavailable(key) if key == slot(T1)));

    h.manager.cancel(&a.id, Some(&alice)).unwrap();
    assert!(h.manager.calendar().is_available(&slot(T1)));

    let b = h.manager.create(&bob, request(T1)).unwrap();
    assert_eq!(h.manager.calendar().holder(&slot(T1)), Some(b.id));
}

#[test]
fn test_conflict_creates_nothing() {
    let h = create_test_manager();
    h.manager.create(&Actor::customer("alice"), request(T1)).unwrap();
    let _ = h.manager.create(&Actor::customer("bob"), request(T1));

    assert_eq!(h.store.list_reservations().unwrap().len(), 1);
}

#[test]
fn test_save_failure_releases_slot() {
    let store = Arc::new(FailingStore {
        inner: MemoryStore::new(),
    });
    let h = create_test_manager_with(store, ConfirmationPolicy::RequireStaff);

    let err = h.manager.create(&Actor::customer("alice"), request(T1)).unwrap_err();

    assert!(matches!(err, ReservationError::Storage(_)));
    assert!(h.manager.calendar().is_available(&slot(T1)));
    assert!(h.manager.calendar().is_empty());
}

// ========================================================================
// Validation
// ========================================================================

#[test]
fn test_create_rejects_unapproved_restaurant() {
    let h = create_test_manager();
    let req = ReservationCreate {
        restaurant_id: R_PENDING,
        table_id: T_OTHER,
        time_slot_id: SLOT_OTHER,
        date: booking_date(),
    };
    assert!(matches!(
        h.manager.create(&Actor::customer("alice"), req),
        Err(ReservationError::RestaurantNotApproved(R_PENDING))
    ));
}

#[test]
fn test_create_rejects_inactive_or_foreign_table() {
    let h = create_test_manager();
    let alice = Actor::customer("alice");

    assert!(matches!(
        h.manager.create(&alice, request(T_INACTIVE)),
        Err(ReservationError::TableInactive(T_INACTIVE))
    ));
    assert!(matches!(
        h.manager.create(&alice, request(T_OTHER)),
        Err(ReservationError::TableNotFound { .. })
    ));
    assert!(h.manager.calendar().is_empty());
}

#[test]
fn test_create_rejects_foreign_time_slot_and_past_date() {
    let h = create_test_manager();
    let alice = Actor::customer("alice");

    let mut req = request(T1);
    req.time_slot_id = SLOT_OTHER;
    assert!(matches!(
        h.manager.create(&alice, req),
        Err(ReservationError::TimeSlotNotFound { .. })
    ));

    let mut req = request(T1);
    req.date = Utc::now().date_naive() - Days::new(1);
    assert!(matches!(
        h.manager.create(&alice, req),
        Err(ReservationError::DateInPast(_))
    ));
}

// ========================================================================
// Transitions
// ========================================================================

#[test]
fn test_confirm_is_idempotent() {
    let mut h = create_test_manager();
    let r = h.manager.create(&Actor::customer("alice"), request(T1)).unwrap();

    let confirmed = h.manager.confirm(&r.id).unwrap();
    assert_eq!(confirmed.status, ReservationStatus::Confirmed);
    let again = h.manager.confirm(&r.id).unwrap();
    assert_eq!(again.status, ReservationStatus::Confirmed);

    assert_eq!(
        drain(&mut h.events),
        vec![
            ChangeEventType::ReservationCreated,
            ChangeEventType::ReservationConfirmed
        ]
    );
}

#[test]
fn test_complete_requires_confirmed() {
    let h = create_test_manager();
    let r = h.manager.create(&Actor::customer("alice"), request(T1)).unwrap();

    assert!(matches!(
        h.manager.complete(&r.id),
        Err(ReservationError::InvalidTransition {
            from: ReservationStatus::Pending,
            to: ReservationStatus::Completed,
            ..
        })
    ));

    h.manager.confirm(&r.id).unwrap();
    let completed = h.manager.complete(&r.id).unwrap();
    assert_eq!(completed.status, ReservationStatus::Completed);
    assert!(h.manager.calendar().is_available(&slot(T1)));
}

#[test]
fn test_terminal_states_reject_everything() {
    let h = create_test_manager();
    let alice = Actor::customer("alice");
    let r = h.manager.create(&alice, request(T1)).unwrap();
    h.manager.cancel(&r.id, Some(&alice)).unwrap();

    assert!(matches!(
        h.manager.cancel(&r.id, Some(&alice)),
        Err(ReservationError::NotCancellable {
            status: ReservationStatus::Cancelled,
            ..
        })
    ));
    assert!(matches!(
        h.manager.confirm(&r.id),
        Err(ReservationError::InvalidTransition { .. })
    ));
    assert!(matches!(
        h.manager.complete(&r.id),
        Err(ReservationError::InvalidTransition { .. })
    ));
}

#[test]
fn test_cancel_by_non_owner_is_forbidden() {
    let h = create_test_manager();
    let r = h.manager.create(&Actor::customer("alice"), request(T1)).unwrap();

    assert!(matches!(
        h.manager.cancel(&r.id, Some(&Actor::customer("mallory"))),
        Err(ReservationError::Forbidden { .. })
    ));
    assert_eq!(h.manager.get(&r.id).unwrap().status, ReservationStatus::Pending);
    assert!(!h.manager.calendar().is_available(&slot(T1)));

    // staff may cancel on the customer's behalf
    let cancelled = h.manager.cancel(&r.id, Some(&Actor::staff("host"))).unwrap();
    assert_eq!(cancelled.status, ReservationStatus::Cancelled);
}

#[test]
fn test_unknown_reservation() {
    let h = create_test_manager();
    assert!(matches!(
        h.manager.cancel("nope", None),
        Err(ReservationError::NotFound(_))
    ));
    assert!(matches!(h.manager.get("nope"), Err(ReservationError::NotFound(_))));
}

// ========================================================================
// Queries & recovery
// ========================================================================

#[test]
fn test_available_tables_excludes_occupied_and_inactive() {
    let h = create_test_manager();
    h.manager.create(&Actor::customer("alice"), request(T1)).unwrap();

    let available: Vec<i64> = h
        .manager
        .available_tables(R1, SLOT, booking_date())
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(available, vec![T2]);
}

#[test]
fn test_listings_newest_first() {
    let h = create_test_manager();
    let alice = Actor::customer("alice");
    let first = h.manager.create(&alice, request(T1)).unwrap();
    thread::sleep(std::time::Duration::from_millis(2));
    let second = h.manager.create(&alice, request(T2)).unwrap();

    let mine = h.manager.list_for_customer("alice").unwrap();
    assert_eq!(mine.len(), 2);
    assert_eq!(mine[0].id, second.id);
    assert_eq!(mine[1].id, first.id);

    assert!(h.manager.list_for_customer("bob").unwrap().is_empty());
    assert_eq!(h.manager.list_for_restaurant(R1).unwrap().len(), 2);
}

#[test]
fn test_recover_rebuilds_calendar() {
    let store: Arc<dyn BookingStore> = Arc::new(MemoryStore::new());
    let alice = Actor::customer("alice");

    let (kept, cancelled) = {
        let h = create_test_manager_with(store.clone(), ConfirmationPolicy::RequireStaff);
        let kept = h.manager.create(&alice, request(T1)).unwrap();
        let cancelled = h.manager.create(&alice, request(T2)).unwrap();
        h.manager.cancel(&cancelled.id, None).unwrap();
        (kept, cancelled)
    };

    // fresh calendar, same store
    let h = create_test_manager_with(store, ConfirmationPolicy::RequireStaff);
    assert!(h.manager.calendar().is_empty());
    assert_eq!(h.manager.recover().unwrap(), 1);
    assert_eq!(h.manager.calendar().holder(&slot(T1)), Some(kept.id));
    assert!(h.manager.calendar().is_available(&slot(cancelled.table_id)));
}

// ========================================================================
// Concurrency
// ========================================================================

#[test]
fn test_concurrent_create_same_slot_single_winner() {
    const CUSTOMERS: usize = 12;

    let h = Arc::new(create_test_manager());
    let barrier = Arc::new(Barrier::new(CUSTOMERS));

    let handles: Vec<_> = (0..CUSTOMERS)
        .map(|i| {
            let h = h.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                h.manager
                    .create(&Actor::customer(format!("c-{i}")), request(T1))
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|t| t.join().unwrap()).collect();
    let winners = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(ReservationError::SlotUnavailable(_))))
        .count();

    assert_eq!(winners, 1);
    assert_eq!(conflicts, CUSTOMERS - 1);
    assert_eq!(h.store.active_reservations().unwrap().len(), 1);
}
