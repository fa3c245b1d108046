//! Cross-component behaviour through the public API: contention,
//! ledger consistency under parallel mutation and restart recovery.

use chrono::{Days, NaiveDate, Utc};
use dine_server::catalog::InMemoryCatalog;
use dine_server::core::StorageBackend;
use dine_server::orders::{ItemOp, OrdersManager};
use dine_server::reservations::ReservationError;
use dine_server::storage::{BookingStore, MemoryStore};
use dine_server::{Config, ServerState};
use rust_decimal::Decimal;
use serde_json::json;
use shared::models::{OrderCreate, OrderStatus, ReservationCreate, ReservationStatus};
use shared::types::Actor;
use std::sync::{Arc, Barrier};
use std::thread;

fn seed_json() -> serde_json::Value {
    json!({
        "restaurants": [
            {"id": 1, "name": "Harbor Grill", "status": "APPROVED", "owner_id": "owner-1"}
        ],
        "tables": [
            {"id": 11, "restaurant_id": 1, "name": "T1", "capacity": 4, "is_active": true},
            {"id": 12, "restaurant_id": 1, "name": "T2", "capacity": 2, "is_active": true}
        ],
        "time_slots": [
            {"id": 100, "restaurant_id": 1, "start_time": "18:00:00", "end_time": "20:00:00"}
        ],
        "menu_items": [
            {"id": 501, "restaurant_id": 1, "name": "Soup", "price": 2.5, "is_active": true},
            {"id": 502, "restaurant_id": 1, "name": "Bread", "price": 1.25, "is_active": true}
        ]
    })
}

fn memory_state() -> ServerState {
    let config = Config::with_overrides(std::env::temp_dir().to_string_lossy(), 0);
    let catalog = InMemoryCatalog::from_seed(serde_json::from_value(seed_json()).unwrap()).unwrap();
    ServerState::new(config, Arc::new(catalog), Arc::new(MemoryStore::new()))
}

fn date() -> NaiveDate {
    Utc::now().date_naive() + Days::new(1)
}

fn booking(table_id: i64) -> ReservationCreate {
    ReservationCreate {
        restaurant_id: 1,
        table_id,
        time_slot_id: 100,
        date: date(),
    }
}

#[test]
fn test_contended_slot_has_exactly_one_holder() {
    let state = memory_state();
    let contenders = 16;
    let barrier = Arc::new(Barrier::new(contenders));

    let handles: Vec<_> = (0..contenders)
        .map(|i| {
            let state = state.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                let actor = Actor::customer(format!("guest-{i}"));
                barrier.wait();
                state.reservations.create(&actor, booking(11))
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(winners.len(), 1);
    assert!(
        results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, ReservationError::SlotUnavailable(_)))
    );

    // losers left nothing behind
    assert_eq!(state.store.list_reservations().unwrap().len(), 1);
    assert_eq!(state.calendar.len(), 1);

    // other tables stay bookable
    let other = state
        .reservations
        .create(&Actor::customer("late"), booking(12))
        .unwrap();
    assert_eq!(other.status, ReservationStatus::Pending);
}

#[test]
fn test_cancel_and_rebook_race() {
    let state = memory_state();
    let alice = Actor::customer("alice");
    let held = state.reservations.create(&alice, booking(11)).unwrap();
    state.reservations.cancel(&held.id, Some(&alice)).unwrap();

    let barrier = Arc::new(Barrier::new(8));
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let state = state.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                state
                    .reservations
                    .create(&Actor::customer(format!("guest-{i}")), booking(11))
                    .is_ok()
            })
        })
        .collect();

    let won = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();
    assert_eq!(won, 1);
}

#[test]
fn test_parallel_item_mutations_keep_total_consistent() {
    let state = memory_state();
    let alice = Actor::customer("alice");
    let created = state
        .orders
        .create(
            &alice,
            OrderCreate {
                restaurant_id: 1,
                items: vec![],
            },
        )
        .unwrap();
    let order_id = created.order.id;

    let threads = 6;
    let rounds = 20;
    let barrier = Arc::new(Barrier::new(threads));
    let handles: Vec<_> = (0..threads)
        .map(|i| {
            let orders = state.orders.clone();
            let barrier = barrier.clone();
            let order_id = order_id.clone();
            let actor = alice.clone();
            thread::spawn(move || {
                let menu_item_id = if i % 2 == 0 { 501 } else { 502 };
                barrier.wait();
                for _ in 0..rounds {
                    orders
                        .mutate_items(
                            &order_id,
                            ItemOp::Add {
                                menu_item_id,
                                quantity: 1,
                            },
                            Some(&actor),
                        )
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let order = state.orders.get(&order_id).unwrap();
    assert_eq!(order.items.len(), 2);
    for item in &order.items {
        assert_eq!(item.quantity, 60);
    }
    // 60 * 2.50 + 60 * 1.25
    assert_eq!(order.total_amount, Decimal::new(22500, 2));
    assert!(OrdersManager::verify_total(&order));
}

#[test]
fn test_cancel_races_with_item_add() {
    let state = memory_state();
    let alice = Actor::customer("alice");
    let order_id = state
        .orders
        .create(
            &alice,
            OrderCreate {
                restaurant_id: 1,
                items: vec![],
            },
        )
        .unwrap()
        .order
        .id;

    let barrier = Arc::new(Barrier::new(2));
    let adder = {
        let orders = state.orders.clone();
        let barrier = barrier.clone();
        let order_id = order_id.clone();
        let actor = alice.clone();
        thread::spawn(move || {
            barrier.wait();
            let mut applied = 0;
            for _ in 0..50 {
                let op = ItemOp::Add {
                    menu_item_id: 501,
                    quantity: 1,
                };
                if orders.mutate_items(&order_id, op, Some(&actor)).is_ok() {
                    applied += 1;
                }
            }
            applied
        })
    };
    let canceller = {
        let orders = state.orders.clone();
        let order_id = order_id.clone();
        let actor = alice.clone();
        thread::spawn(move || {
            barrier.wait();
            orders.cancel(&order_id, Some(&actor)).unwrap();
        })
    };

    let applied = adder.join().unwrap();
    canceller.join().unwrap();

    // every add that returned Ok is in the final order; none landed after cancel
    let order = state.orders.get(&order_id).unwrap();
    assert_eq!(order.status, OrderStatus::Cancelled);
    let quantity = order.items.first().map(|i| i.quantity).unwrap_or(0);
    assert_eq!(quantity, applied);
    assert!(OrdersManager::verify_total(&order));
}

#[test]
fn test_restart_restores_slot_occupancy() {
    let dir = tempfile::tempdir().unwrap();
    let seed_path = dir.path().join("seed.json");
    std::fs::write(&seed_path, seed_json().to_string()).unwrap();

    let mut config = Config::with_overrides(dir.path().to_string_lossy(), 0);
    config.storage_backend = StorageBackend::Redb;
    config.catalog_seed = Some(seed_path.to_string_lossy().into_owned());

    let (held, released) = {
        let state = ServerState::initialize(&config).unwrap();
        let alice = Actor::customer("alice");
        let held = state.reservations.create(&alice, booking(11)).unwrap();
        let released = state.reservations.create(&alice, booking(12)).unwrap();
        state.reservations.cancel(&released.id, Some(&alice)).unwrap();
        (held, released)
    };

    let state = ServerState::initialize(&config).unwrap();
    assert_eq!(state.calendar.len(), 1);

    let bob = Actor::customer("bob");
    let err = state.reservations.create(&bob, booking(11)).unwrap_err();
    assert!(matches!(err, ReservationError::SlotUnavailable(_)));
    state.reservations.create(&bob, booking(12)).unwrap();

    let restored = state.reservations.get(&held.id).unwrap();
    assert_eq!(restored.status, ReservationStatus::Pending);
    let cancelled = state.reservations.get(&released.id).unwrap();
    assert_eq!(cancelled.status, ReservationStatus::Cancelled);
}
