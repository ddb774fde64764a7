//! Scenario: booking lifecycle on a fresh hotel
//!
//! Book, re-book, cancel and unknown-room requests against the default
//! catalog. Catalog/ledger consistency is re-checked after every operation.

use hotel_reservation::{
    MemoryStore, ReservationEngine, ReservationOutcome, RoomCatalog, SimulatedPayment,
};

type Engine = ReservationEngine<MemoryStore, SimulatedPayment>;

fn fresh() -> Engine {
    ReservationEngine::open(MemoryStore::new(), SimulatedPayment, RoomCatalog::with_default_rooms())
}

fn is_booked(engine: &Engine, room: u32) -> bool {
    engine.state().catalog.find_by_number(room).unwrap().is_booked()
}

fn assert_consistent(engine: &Engine) {
    let violations = engine.state().check_consistency();
    assert!(violations.is_empty(), "inconsistent state: {:?}", violations);
}

#[test]
fn alice_books_bob_is_refused_alice_cancels() {
    let mut engine = fresh();
    assert_consistent(&engine);

    let booked = engine.book_room("Alice", 101);
    assert!(matches!(booked, ReservationOutcome::Booked { .. }));
    assert!(is_booked(&engine, 101));
    assert_consistent(&engine);

    let before = engine.state().clone();
    let refused = engine.book_room("Bob", 101);
    assert_eq!(refused, ReservationOutcome::AlreadyBooked(101));
    assert_eq!(engine.state(), &before);
    assert_consistent(&engine);

    let cancelled = engine.cancel_booking("Alice", 101);
    assert!(matches!(cancelled, ReservationOutcome::Cancelled(_)));
    assert!(!is_booked(&engine, 101));
    assert!(engine.view_bookings().is_empty());
    assert_consistent(&engine);
}

#[test]
fn unknown_room_changes_nothing() {
    let mut engine = fresh();
    let before = engine.state().clone();

    assert_eq!(engine.book_room("Carol", 999), ReservationOutcome::RoomNotFound(999));
    assert_eq!(engine.state(), &before);
    assert_eq!(engine.store().save_count(), 0);
    assert_consistent(&engine);
}

#[test]
fn cancelling_missing_booking_changes_nothing() {
    let mut engine = fresh();
    engine.book_room("Alice", 201);
    let before = engine.state().clone();

    for (user, room) in [("Bob", 201), ("Alice", 202), ("Alice", 999)] {
        let outcome = engine.cancel_booking(user, room);
        assert!(matches!(outcome, ReservationOutcome::BookingNotFound { .. }));
        assert_eq!(engine.state(), &before);
        assert_consistent(&engine);
    }
}

#[test]
fn every_room_can_be_booked_then_released() {
    let mut engine = fresh();
    let numbers: Vec<u32> = engine.view_rooms().iter().map(|r| r.number).collect();

    for (i, number) in numbers.iter().enumerate() {
        let guest = format!("guest-{}", i);
        assert!(engine.book_room(&guest, *number).is_success());
        assert_consistent(&engine);
    }
    assert_eq!(engine.state().catalog.available().count(), 0);

    for (i, number) in numbers.iter().enumerate() {
        let guest = format!("GUEST-{}", i);
        assert!(engine.cancel_booking(&guest, *number).is_success());
        assert_consistent(&engine);
    }
    assert_eq!(engine.state().catalog.available().count(), 6);
    assert_eq!(engine.store().save_count(), 12);
}
