// 🏨 Hotel State - Catalog + Ledger as one explicit value
//
// One instance per session, owned by the reservation engine.
// Persistence loads and saves it as a unit.

use crate::entities::{Booking, BookingLedger, Room, RoomCatalog};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct HotelState {
    pub catalog: RoomCatalog,
    pub ledger: BookingLedger,
}

/// A broken link between catalog and ledger
#[derive(Debug, Clone, PartialEq)]
pub enum ConsistencyViolation {
    /// Room is flagged booked but no booking references it
    BookedWithoutBooking(u32),
    /// Room is flagged available but a booking references it
    BookingOnAvailableRoom(u32),
    /// More than one booking references the same room
    MultipleBookings { room: u32, count: usize },
    /// Booking points at a room the catalog does not have
    UnknownRoom { booking_id: String, room: u32 },
}

impl fmt::Display for ConsistencyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsistencyViolation::BookedWithoutBooking(room) => {
                write!(f, "room {} is booked but has no booking", room)
            }
            ConsistencyViolation::BookingOnAvailableRoom(room) => {
                write!(f, "room {} is available but has a booking", room)
            }
            ConsistencyViolation::MultipleBookings { room, count } => {
                write!(f, "room {} has {} bookings", room, count)
            }
            ConsistencyViolation::UnknownRoom { booking_id, room } => {
                write!(f, "booking {} references unknown room {}", booking_id, room)
            }
        }
    }
}

impl HotelState {
    pub fn new(catalog: RoomCatalog, ledger: BookingLedger) -> Self {
        HotelState { catalog, ledger }
    }

    /// Fresh hotel: six default rooms, no bookings
    pub fn seeded() -> Self {
        Self::with_catalog(RoomCatalog::with_default_rooms())
    }

    pub fn with_catalog(catalog: RoomCatalog) -> Self {
        HotelState {
            catalog,
            ledger: BookingLedger::new(),
        }
    }

    /// Check that every room is booked iff exactly one booking references it.
    ///
    /// Returns an empty list when the state is consistent.
    pub fn check_consistency(&self) -> Vec<ConsistencyViolation> {
        let mut violations = Vec::new();
        let mut per_room: HashMap<u32, usize> = HashMap::new();

        for booking in self.ledger.list() {
            if self.catalog.find_by_number(booking.room_number).is_none() {
                violations.push(ConsistencyViolation::UnknownRoom {
                    booking_id: booking.id.clone(),
                    room: booking.room_number,
                });
                continue;
            }
            *per_room.entry(booking.room_number).or_insert(0) += 1;
        }

        for room in self.catalog.list() {
            let count = per_room.get(&room.number).copied().unwrap_or(0);

            match (room.is_booked(), count) {
                (true, 0) => {
                    violations.push(ConsistencyViolation::BookedWithoutBooking(room.number))
                }
                (false, n) if n > 0 => {
                    violations.push(ConsistencyViolation::BookingOnAvailableRoom(room.number))
                }
                _ => {}
            }

            if count > 1 {
                violations.push(ConsistencyViolation::MultipleBookings {
                    room: room.number,
                    count,
                });
            }
        }

        violations
    }

    pub fn is_consistent(&self) -> bool {
        self.check_consistency().is_empty()
    }

    /// Join a booking with the room it references
    pub fn room_for(&self, booking: &Booking) -> Option<&Room> {
        self.catalog.find_by_number(booking.room_number)
    }
}

impl Default for HotelState {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::RoomCategory;

    fn state_with(rooms: Vec<Room>, bookings: Vec<Booking>) -> HotelState {
        HotelState::new(
            RoomCatalog::new(rooms).unwrap(),
            BookingLedger::from_bookings(bookings),
        )
    }

    #[test]
    fn test_seeded_state_is_consistent() {
        let state = HotelState::seeded();

        assert_eq!(state.catalog.len(), 6);
        assert!(state.ledger.is_empty());
        assert!(state.is_consistent());
    }

    #[test]
    fn test_booked_room_without_booking() {
        let state = state_with(
            vec![Room::restored(101, RoomCategory::Standard, 100.0, true)],
            vec![],
        );

        assert_eq!(
            state.check_consistency(),
            vec![ConsistencyViolation::BookedWithoutBooking(101)]
        );
    }

    #[test]
    fn test_booking_on_available_room() {
        let state = state_with(
            vec![Room::new(101, RoomCategory::Standard, 100.0)],
            vec![Booking::new("Alice", 101)],
        );

        assert_eq!(
            state.check_consistency(),
            vec![ConsistencyViolation::BookingOnAvailableRoom(101)]
        );
    }

    #[test]
    fn test_double_booking_detected() {
        let state = state_with(
            vec![Room::restored(101, RoomCategory::Standard, 100.0, true)],
            vec![Booking::new("Alice", 101), Booking::new("Bob", 101)],
        );

        assert_eq!(
            state.check_consistency(),
            vec![ConsistencyViolation::MultipleBookings { room: 101, count: 2 }]
        );
    }

    #[test]
    fn test_booking_for_unknown_room() {
        let state = state_with(
            vec![Room::new(101, RoomCategory::Standard, 100.0)],
            vec![Booking::new("Alice", 999)],
        );

        let violations = state.check_consistency();
        assert_eq!(violations.len(), 1);
        assert!(matches!(
            violations[0],
            ConsistencyViolation::UnknownRoom { room: 999, .. }
        ));
    }

    #[test]
    fn test_room_for_joins_booking() {
        let state = state_with(
            vec![Room::restored(201, RoomCategory::Deluxe, 200.0, true)],
            vec![Booking::new("Alice", 201)],
        );

        let booking = &state.ledger.list()[0];
        let room = state.room_for(booking).unwrap();
        assert_eq!(room.category, RoomCategory::Deluxe);
        assert!(room.is_booked());
    }
}
