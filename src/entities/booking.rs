// 📒 Booking Entity - Active reservations linking a guest to a room
//
// A booking holds the room NUMBER, never a copy of the room.
// The catalog stays the single owner of room state.

use chrono::{DateTime, Utc};

// ============================================================================
// BOOKING ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    /// Stable identity (UUID)
    pub id: String,

    /// Free-text guest name, matched case-insensitively
    pub user_name: String,

    /// Lookup key into the room catalog
    pub room_number: u32,

    pub booked_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(user_name: &str, room_number: u32) -> Self {
        Booking {
            id: uuid::Uuid::new_v4().to_string(),
            user_name: user_name.to_string(),
            room_number,
            booked_at: Utc::now(),
        }
    }

    /// Case-insensitive name match plus exact room match
    pub fn matches(&self, user_name: &str, room_number: u32) -> bool {
        self.room_number == room_number && self.is_for_user(user_name)
    }

    pub fn is_for_user(&self, user_name: &str) -> bool {
        self.user_name.to_lowercase() == user_name.to_lowercase()
    }
}

// ============================================================================
// BOOKING LEDGER
// ============================================================================

/// Active bookings in insertion order.
///
/// The ledger does no validation of its own; the reservation engine decides
/// what may be appended or removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingLedger {
    bookings: Vec<Booking>,
}

impl BookingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_bookings(bookings: Vec<Booking>) -> Self {
        BookingLedger { bookings }
    }

    pub fn add(&mut self, booking: Booking) {
        self.bookings.push(booking);
    }

    /// First booking in ledger order for this guest and room
    pub fn find_by_user_and_room(&self, user_name: &str, room_number: u32) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.matches(user_name, room_number))
    }

    pub fn find_by_room(&self, room_number: u32) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.room_number == room_number)
    }

    /// Remove a booking by id. None if it was not in the ledger.
    pub fn remove(&mut self, booking_id: &str) -> Option<Booking> {
        let index = self.bookings.iter().position(|b| b.id == booking_id)?;
        Some(self.bookings.remove(index))
    }

    pub fn list(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn for_user<'a>(&'a self, user_name: &'a str) -> impl Iterator<Item = &'a Booking> + 'a {
        self.bookings.iter().filter(move |b| b.is_for_user(user_name))
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_creation() {
        let booking = Booking::new("Alice", 101);

        assert!(!booking.id.is_empty());
        assert_eq!(booking.user_name, "Alice");
        assert_eq!(booking.room_number, 101);
    }

    #[test]
    fn test_booking_ids_are_unique() {
        let a = Booking::new("Alice", 101);
        let b = Booking::new("Alice", 101);

        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let mut ledger = BookingLedger::new();
        ledger.add(Booking::new("Alice", 101));

        assert!(ledger.find_by_user_and_room("alice", 101).is_some());
        assert!(ledger.find_by_user_and_room("ALICE", 101).is_some());
        assert!(ledger.find_by_user_and_room("Alice", 102).is_none());
        assert!(ledger.find_by_user_and_room("Bob", 101).is_none());
    }

    #[test]
    fn test_find_returns_first_match() {
        let first = Booking::new("Alice", 101);
        let first_id = first.id.clone();

        let mut ledger = BookingLedger::from_bookings(vec![first, Booking::new("alice", 101)]);
        assert_eq!(ledger.find_by_user_and_room("ALICE", 101).unwrap().id, first_id);

        ledger.remove(&first_id);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut ledger = BookingLedger::new();
        let booking = Booking::new("Bob", 201);
        let id = booking.id.clone();
        ledger.add(booking);
        ledger.add(Booking::new("Carol", 301));

        let removed = ledger.remove(&id).unwrap();
        assert_eq!(removed.user_name, "Bob");
        assert_eq!(ledger.len(), 1);

        // Removing again is a plain not-found
        assert!(ledger.remove(&id).is_none());
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_for_user_keeps_insertion_order() {
        let mut ledger = BookingLedger::new();
        ledger.add(Booking::new("Dana", 102));
        ledger.add(Booking::new("Eve", 201));
        ledger.add(Booking::new("dana", 302));

        let rooms: Vec<u32> = ledger.for_user("DANA").map(|b| b.room_number).collect();
        assert_eq!(rooms, vec![102, 302]);
    }
}
