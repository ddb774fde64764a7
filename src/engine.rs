// ⚙️ Reservation Engine - Booking/cancellation state machine
//
// Per room: Available <-> Booked.
// Every mutation leaves catalog and ledger consistent, then saves.

use crate::entities::{Booking, Room, RoomCatalog};
use crate::error::PersistenceError;
use crate::payment::{PaymentProcessor, PaymentReceipt};
use crate::state::HotelState;
use crate::storage::{EmptyReason, LoadOutcome, StateStore};
use tracing::{info, warn};

// ============================================================================
// OUTCOMES
// ============================================================================

/// Result of a booking or cancellation request.
///
/// The not-found / already-booked variants are ordinary answers for the
/// guest, not errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ReservationOutcome {
    Booked {
        booking: Booking,
        receipt: PaymentReceipt,
    },
    Cancelled(Booking),
    RoomNotFound(u32),
    AlreadyBooked(u32),
    BookingNotFound {
        user_name: String,
        room_number: u32,
    },
}

impl ReservationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            ReservationOutcome::Booked { .. } | ReservationOutcome::Cancelled(_)
        )
    }

    /// Message shown to the guest
    pub fn message(&self) -> String {
        match self {
            ReservationOutcome::Booked { booking, .. } => {
                format!("Room booked successfully for {}", booking.user_name)
            }
            ReservationOutcome::Cancelled(booking) => {
                format!("Booking canceled for {}", booking.user_name)
            }
            ReservationOutcome::RoomNotFound(_) => "Room not found.".to_string(),
            ReservationOutcome::AlreadyBooked(_) => "Room is already booked.".to_string(),
            ReservationOutcome::BookingNotFound { .. } => "Booking not found.".to_string(),
        }
    }
}

// ============================================================================
// ENGINE
// ============================================================================

pub struct ReservationEngine<S: StateStore, P: PaymentProcessor> {
    state: HotelState,
    store: S,
    payment: P,
    load_error: Option<PersistenceError>,
    last_save_error: Option<PersistenceError>,
}

impl<S: StateStore, P: PaymentProcessor> ReservationEngine<S, P> {
    /// Restore the previous session from `store`, or start from `seed` when
    /// there is nothing usable to restore.
    pub fn open(store: S, payment: P, seed: RoomCatalog) -> Self {
        let (state, load_error) = match store.load() {
            LoadOutcome::Loaded(state) => (state, None),
            LoadOutcome::Empty(reason) => {
                info!(
                    store = %store.describe(),
                    reason = ?reason,
                    rooms = seed.len(),
                    "starting with fresh catalog"
                );
                let error = match reason {
                    EmptyReason::Missing => None,
                    EmptyReason::Unreadable(msg) | EmptyReason::Corrupt(msg) => {
                        Some(PersistenceError::LoadFailed(msg))
                    }
                    EmptyReason::UnsupportedVersion(v) => Some(PersistenceError::LoadFailed(
                        format!("unsupported format version {}", v),
                    )),
                };
                (HotelState::with_catalog(seed), error)
            }
        };

        let mut engine = Self::with_state(state, store, payment);
        engine.load_error = load_error;
        engine
    }

    /// Use an explicit state, skipping the load
    pub fn with_state(state: HotelState, store: S, payment: P) -> Self {
        ReservationEngine {
            state,
            store,
            payment,
            load_error: None,
            last_save_error: None,
        }
    }

    /// Book `room_number` for `user_name`
    pub fn book_room(&mut self, user_name: &str, room_number: u32) -> ReservationOutcome {
        let room = match self.state.catalog.find_by_number_mut(room_number) {
            Some(room) => room,
            None => return ReservationOutcome::RoomNotFound(room_number),
        };

        if room.is_booked() {
            return ReservationOutcome::AlreadyBooked(room_number);
        }

        // The ledger never holds two bookings for one room, even if the flag
        // was somehow cleared out from under it
        if self.state.ledger.find_by_room(room_number).is_some() {
            warn!(room = room_number, "room flagged available but already has a booking");
            return ReservationOutcome::AlreadyBooked(room_number);
        }

        room.book();
        let price = room.price;

        let booking = Booking::new(user_name, room_number);
        self.state.ledger.add(booking.clone());

        info!(user = user_name, room = room_number, booking_id = %booking.id, "room booked");

        let receipt = self.payment.charge(user_name, room_number, price);
        self.persist();

        ReservationOutcome::Booked { booking, receipt }
    }

    /// Cancel the booking `user_name` holds on `room_number`
    pub fn cancel_booking(&mut self, user_name: &str, room_number: u32) -> ReservationOutcome {
        let booking_id = match self.state.ledger.find_by_user_and_room(user_name, room_number) {
            Some(booking) => booking.id.clone(),
            None => {
                return ReservationOutcome::BookingNotFound {
                    user_name: user_name.to_string(),
                    room_number,
                }
            }
        };

        let booking = match self.state.ledger.remove(&booking_id) {
            Some(booking) => booking,
            None => {
                return ReservationOutcome::BookingNotFound {
                    user_name: user_name.to_string(),
                    room_number,
                }
            }
        };

        if let Some(room) = self.state.catalog.find_by_number_mut(room_number) {
            room.release();
        }

        info!(user = user_name, room = room_number, booking_id = %booking.id, "booking cancelled");

        self.persist();
        ReservationOutcome::Cancelled(booking)
    }

    fn persist(&mut self) {
        match self.store.save(&self.state) {
            Ok(()) => self.last_save_error = None,
            Err(e) => {
                warn!(
                    store = %self.store.describe(),
                    error = %format!("{:#}", e),
                    "failed to save hotel state"
                );
                self.last_save_error = Some(PersistenceError::WriteFailed(format!("{:#}", e)));
            }
        }
    }

    // ========================================================================
    // READ PROJECTIONS
    // ========================================================================

    pub fn view_rooms(&self) -> &[Room] {
        self.state.catalog.list()
    }

    pub fn view_bookings(&self) -> &[Booking] {
        self.state.ledger.list()
    }

    pub fn bookings_for<'a>(
        &'a self,
        user_name: &'a str,
    ) -> impl Iterator<Item = &'a Booking> + 'a {
        self.state.ledger.for_user(user_name)
    }

    /// Each booking joined with the room it holds, for display
    pub fn booking_lines(&self) -> Vec<String> {
        self.state
            .ledger
            .list()
            .iter()
            .map(|booking| match self.state.room_for(booking) {
                Some(room) => format!("Booking for {} | {}", booking.user_name, room),
                None => format!(
                    "Booking for {} | Room {} (missing)",
                    booking.user_name, booking.room_number
                ),
            })
            .collect()
    }

    pub fn state(&self) -> &HotelState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Why saved state was discarded at startup, if it was
    pub fn load_error(&self) -> Option<&PersistenceError> {
        self.load_error.as_ref()
    }

    /// The error from the most recent save, cleared by the next good save
    pub fn last_save_error(&self) -> Option<&PersistenceError> {
        self.last_save_error.as_ref()
    }
}

// ============================================================================
// TESTS
// ============================================================================
