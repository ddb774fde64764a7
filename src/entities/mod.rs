// Entity Models
//
// Room: identity is the room number, the catalog owns every room.
// Booking: links a guest name to a room number, held in the ledger.

pub mod room;
pub mod booking;

pub use room::{Room, RoomCategory, RoomCatalog, CatalogError};
pub use booking::{Booking, BookingLedger};
