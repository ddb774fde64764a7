// Hotel Reservation System - Core Library
// Exposes all modules for use in the CLI, the terminal UI, and tests

pub mod entities;
pub mod state;
pub mod error;
pub mod payment;
pub mod storage;
pub mod engine;
pub mod config;
pub mod shell;

// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
pub mod ui;

// Re-export commonly used types
pub use entities::{
    Room, RoomCategory, RoomCatalog, CatalogError,
    Booking, BookingLedger,
};
pub use state::{HotelState, ConsistencyViolation};
pub use error::PersistenceError;
pub use payment::{PaymentProcessor, PaymentReceipt, SimulatedPayment};
pub use storage::{
    StateStore, JsonStateFile, MemoryStore,
    LoadOutcome, EmptyReason, FORMAT_VERSION,
    encode_state, decode_state,
};
pub use engine::{ReservationEngine, ReservationOutcome};
pub use config::{HotelConfig, load_seed_catalog};
pub use shell::{Shell, MenuCommand};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
