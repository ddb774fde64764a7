// 🛏️ Room Entity - Bookable units + the catalog that owns them
//
// Room number is IDENTITY (never changes), category and price are fixed VALUES,
// is_booked is the only mutable STATE and only the reservation engine flips it.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// ROOM CATEGORY
// ============================================================================

/// Room label. The three house categories are named; anything else a seed
/// file or saved state carries is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RoomCategory {
    Standard,
    Deluxe,
    Suite,
    Other(String),
}

impl RoomCategory {
    pub fn as_str(&self) -> &str {
        match self {
            RoomCategory::Standard => "Standard",
            RoomCategory::Deluxe => "Deluxe",
            RoomCategory::Suite => "Suite",
            RoomCategory::Other(label) => label,
        }
    }
}

impl fmt::Display for RoomCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomCategory {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        match label.to_lowercase().as_str() {
            "" => Err(CatalogError::BlankCategory),
            "standard" => Ok(RoomCategory::Standard),
            "deluxe" => Ok(RoomCategory::Deluxe),
            "suite" => Ok(RoomCategory::Suite),
            _ => Ok(RoomCategory::Other(label.to_string())),
        }
    }
}

// ============================================================================
// ROOM ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    /// Stable identity - unique within the catalog
    pub number: u32,
    pub category: RoomCategory,
    /// Nightly price in dollars
    pub price: f64,
    is_booked: bool,
}

impl Room {
    /// Create a new room in the Available state
    pub fn new(number: u32, category: RoomCategory, price: f64) -> Self {
        Room {
            number,
            category,
            price,
            is_booked: false,
        }
    }

    /// Rebuild a room with an explicit booked flag (restoring persisted state)
    pub(crate) fn restored(
        number: u32,
        category: RoomCategory,
        price: f64,
        is_booked: bool,
    ) -> Self {
        Room {
            number,
            category,
            price,
            is_booked,
        }
    }

    pub fn is_booked(&self) -> bool {
        self.is_booked
    }

    pub fn is_available(&self) -> bool {
        !self.is_booked
    }

    pub(crate) fn book(&mut self) {
        self.is_booked = true;
    }

    pub(crate) fn release(&mut self) {
        self.is_booked = false;
    }

    pub fn status_label(&self) -> &'static str {
        if self.is_booked {
            "Booked"
        } else {
            "Available"
        }
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Room {} | {} | Price: ${:.2} | {}",
            self.number,
            self.category,
            self.price,
            self.status_label()
        )
    }
}

// ============================================================================
// CATALOG ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogError {
    DuplicateRoom(u32),
    InvalidRoomNumber(u32),
    InvalidPrice { room: u32, price: f64 },
    BlankCategory,
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::DuplicateRoom(n) => write!(f, "duplicate room number {}", n),
            CatalogError::InvalidRoomNumber(n) => write!(f, "invalid room number {}", n),
            CatalogError::InvalidPrice { room, price } => {
                write!(f, "room {} has invalid price {}", room, price)
            }
            CatalogError::BlankCategory => write!(f, "room category is blank"),
        }
    }
}

impl std::error::Error for CatalogError {}

// ============================================================================
// ROOM CATALOG
// ============================================================================

/// Ordered set of rooms keyed by room number.
///
/// Membership is fixed once built; only the booked flag of a room changes.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomCatalog {
    rooms: Vec<Room>,
}

impl RoomCatalog {
    /// Build a catalog, rejecting duplicate numbers, room 0 and bad prices
    pub fn new(rooms: Vec<Room>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();

        for room in &rooms {
            if room.number == 0 {
                return Err(CatalogError::InvalidRoomNumber(room.number));
            }
            if !room.price.is_finite() || room.price < 0.0 {
                return Err(CatalogError::InvalidPrice {
                    room: room.number,
                    price: room.price,
                });
            }
            if !seen.insert(room.number) {
                return Err(CatalogError::DuplicateRoom(room.number));
            }
        }

        Ok(RoomCatalog { rooms })
    }

    /// The six rooms a fresh hotel starts with
    pub fn with_default_rooms() -> Self {
        RoomCatalog {
            rooms: vec![
                Room::new(101, RoomCategory::Standard, 100.0),
                Room::new(102, RoomCategory::Standard, 100.0),
                Room::new(201, RoomCategory::Deluxe, 200.0),
                Room::new(202, RoomCategory::Deluxe, 200.0),
                Room::new(301, RoomCategory::Suite, 350.0),
                Room::new(302, RoomCategory::Suite, 350.0),
            ],
        }
    }

    /// Linear lookup by room number. None means the room does not exist.
    pub fn find_by_number(&self, number: u32) -> Option<&Room> {
        self.rooms.iter().find(|r| r.number == number)
    }

    pub(crate) fn find_by_number_mut(&mut self, number: u32) -> Option<&mut Room> {
        self.rooms.iter_mut().find(|r| r.number == number)
    }

    /// All rooms in catalog order
    pub fn list(&self) -> &[Room] {
        &self.rooms
    }

    pub fn available(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter().filter(|r| r.is_available())
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

impl Default for RoomCatalog {
    fn default() -> Self {
        Self::with_default_rooms()
    }
}

// ============================================================================
// TESTS
// ============================================================================
