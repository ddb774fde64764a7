// 💾 Persistence Gateway - Versioned JSON state file
//
// File layout (format_version 1):
//
//   {
//     "format_version": 1,
//     "saved_at": "2026-01-01T00:00:00Z",
//     "checksum": "<sha256 hex of payload>",
//     "payload": { "rooms": [...], "bookings": [...] }
//   }
//
// Records are separate from the domain types so the file format can evolve
// without touching Room/Booking. Loading never fails: missing or broken state
// comes back as LoadOutcome::Empty and the caller seeds a fresh hotel.

use crate::entities::{Booking, BookingLedger, Room, RoomCategory, RoomCatalog};
use crate::state::HotelState;
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const FORMAT_VERSION: u32 = 1;

// ============================================================================
// STORE TRAIT
// ============================================================================

/// Why a load produced no state
#[derive(Debug, Clone, PartialEq)]
pub enum EmptyReason {
    /// No state has been saved yet
    Missing,
    /// The file exists but could not be read
    Unreadable(String),
    /// The contents do not reconstruct into a valid hotel
    Corrupt(String),
    /// Written by a format this build does not understand
    UnsupportedVersion(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded(HotelState),
    Empty(EmptyReason),
}

impl LoadOutcome {
    pub fn into_state(self) -> Option<HotelState> {
        match self {
            LoadOutcome::Loaded(state) => Some(state),
            LoadOutcome::Empty(_) => None,
        }
    }
}

/// Durable home for the catalog + ledger pair
pub trait StateStore {
    /// Read the previous session's state. Never errors.
    fn load(&self) -> LoadOutcome;

    /// Replace stored state with this one, as a single unit
    fn save(&mut self, state: &HotelState) -> Result<()>;

    /// Human-readable location, for logs
    fn describe(&self) -> String;
}

// ============================================================================
// RECORD FORMAT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomRecord {
    pub number: u32,
    pub category: String,
    pub price: f64,
    pub is_booked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub id: String,
    pub user_name: String,
    pub room_number: u32,
    pub booked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatePayload {
    pub rooms: Vec<RoomRecord>,
    pub bookings: Vec<BookingRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateRecord {
    pub format_version: u32,
    pub saved_at: DateTime<Utc>,
    pub checksum: String,
    pub payload: StatePayload,
}

/// Only the version field, so unknown formats are recognised before full parsing
#[derive(Deserialize)]
struct RecordHeader {
    format_version: u32,
}

impl StatePayload {
    pub fn from_state(state: &HotelState) -> Self {
        let rooms = state
            .catalog
            .list()
            .iter()
            .map(|room| RoomRecord {
                number: room.number,
                category: room.category.as_str().to_string(),
                price: room.price,
                is_booked: room.is_booked(),
            })
            .collect();

        let bookings = state
            .ledger
            .list()
            .iter()
            .map(|booking| BookingRecord {
                id: booking.id.clone(),
                user_name: booking.user_name.clone(),
                room_number: booking.room_number,
                booked_at: booking.booked_at,
            })
            .collect();

        StatePayload { rooms, bookings }
    }

    /// Rebuild domain state, validating catalog rules and the booking invariant
    pub fn into_state(self) -> Result<HotelState> {
        let mut rooms = Vec::with_capacity(self.rooms.len());
        for record in self.rooms {
            let category: RoomCategory = record.category.parse()?;
            rooms.push(Room::restored(record.number, category, record.price, record.is_booked));
        }
        let catalog = RoomCatalog::new(rooms)?;
        anyhow::ensure!(!catalog.is_empty(), "state has no rooms");

        let bookings = self
            .bookings
            .into_iter()
            .map(|record| Booking {
                id: record.id,
                user_name: record.user_name,
                room_number: record.room_number,
                booked_at: record.booked_at,
            })
            .collect();

        let state = HotelState::new(catalog, BookingLedger::from_bookings(bookings));

        let violations = state.check_consistency();
        if !violations.is_empty() {
            let details: Vec<String> = violations.iter().map(|v| v.to_string()).collect();
            return Err(anyhow!("inconsistent state: {}", details.join("; ")));
        }

        Ok(state)
    }

    /// SHA-256 over the canonical JSON of the payload
    pub fn checksum(&self) -> Result<String> {
        let json = serde_json::to_string(self).context("Failed to serialize state payload")?;
        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        Ok(format!("{:x}", hasher.finalize()))
    }
}

impl StateRecord {
    pub fn from_state(state: &HotelState) -> Result<Self> {
        let payload = StatePayload::from_state(state);
        let checksum = payload.checksum()?;

        Ok(StateRecord {
            format_version: FORMAT_VERSION,
            saved_at: Utc::now(),
            checksum,
            payload,
        })
    }
}

/// Encode state as the on-disk JSON document
pub fn encode_state(state: &HotelState) -> Result<String> {
    let record = StateRecord::from_state(state)?;
    serde_json::to_string_pretty(&record).context("Failed to serialize state record")
}

/// Decode the on-disk JSON document. Errors carry the reason the data is unusable.
pub fn decode_state(contents: &str) -> std::result::Result<HotelState, EmptyReason> {
    let header: RecordHeader = serde_json::from_str(contents)
        .map_err(|e| EmptyReason::Corrupt(format!("unreadable header: {}", e)))?;

    if header.format_version != FORMAT_VERSION {
        return Err(EmptyReason::UnsupportedVersion(header.format_version));
    }

    let record: StateRecord = serde_json::from_str(contents)
        .map_err(|e| EmptyReason::Corrupt(format!("malformed record: {}", e)))?;

    let expected = record
        .payload
        .checksum()
        .map_err(|e| EmptyReason::Corrupt(e.to_string()))?;
    if expected != record.checksum {
        return Err(EmptyReason::Corrupt("checksum mismatch".to_string()));
    }

    record
        .payload
        .into_state()
        .map_err(|e| EmptyReason::Corrupt(e.to_string()))
}

// ============================================================================
// JSON STATE FILE
// ============================================================================

/// State persisted to a single JSON file on disk
#[derive(Debug, Clone)]
pub struct JsonStateFile {
    path: PathBuf,
}

impl JsonStateFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        JsonStateFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "hotel_state".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StateStore for JsonStateFile {
    fn load(&self) -> LoadOutcome {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no saved hotel state");
                return LoadOutcome::Empty(EmptyReason::Missing);
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not read hotel state");
                return LoadOutcome::Empty(EmptyReason::Unreadable(e.to_string()));
            }
        };

        match decode_state(&contents) {
            Ok(state) => {
                info!(
                    path = %self.path.display(),
                    rooms = state.catalog.len(),
                    bookings = state.ledger.len(),
                    "restored hotel state"
                );
                LoadOutcome::Loaded(state)
            }
            Err(reason) => {
                warn!(
                    path = %self.path.display(),
                    reason = ?reason,
                    "discarding saved hotel state"
                );
                LoadOutcome::Empty(reason)
            }
        }
    }

    fn save(&mut self, state: &HotelState) -> Result<()> {
        let json = encode_state(state)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {}", parent.display()))?;
            }
        }

        // Write aside, then swap in, so readers never see half a file
        let temp = self.temp_path();
        fs::write(&temp, json)
            .with_context(|| format!("Failed to write {}", temp.display()))?;
        if let Err(err) = fs::rename(&temp, &self.path) {
            let _ = fs::remove_file(&temp);
            return Err(err).with_context(|| format!("Failed to replace {}", self.path.display()));
        }

        debug!(path = %self.path.display(), "saved hotel state");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

// ============================================================================
// MEMORY STORE
// ============================================================================

/// Keeps the last saved state in memory. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    saved: Option<HotelState>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from previously saved state
    pub fn with_state(state: HotelState) -> Self {
        MemoryStore {
            saved: Some(state),
            saves: 0,
        }
    }

    pub fn saved(&self) -> Option<&HotelState> {
        self.saved.as_ref()
    }

    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> LoadOutcome {
        match &self.saved {
            Some(state) => LoadOutcome::Loaded(state.clone()),
            None => LoadOutcome::Empty(EmptyReason::Missing),
        }
    }

    fn save(&mut self, state: &HotelState) -> Result<()> {
        self.saved = Some(state.clone());
        self.saves += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn booked_state() -> HotelState {
        let mut state = HotelState::seeded();
        state.catalog.find_by_number_mut(101).unwrap().book();
        state.ledger.add(Booking::new("Alice", 101));
        state.catalog.find_by_number_mut(302).unwrap().book();
        state.ledger.add(Booking::new("Bob", 302));
        state
    }

    #[test]
    fn test_encode_decode_preserves_state() {
        let state = booked_state();

        let json = encode_state(&state).unwrap();
        let restored = decode_state(&json).unwrap();

        assert_eq!(restored, state);
    }

    #[test]
    fn test_decode_keeps_exact_prices() {
        // Prices that are not whole cents must come back bit-for-bit,
        // otherwise the checksum no longer matches on load.
        let prices = [89.99 * 1.15, 985.6906946328695, 0.1 + 0.2, 1e-7, 123456.789012345];
        let rooms = prices
            .iter()
            .enumerate()
            .map(|(i, &price)| Room::new(i as u32 + 1, RoomCategory::Standard, price))
            .collect();
        let mut state = HotelState::new(RoomCatalog::new(rooms).unwrap(), BookingLedger::default());
        state.catalog.find_by_number_mut(2).unwrap().book();
        state.ledger.add(Booking::new("Alice", 2));

        let restored = decode_state(&encode_state(&state).unwrap()).unwrap();

        assert_eq!(restored, state);
        for (room, price) in restored.catalog.list().iter().zip(prices) {
            assert_eq!(room.price.to_bits(), price.to_bits());
        }
    }

    #[test]
    fn test_decode_keeps_custom_category() {
        let catalog = RoomCatalog::new(vec![
            Room::new(1, RoomCategory::Deluxe, 200.0),
            Room::new(9, RoomCategory::Other("Penthouse".to_string()), 1200.0),
        ])
        .unwrap();
        let state = HotelState::new(catalog, BookingLedger::default());

        let json = encode_state(&state).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["payload"]["rooms"][1]["category"], "Penthouse");

        let restored = decode_state(&json).unwrap();
        assert_eq!(
            restored.catalog.find_by_number(9).unwrap().category,
            RoomCategory::Other("Penthouse".to_string())
        );
    }

    #[test]
    fn test_failed_replace_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory where the state file should go makes the rename fail
        let target = dir.path().join("hotel_state.json");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "x").unwrap();

        let mut store = JsonStateFile::new(&target);
        let err = store.save(&HotelState::seeded()).unwrap_err();

        assert!(format!("{:#}", err).contains("Failed to replace"));
        assert!(!dir.path().join("hotel_state.json.tmp").exists());
        assert!(target.join("keep").exists());
    }

    #[test]
    fn test_record_is_versioned() {
        let json = encode_state(&HotelState::seeded()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["format_version"], 1);
        assert_eq!(value["payload"]["rooms"].as_array().unwrap().len(), 6);
        assert_eq!(value["payload"]["rooms"][0]["category"], "Standard");
        assert_eq!(value["checksum"].as_str().unwrap().len(), 64);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode_state("not json"), Err(EmptyReason::Corrupt(_))));
        assert!(matches!(decode_state(""), Err(EmptyReason::Corrupt(_))));
    }

    #[test]
    fn test_decode_rejects_unknown_version() {
        let json = encode_state(&HotelState::seeded()).unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["format_version"] = serde_json::json!(7);

        let result = decode_state(&value.to_string());
        assert_eq!(result, Err(EmptyReason::UnsupportedVersion(7)));
    }

    #[test]
    fn test_decode_detects_tampering() {
        let json = encode_state(&booked_state()).unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["payload"]["rooms"][0]["price"] = serde_json::json!(1.0);

        let result = decode_state(&value.to_string());
        assert_eq!(result, Err(EmptyReason::Corrupt("checksum mismatch".to_string())));
    }

    #[test]
    fn test_decode_rejects_inconsistent_payload() {
        // Valid checksum, but room 101 is booked with no booking behind it
        let mut payload = StatePayload::from_state(&HotelState::seeded());
        payload.rooms[0].is_booked = true;
        let record = StateRecord {
            format_version: FORMAT_VERSION,
            saved_at: Utc::now(),
            checksum: payload.checksum().unwrap(),
            payload,
        };
        let json = serde_json::to_string(&record).unwrap();

        match decode_state(&json) {
            Err(EmptyReason::Corrupt(msg)) => assert!(msg.contains("room 101")),
            other => panic!("expected corrupt state, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_empty_catalog() {
        let payload = StatePayload {
            rooms: vec![],
            bookings: vec![],
        };
        let record = StateRecord {
            format_version: FORMAT_VERSION,
            saved_at: Utc::now(),
            checksum: payload.checksum().unwrap(),
            payload,
        };

        let result = decode_state(&serde_json::to_string(&record).unwrap());
        assert_eq!(result, Err(EmptyReason::Corrupt("state has no rooms".to_string())));
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load(), LoadOutcome::Empty(EmptyReason::Missing));

        let state = booked_state();
        store.save(&state).unwrap();

        assert_eq!(store.save_count(), 1);
        assert_eq!(store.load().into_state(), Some(state));
    }
}
