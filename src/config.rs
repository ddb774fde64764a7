// 🔧 Configuration - where state lives and which rooms a fresh hotel gets
//
// CLI flags win over environment variables, which win over defaults.
// The clap definitions in main.rs carry the env fallbacks.

use crate::entities::{Room, RoomCategory, RoomCatalog};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_STATE_FILE: &str = "hotel_data.json";
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq)]
pub struct HotelConfig {
    /// Persisted catalog + ledger
    pub state_file: PathBuf,

    /// Optional JSON list of rooms used instead of the six defaults
    pub seed_file: Option<PathBuf>,

    /// Guest name; prompted for when absent
    pub user_name: Option<String>,

    /// tracing-subscriber filter directive
    pub log_filter: String,
}

impl Default for HotelConfig {
    fn default() -> Self {
        HotelConfig {
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            seed_file: None,
            user_name: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl HotelConfig {
    /// Catalog a fresh hotel starts with
    pub fn seed_catalog(&self) -> Result<RoomCatalog> {
        match &self.seed_file {
            Some(path) => load_seed_catalog(path),
            None => Ok(RoomCatalog::with_default_rooms()),
        }
    }

    /// Blank or whitespace-only names count as "not configured"
    pub fn configured_user(&self) -> Option<&str> {
        self.user_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

// ============================================================================
// SEED FILE
// ============================================================================

/// One room in a seed file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedRoom {
    pub number: u32,
    pub category: String,
    pub price: f64,
}

/// Load rooms from a JSON array of `{ "number", "category", "price" }`
pub fn load_seed_catalog(path: &Path) -> Result<RoomCatalog> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file {}", path.display()))?;

    let seeds: Vec<SeedRoom> =
        serde_json::from_str(&contents).context("Failed to parse seed rooms JSON")?;

    let mut rooms = Vec::with_capacity(seeds.len());
    for seed in seeds {
        let category: RoomCategory = seed
            .category
            .parse()
            .with_context(|| format!("Room {} in seed file", seed.number))?;
        rooms.push(Room::new(seed.number, category, seed.price));
    }

    let catalog = RoomCatalog::new(rooms).context("Invalid seed catalog")?;
    anyhow::ensure!(!catalog.is_empty(), "Seed file {} contains no rooms", path.display());

    Ok(catalog)
}
