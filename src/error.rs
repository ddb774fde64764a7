// ⚠️ Persistence errors
//
// Business outcomes (room not found, already booked, booking not found) are
// NOT errors; they live in engine::ReservationOutcome. These are the two
// infrastructure failures, both recoverable.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum PersistenceError {
    /// Saving state failed; in-memory state stays authoritative
    WriteFailed(String),
    /// Loading state failed; treated like "no prior state"
    LoadFailed(String),
}

impl PersistenceError {
    pub fn message(&self) -> &str {
        match self {
            PersistenceError::WriteFailed(msg) | PersistenceError::LoadFailed(msg) => msg,
        }
    }
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::WriteFailed(msg) => write!(f, "failed to save hotel state: {}", msg),
            PersistenceError::LoadFailed(msg) => write!(f, "failed to load hotel state: {}", msg),
        }
    }
}

impl std::error::Error for PersistenceError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = PersistenceError::WriteFailed("disk full".to_string());
        assert_eq!(err.to_string(), "failed to save hotel state: disk full");
        assert_eq!(err.message(), "disk full");
    }
}
