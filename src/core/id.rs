// ============================================================================
// Record Identifiers and Placeholder Sentinels
// ============================================================================
//
// Identifiers are opaque strings assigned by the authoritative side. Two
// values are reserved for rows that exist only inside an overlay list:
//
//   "optimistic"  create still in flight, no server id yet
//   "delete"      delete in flight, row kept visible until the next reseed
//
// A sentinel never appears in an authoritative list and is never sent to a
// gateway as a real identifier.
//
// ============================================================================

use serde::{Deserialize, Serialize};

const OPTIMISTIC_SENTINEL: &str = "optimistic";
const DELETE_SENTINEL: &str = "delete";

/// Identifier of one record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        RecordId(id.into())
    }

    /// The empty identifier a provisional create carries before the server
    /// assigns the real one.
    pub fn unassigned() -> Self {
        RecordId(String::new())
    }

    /// Sentinel marking a create-in-flight row.
    pub fn optimistic() -> Self {
        RecordId(OPTIMISTIC_SENTINEL.to_string())
    }

    /// Sentinel marking a delete-in-flight row.
    pub fn deleting() -> Self {
        RecordId(DELETE_SENTINEL.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_optimistic(&self) -> bool {
        self.0 == OPTIMISTIC_SENTINEL
    }

    pub fn is_deleting(&self) -> bool {
        self.0 == DELETE_SENTINEL
    }

    /// True for either sentinel: the row is mid-mutation and the view may
    /// style or suppress it.
    pub fn is_pending(&self) -> bool {
        self.is_optimistic() || self.is_deleting()
    }

    /// True for a real, server-assigned identifier.
    pub fn is_persisted(&self) -> bool {
        !self.0.is_empty() && !self.is_pending()
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        RecordId(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        RecordId(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_predicates() {
        assert!(RecordId::optimistic().is_optimistic());
        assert!(RecordId::optimistic().is_pending());
        assert!(!RecordId::optimistic().is_persisted());

        assert!(RecordId::deleting().is_deleting());
        assert!(RecordId::deleting().is_pending());
        assert!(!RecordId::deleting().is_persisted());
    }

    #[test]
    fn test_persisted_id() {
        let id = RecordId::new("clx1a2b3c");
        assert!(id.is_persisted());
        assert!(!id.is_pending());
        assert_eq!(id.to_string(), "clx1a2b3c");
    }

    #[test]
    fn test_unassigned_is_neither_pending_nor_persisted() {
        let id = RecordId::unassigned();
        assert!(!id.is_pending());
        assert!(!id.is_persisted());
    }

    #[test]
    fn test_serde_transparent() {
        let id = RecordId::new("abc");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abc\"");
        let back: RecordId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
