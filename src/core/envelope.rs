// ============================================================================
// Mutation Envelopes
// ============================================================================
//
// An envelope describes one pending change: which kind of mutation, and the
// record payload it carries. Envelopes are built at submission time, folded
// into the overlay synchronously, and never persisted or retried.
//
// ============================================================================

use serde::{Deserialize, Serialize};

/// The three mutation kinds a view can dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl MutationKind {
    /// Check if folding this kind grows the overlay list.
    pub fn appends_row(&self) -> bool {
        matches!(self, MutationKind::Create)
    }

    /// Check if folding this kind rewrites rows in place.
    pub fn rewrites_rows(&self) -> bool {
        matches!(self, MutationKind::Update | MutationKind::Delete)
    }

    /// Imperative verb, used in failure notifications.
    pub fn verb(&self) -> &'static str {
        match self {
            MutationKind::Create => "create",
            MutationKind::Update => "update",
            MutationKind::Delete => "delete",
        }
    }

    /// Past-tense verb, used in success notifications.
    pub fn past_tense(&self) -> &'static str {
        match self {
            MutationKind::Create => "created",
            MutationKind::Update => "updated",
            MutationKind::Delete => "deleted",
        }
    }
}

impl std::fmt::Display for MutationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.verb())
    }
}

/// One pending change: kind plus the record payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationEnvelope<R> {
    pub kind: MutationKind,
    pub data: R,
}

impl<R> MutationEnvelope<R> {
    pub fn new(kind: MutationKind, data: R) -> Self {
        Self { kind, data }
    }

    pub fn create(data: R) -> Self {
        Self::new(MutationKind::Create, data)
    }

    pub fn update(data: R) -> Self {
        Self::new(MutationKind::Update, data)
    }

    pub fn delete(data: R) -> Self {
        Self::new(MutationKind::Delete, data)
    }
}
