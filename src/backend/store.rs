// ============================================================================
// In-memory record tables. One typed table per entity, insertion-ordered,
// shared behind a tokio RwLock. Mutations are scoped (id, owner): a row
// belonging to someone else behaves exactly like a missing row.
// ============================================================================

use im::Vector;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::{OverlayError, RecordId, Result};
use crate::entity::EntityRecord;

/// Rows of one entity, in insertion order.
pub struct EntityTable<R: EntityRecord> {
    rows: HashMap<RecordId, R>,
    order: Vec<RecordId>,
}

impl<R: EntityRecord> EntityTable<R> {
    pub fn new() -> Self {
        EntityTable {
            rows: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Stores a record, assigning a fresh server identifier when the record
    /// does not carry a persisted one. Returns the stored row.
    pub fn insert(&mut self, mut record: R) -> R {
        if !record.id().is_persisted() {
            record.set_id(RecordId::new(Uuid::new_v4().to_string()));
        }
        let id = record.id().clone();
        if !self.rows.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.rows.insert(id, record.clone());
        record
    }

    pub fn get(&self, id: &RecordId) -> Option<&R> {
        self.rows.get(id)
    }

    /// Looks a row up only when it belongs to `owner`.
    pub fn get_scoped(&self, id: &RecordId, owner: &RecordId) -> Option<&R> {
        self.rows
            .get(id)
            .filter(|record| record.owner_id() == Some(owner))
    }

    /// Replaces a row owned by `owner`.
    ///
    /// # Errors
    /// Returns `OverlayError::NotFound` when the row is missing or belongs
    /// to someone else.
    pub fn replace_scoped(&mut self, id: &RecordId, owner: &RecordId, record: R) -> Result<R> {
        if self.get_scoped(id, owner).is_none() {
            return Err(OverlayError::NotFound(id.to_string()));
        }
        self.rows.insert(id.clone(), record.clone());
        Ok(record)
    }

    /// Removes a row owned by `owner`, returning it.
    ///
    /// # Errors
    /// Returns `OverlayError::NotFound` when the row is missing or belongs
    /// to someone else.
    pub fn remove_scoped(&mut self, id: &RecordId, owner: &RecordId) -> Result<R> {
        if self.get_scoped(id, owner).is_none() {
            return Err(OverlayError::NotFound(id.to_string()));
        }
        self.order.retain(|stored| stored != id);
        self.rows
            .remove(id)
            .ok_or_else(|| OverlayError::NotFound(id.to_string()))
    }

    /// All rows in insertion order.
    pub fn list(&self) -> Vector<R> {
        self.order
            .iter()
            .filter_map(|id| self.rows.get(id).cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<R: EntityRecord> Default for EntityTable<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle on one entity's table.
pub type TableHandle<R> = Arc<RwLock<EntityTable<R>>>;

pub fn new_table<R: EntityRecord>() -> TableHandle<R> {
    Arc::new(RwLock::new(EntityTable::new()))
}
