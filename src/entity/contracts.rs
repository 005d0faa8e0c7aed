use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

use crate::core::{RecordId, Result};

/// Core trait for records managed by an overlay.
///
/// Implementors expose identifier and owner access plus timestamp hooks.
/// Entities without timestamps keep the default no-op hooks.
pub trait EntityRecord:
    Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Returns the record's identifier.
    fn id(&self) -> &RecordId;
    /// Rewrites the record's identifier.
    fn set_id(&mut self, id: RecordId);
    /// Returns the owning user's identifier, when the record carries one.
    fn owner_id(&self) -> Option<&RecordId>;
    /// Stamps the owning user.
    fn set_owner(&mut self, owner: RecordId);
    /// Creation timestamp, for entities that track one.
    fn created_at(&self) -> Option<DateTime<Utc>> {
        None
    }
    /// Last-update timestamp, for entities that track one.
    fn updated_at(&self) -> Option<DateTime<Utc>> {
        None
    }
    /// Records the creation instant.
    fn stamp_created(&mut self, _at: DateTime<Utc>) {}
    /// Records the last-update instant.
    fn stamp_updated(&mut self, _at: DateTime<Utc>) {}
}

/// Type-level descriptor of one entity: its record shape, its validated
/// form-parameter shape, and how its foreign key denormalizes against a
/// client-side parent collection.
///
/// The overlay reducer, container, and dispatcher are generic over this
/// trait; the five concrete entities each provide one implementation in the
/// catalog.
pub trait EntityDescriptor: Send + Sync + 'static {
    /// Record shape, including the denormalized relation slot if any.
    type Record: EntityRecord;
    /// Validated form parameters. Identifier and owner are always omitted;
    /// the identifier comes from the record being edited and the owner from
    /// the session.
    type Params: Clone + Debug + Send + Sync + 'static;
    /// Client-side parent collection scanned during denormalization.
    /// `()` for top-level entities with no parent.
    type ParentSet: Clone + Debug + Send + Sync + 'static;

    /// Singular entity name, used in notifications.
    const ENTITY_NAME: &'static str;
    /// Collection path, used for cache keys and post-delete navigation.
    const COLLECTION_PATH: &'static str;

    /// Validates form parameters, collecting per-field messages.
    ///
    /// # Errors
    /// Returns `OverlayError::Validation` carrying the field-error map.
    fn validate_params(params: &Self::Params) -> Result<()>;

    /// Builds the provisional record folded into the overlay while the
    /// mutation is in flight. For an update the identifier, owner, and any
    /// unset optional fields fall back to the existing record; for a create
    /// the identifier stays unassigned until the server confirms.
    fn provisional(
        params: &Self::Params,
        existing: Option<&Self::Record>,
        now: DateTime<Utc>,
    ) -> Self::Record;

    /// Attaches the denormalized parent by foreign-key lookup. A miss is
    /// non-fatal: the relation slot stays empty and the row renders without
    /// parent fields.
    fn denormalize(record: &mut Self::Record, parents: &Self::ParentSet);

    /// Writes validated parameters through onto a record. Server-side update
    /// semantics: every parameter field is written.
    fn apply_params(record: &mut Self::Record, params: &Self::Params);

    /// Admission check the storage gateway runs before persisting, against
    /// the other rows already in the table. Default accepts everything;
    /// entities with uniqueness rules override it.
    ///
    /// # Errors
    /// Returns `OverlayError::Conflict` when the candidate collides.
    fn persist_guard(_candidate: &Self::Record, _existing: &[Self::Record]) -> Result<()> {
        Ok(())
    }
}
