use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{FieldErrors, RecordId, Result};
use crate::entity::contracts::EntityDescriptor;
use crate::entity::validate::{require_present, require_slug};
use crate::entity_record;

/// A discussion topic. Top-level entity: no parent relation to denormalize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub id: RecordId,
    pub name: String,
    pub slug: String,
    pub author_id: Option<RecordId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

entity_record!(Topic, owner = opt author_id, timestamps);

/// Form parameters for creating or editing a topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicParams {
    pub name: String,
    pub slug: String,
}

impl Topic {
    /// Applies validated parameters onto this record, server-side semantics:
    /// every parameter field is written through.
    pub fn apply_params(&mut self, params: &TopicParams) {
        self.name = params.name.clone();
        self.slug = params.slug.clone();
    }
}

/// Descriptor marker for the topic entity.
pub enum TopicEntity {}

impl EntityDescriptor for TopicEntity {
    type Record = Topic;
    type Params = TopicParams;
    type ParentSet = ();

    const ENTITY_NAME: &'static str = "Topic";
    const COLLECTION_PATH: &'static str = "/topics";

    fn validate_params(params: &TopicParams) -> Result<()> {
        let mut errors = FieldErrors::new();
        require_present(&mut errors, "name", &params.name);
        require_slug(&mut errors, "slug", &params.slug);
        errors.into_result()
    }

    fn provisional(params: &TopicParams, existing: Option<&Topic>, now: DateTime<Utc>) -> Topic {
        Topic {
            id: existing
                .map(|t| t.id.clone())
                .unwrap_or_else(RecordId::unassigned),
            name: params.name.clone(),
            slug: params.slug.clone(),
            author_id: existing.and_then(|t| t.author_id.clone()),
            created_at: existing.map(|t| t.created_at).unwrap_or(now),
            updated_at: existing.map(|t| t.updated_at).unwrap_or(now),
        }
    }

    fn denormalize(_record: &mut Topic, _parents: &()) {}

    fn apply_params(record: &mut Topic, params: &TopicParams) {
        record.apply_params(params);
    }

    fn persist_guard(candidate: &Topic, existing: &[Topic]) -> Result<()> {
        if existing.iter().any(|t| t.slug == candidate.slug) {
            return Err(crate::core::OverlayError::Conflict("duplicate slug".into()));
        }
        Ok(())
    }
}
