use chrono::{DateTime, Utc};
use im::Vector;
use log::warn;
use serde::{Deserialize, Serialize};

use super::post::Post;
use crate::core::{FieldErrors, RecordId, Result};
use crate::entity::contracts::EntityDescriptor;
use crate::entity::validate::require_present;
use crate::entity_record;

/// An up/down vote on a post. The one entity without timestamp columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub id: RecordId,
    pub up: bool,
    pub post_id: RecordId,
    pub author_id: RecordId,
    /// Parent post attached by foreign-key lookup.
    pub post: Option<Post>,
}

entity_record!(Vote, owner = author_id);

/// Form parameters for creating or editing a vote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteParams {
    pub up: bool,
    pub post_id: RecordId,
}

impl Vote {
    pub fn apply_params(&mut self, params: &VoteParams) {
        self.up = params.up;
        self.post_id = params.post_id.clone();
    }
}

/// Descriptor marker for the vote entity.
pub enum VoteEntity {}

impl EntityDescriptor for VoteEntity {
    type Record = Vote;
    type Params = VoteParams;
    type ParentSet = Vector<Post>;

    const ENTITY_NAME: &'static str = "Vote";
    const COLLECTION_PATH: &'static str = "/votes";

    fn validate_params(params: &VoteParams) -> Result<()> {
        let mut errors = FieldErrors::new();
        require_present(&mut errors, "post_id", params.post_id.as_str());
        errors.into_result()
    }

    fn provisional(params: &VoteParams, existing: Option<&Vote>, _now: DateTime<Utc>) -> Vote {
        Vote {
            id: existing
                .map(|v| v.id.clone())
                .unwrap_or_else(RecordId::unassigned),
            up: params.up,
            post_id: params.post_id.clone(),
            author_id: existing
                .map(|v| v.author_id.clone())
                .unwrap_or_else(RecordId::unassigned),
            post: None,
        }
    }

    fn denormalize(record: &mut Vote, posts: &Vector<Post>) {
        record.post = posts.iter().find(|p| p.id == record.post_id).cloned();
        if record.post.is_none() {
            warn!(
                "vote references post '{}' not present in the loaded set",
                record.post_id
            );
        }
    }

    fn apply_params(record: &mut Vote, params: &VoteParams) {
        record.apply_params(params);
    }

    fn persist_guard(candidate: &Vote, existing: &[Vote]) -> Result<()> {
        let duplicate = existing.iter().any(|v| {
            v.post_id == candidate.post_id && v.author_id == candidate.author_id
        });
        if duplicate {
            return Err(crate::core::OverlayError::Conflict(
                "already voted on this post".into(),
            ));
        }
        Ok(())
    }
}
