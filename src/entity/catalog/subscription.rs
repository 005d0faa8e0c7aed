use chrono::{DateTime, Utc};
use im::Vector;
use log::warn;
use serde::{Deserialize, Serialize};

use super::topic::Topic;
use crate::core::{FieldErrors, RecordId, Result};
use crate::entity::contracts::EntityDescriptor;
use crate::entity::validate::require_present;
use crate::entity_record;

/// A user's subscription to a topic. The owner column is `user_id` here,
/// unlike the authored entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: RecordId,
    pub name: Option<String>,
    pub topic_id: RecordId,
    pub user_id: RecordId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Parent topic attached by foreign-key lookup.
    pub topic: Option<Topic>,
}

entity_record!(Subscription, owner = user_id, timestamps);

/// Form parameters for creating or editing a subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionParams {
    pub name: Option<String>,
    pub topic_id: RecordId,
}

impl Subscription {
    pub fn apply_params(&mut self, params: &SubscriptionParams) {
        self.name = params.name.clone();
        self.topic_id = params.topic_id.clone();
    }
}

/// Descriptor marker for the subscription entity.
pub enum SubscriptionEntity {}

impl EntityDescriptor for SubscriptionEntity {
    type Record = Subscription;
    type Params = SubscriptionParams;
    type ParentSet = Vector<Topic>;

    const ENTITY_NAME: &'static str = "Subscription";
    const COLLECTION_PATH: &'static str = "/subscriptions";

    fn validate_params(params: &SubscriptionParams) -> Result<()> {
        let mut errors = FieldErrors::new();
        require_present(&mut errors, "topic_id", params.topic_id.as_str());
        errors.into_result()
    }

    fn provisional(
        params: &SubscriptionParams,
        existing: Option<&Subscription>,
        now: DateTime<Utc>,
    ) -> Subscription {
        let mut record = Subscription {
            id: existing
                .map(|s| s.id.clone())
                .unwrap_or_else(RecordId::unassigned),
            name: params.name.clone(),
            topic_id: params.topic_id.clone(),
            user_id: existing
                .map(|s| s.user_id.clone())
                .unwrap_or_else(RecordId::unassigned),
            created_at: existing.map(|s| s.created_at).unwrap_or(now),
            updated_at: existing.map(|s| s.updated_at).unwrap_or(now),
            topic: None,
        };
        // An unset optional field keeps the value already on the record, so
        // the optimistic row never regresses to empty.
        if record.name.is_none() {
            record.name = existing.and_then(|s| s.name.clone());
        }
        record
    }

    fn denormalize(record: &mut Subscription, topics: &Vector<Topic>) {
        record.topic = topics.iter().find(|t| t.id == record.topic_id).cloned();
        if record.topic.is_none() {
            warn!(
                "subscription references topic '{}' not present in the loaded set",
                record.topic_id
            );
        }
    }

    fn apply_params(record: &mut Subscription, params: &SubscriptionParams) {
        record.apply_params(params);
    }
}
