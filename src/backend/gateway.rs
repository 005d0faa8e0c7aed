// ============================================================================
// Server Action Gateway over the in-memory store. Each call re-validates
// the payload, resolves the session owner, persists, and invalidates the
// collection's cached fetch path. Failures are reported as outcome values
// carrying the user-facing message, never as panics or transport errors.
// ============================================================================

use async_trait::async_trait;
use chrono::Utc;
use log::warn;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::cache::ListCache;
use super::store::TableHandle;
use crate::core::{OverlayError, RecordId, Result};
use crate::entity::{EntityDescriptor, EntityRecord};
use crate::runtime::{ActionOutcome, ServerActionGateway, SessionProvider};

/// Scripted failures for tests and the demo: each armed message fails one
/// call, in order, before the store is touched.
#[derive(Default)]
pub struct FaultPlan {
    queued: Mutex<VecDeque<String>>,
}

impl FaultPlan {
    pub fn fail_next(&self, message: impl Into<String>) {
        self.queued
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(message.into());
    }

    fn take(&self) -> Option<String> {
        self.queued
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
    }
}

/// In-memory [`ServerActionGateway`] for one entity.
pub struct InMemoryGateway<D: EntityDescriptor> {
    table: TableHandle<D::Record>,
    sessions: Arc<dyn SessionProvider>,
    cache: Arc<ListCache<D::Record>>,
    faults: FaultPlan,
    latency: Mutex<Option<Duration>>,
}

impl<D: EntityDescriptor> InMemoryGateway<D> {
    pub fn new(
        table: TableHandle<D::Record>,
        sessions: Arc<dyn SessionProvider>,
        cache: Arc<ListCache<D::Record>>,
    ) -> Self {
        InMemoryGateway {
            table,
            sessions,
            cache,
            faults: FaultPlan::default(),
            latency: Mutex::new(None),
        }
    }

    /// Arms one scripted failure for the next call.
    pub fn fail_next(&self, message: impl Into<String>) {
        self.faults.fail_next(message);
    }

    /// Adds an artificial delay before each call settles, to make the
    /// optimistic window observable in the demo.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap_or_else(|e| e.into_inner()) = Some(latency);
    }

    async fn pause(&self) {
        let latency = *self.latency.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }

    async fn owner(&self) -> Result<RecordId> {
        Ok(self.sessions.current_session().await?.user.id)
    }

    fn settle(action: &str, result: Result<()>) -> ActionOutcome {
        match result {
            Ok(()) => ActionOutcome::Confirmed,
            Err(err) => {
                warn!("{} {} rejected: {}", D::ENTITY_NAME, action, err);
                ActionOutcome::failed(err.gateway_message())
            }
        }
    }

    async fn try_create(&self, params: D::Params) -> Result<()> {
        D::validate_params(&params)?;
        let owner = self.owner().await?;
        let now = Utc::now();

        let mut record = D::provisional(&params, None, now);
        record.set_owner(owner);
        record.stamp_created(now);
        record.stamp_updated(now);

        let mut table = self.table.write().await;
        let existing: Vec<D::Record> = table.list().into_iter().collect();
        D::persist_guard(&record, &existing)?;
        table.insert(record);
        drop(table);

        self.cache.invalidate_path(D::COLLECTION_PATH);
        Ok(())
    }

    async fn try_update(&self, id: RecordId, params: D::Params) -> Result<()> {
        D::validate_params(&params)?;
        let owner = self.owner().await?;
        let now = Utc::now();

        let mut table = self.table.write().await;
        let mut updated = table
            .get_scoped(&id, &owner)
            .cloned()
            .ok_or_else(|| OverlayError::NotFound(id.to_string()))?;
        D::apply_params(&mut updated, &params);
        updated.stamp_updated(now);

        let others: Vec<D::Record> = table
            .list()
            .into_iter()
            .filter(|record| record.id() != &id)
            .collect();
        D::persist_guard(&updated, &others)?;
        table.replace_scoped(&id, &owner, updated)?;
        drop(table);

        self.cache.invalidate_path(D::COLLECTION_PATH);
        Ok(())
    }

    async fn try_delete(&self, id: RecordId) -> Result<()> {
        let owner = self.owner().await?;

        let mut table = self.table.write().await;
        table.remove_scoped(&id, &owner)?;
        drop(table);

        self.cache.invalidate_path(D::COLLECTION_PATH);
        Ok(())
    }
}

#[async_trait]
impl<D: EntityDescriptor> ServerActionGateway<D> for InMemoryGateway<D> {
    async fn create(&self, params: D::Params) -> ActionOutcome {
        self.pause().await;
        if let Some(reason) = self.faults.take() {
            return ActionOutcome::failed(reason);
        }
        Self::settle("create", self.try_create(params).await)
    }

    async fn update(&self, id: RecordId, params: D::Params) -> ActionOutcome {
        self.pause().await;
        if let Some(reason) = self.faults.take() {
            return ActionOutcome::failed(reason);
        }
        Self::settle("update", self.try_update(id, params).await)
    }

    async fn delete(&self, id: RecordId) -> ActionOutcome {
        self.pause().await;
        if let Some(reason) = self.faults.take() {
            return ActionOutcome::failed(reason);
        }
        Self::settle("delete", self.try_delete(id).await)
    }
}
