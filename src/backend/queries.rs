// ============================================================================
// Authoritative fetch. Owner-scoped, relation-joined lists served through a
// path-keyed cache; the gateway invalidates the path on every mutation, so
// a fetch after a confirmed mutation always reflects the store.
// ============================================================================

use async_trait::async_trait;
use im::Vector;
use log::debug;
use std::sync::Arc;

use super::cache::ListCache;
use super::store::TableHandle;
use crate::core::{RecordId, Result};
use crate::entity::{EntityDescriptor, EntityRecord};
use crate::runtime::{AuthoritativeSource, SessionProvider};

/// Where an entity's parent collection comes from.
#[async_trait]
pub trait ParentSource<D: EntityDescriptor>: Send + Sync {
    async fn load(&self) -> Result<D::ParentSet>;
}

/// Parent source for top-level entities. There is nothing to load.
pub struct NoParents;

#[async_trait]
impl<D: EntityDescriptor<ParentSet = ()>> ParentSource<D> for NoParents {
    async fn load(&self) -> Result<()> {
        Ok(())
    }
}

/// Parent source backed by another entity's table. The full parent list is
/// loaded; denormalization scans it by foreign key.
pub struct TableParents<P: EntityRecord> {
    table: TableHandle<P>,
}

impl<P: EntityRecord> TableParents<P> {
    pub fn new(table: TableHandle<P>) -> Self {
        TableParents { table }
    }
}

#[async_trait]
impl<D, P> ParentSource<D> for TableParents<P>
where
    D: EntityDescriptor<ParentSet = Vector<P>>,
    P: EntityRecord,
{
    async fn load(&self) -> Result<Vector<P>> {
        Ok(self.table.read().await.list())
    }
}

/// [`AuthoritativeSource`] over an in-memory table: filters rows to the
/// session owner, joins the parent relation, and caches the result under
/// the collection path until a mutation invalidates it.
pub struct StoreSource<D: EntityDescriptor> {
    table: TableHandle<D::Record>,
    parents: Arc<dyn ParentSource<D>>,
    sessions: Arc<dyn SessionProvider>,
    cache: Arc<ListCache<D::Record>>,
}

impl<D: EntityDescriptor> StoreSource<D> {
    pub fn new(
        table: TableHandle<D::Record>,
        parents: Arc<dyn ParentSource<D>>,
        sessions: Arc<dyn SessionProvider>,
        cache: Arc<ListCache<D::Record>>,
    ) -> Self {
        StoreSource {
            table,
            parents,
            sessions,
            cache,
        }
    }

    fn cache_key(owner: &RecordId) -> String {
        format!("{}?owner={}", D::COLLECTION_PATH, owner)
    }
}

#[async_trait]
impl<D: EntityDescriptor> AuthoritativeSource<D> for StoreSource<D> {
    async fn fetch_list(&self) -> Result<Vector<D::Record>> {
        let session = self.sessions.current_session().await?;
        let owner = session.user.id;
        let key = Self::cache_key(&owner);

        if let Some(hit) = self.cache.get(&key) {
            debug!("{} list served from cache", D::ENTITY_NAME);
            return Ok(hit);
        }

        let parents = self.parents.load().await?;
        let rows = self.table.read().await.list();
        let mut list = Vector::new();
        for mut record in rows {
            if record.owner_id() == Some(&owner) {
                D::denormalize(&mut record, &parents);
                list.push_back(record);
            }
        }
        debug!(
            "{} list fetched from store: {} row(s)",
            D::ENTITY_NAME,
            list.len()
        );
        self.cache.put(key, list.clone());
        Ok(list)
    }

    async fn fetch_parents(&self) -> Result<D::ParentSet> {
        self.parents.load().await
    }
}
