// ============================================================================
// View Workbench
// ============================================================================
//
// The mounted-view aggregate: one overlay, one dispatcher, one collaborator
// set, wired the way a list page mounts the pattern. Mounting fetches the
// authoritative list and parent set, seeds the overlay, and builds the
// refresh capability handed to the reconciler.
//
// ============================================================================

use im::Vector;
use std::sync::Arc;

use crate::core::{ReconcilePolicy, RecordId, Result};
use crate::entity::{EntityDescriptor, EntityRecord};
use crate::overlay::{DetailCell, OverlayCell, OverlayHandle};
use crate::runtime::{
    AuthoritativeSource, MutationDispatcher, Reconciler, RefreshFn, ServerActionGateway,
    Settlement, SubmitMode,
};
use crate::surface::{ModalSurface, Navigator, Notifier};

/// One mounted list view over an entity.
///
/// # Examples
///
/// ```
/// use rustoverlay::backend::InMemoryBackend;
/// use rustoverlay::core::ReconcilePolicy;
/// use rustoverlay::entity::catalog::{Topic, TopicEntity, TopicParams};
/// use rustoverlay::surface::{RecordingModal, RecordingNavigator, RecordingNotifier};
/// use rustoverlay::workbench::ViewWorkbench;
/// use std::sync::Arc;
///
/// # tokio_test::block_on(async {
/// let backend = InMemoryBackend::new();
/// backend
///     .sign_up("alice@example.com", Some("Alice"), "password123")
///     .await?;
///
/// let stack = backend.topic_stack();
/// let workbench = ViewWorkbench::<TopicEntity>::mount(
///     stack.source.clone(),
///     stack.gateway.clone(),
///     Arc::new(RecordingModal::<Topic>::new()),
///     Arc::new(RecordingNotifier::new()),
///     Arc::new(RecordingNavigator::new()),
///     ReconcilePolicy::default(),
/// )
/// .await?;
///
/// let settlement = workbench
///     .submit(
///         TopicParams { name: "Rust".into(), slug: "rust".into() },
///         None,
///     )
///     .await?;
/// assert!(settlement.is_confirmed());
/// # Ok::<(), rustoverlay::core::OverlayError>(())
/// # })
/// # .unwrap();
/// ```
pub struct ViewWorkbench<D: EntityDescriptor> {
    overlay: OverlayHandle<D>,
    dispatcher: MutationDispatcher<D>,
    source: Arc<dyn AuthoritativeSource<D>>,
    modal: Arc<dyn ModalSurface<D::Record>>,
}

impl<D: EntityDescriptor> ViewWorkbench<D> {
    /// Mounts the view: fetches the authoritative list and parent set,
    /// seeds the overlay with them, and wires the dispatcher and
    /// reconciler to the given collaborators.
    ///
    /// # Errors
    /// Propagates fetch failures, including `OverlayError::Unauthenticated`
    /// when nobody is signed in.
    pub async fn mount(
        source: Arc<dyn AuthoritativeSource<D>>,
        gateway: Arc<dyn ServerActionGateway<D>>,
        modal: Arc<dyn ModalSurface<D::Record>>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        policy: ReconcilePolicy,
    ) -> Result<Self> {
        let list = source.fetch_list().await?;
        let parents = source.fetch_parents().await?;
        let overlay = OverlayHandle::new(OverlayCell::<D>::seeded(list, parents));

        let refresh: RefreshFn = {
            let overlay = overlay.clone();
            let source = source.clone();
            Arc::new(move || {
                let overlay = overlay.clone();
                let source = source.clone();
                Box::pin(async move {
                    let list = source.fetch_list().await?;
                    let parents = source.fetch_parents().await?;
                    overlay.reseed_with_parents(list, parents).await;
                    Ok(())
                })
            })
        };

        let reconciler = Reconciler::new(
            refresh,
            notifier,
            modal.clone(),
            navigator,
            policy,
        );
        let dispatcher =
            MutationDispatcher::new(overlay.clone(), gateway, modal.clone(), reconciler);

        Ok(ViewWorkbench {
            overlay,
            dispatcher,
            source,
            modal,
        })
    }

    /// Submits form parameters. Update when `existing` carries a persisted
    /// identifier, create otherwise.
    pub async fn submit(
        &self,
        params: D::Params,
        existing: Option<D::Record>,
    ) -> Result<Settlement<D::Record>> {
        let mode = SubmitMode::for_record(existing.as_ref());
        self.dispatcher.submit(params, mode, existing).await
    }

    /// Marks a record as deleting and asks the gateway to remove it.
    pub async fn request_delete(&self, record: D::Record) -> Result<Settlement<D::Record>> {
        self.dispatcher.request_delete(record).await
    }

    /// The list the view renders right now, pending rows included.
    pub async fn list(&self) -> Vector<D::Record> {
        self.overlay.list().await
    }

    pub async fn pending_count(&self) -> usize {
        self.overlay.pending_count().await
    }

    pub fn overlay(&self) -> &OverlayHandle<D> {
        &self.overlay
    }

    /// Re-fetches authoritative data and reseeds the overlay. The same
    /// operation the reconciler runs after a confirmed mutation.
    pub async fn refresh(&self) -> Result<()> {
        let list = self.source.fetch_list().await?;
        let parents = self.source.fetch_parents().await?;
        self.overlay.reseed_with_parents(list, parents).await;
        Ok(())
    }

    pub fn open_modal(&self, prefill: Option<D::Record>) {
        self.modal.open(prefill);
    }

    pub fn close_modal(&self) {
        self.modal.close();
    }

    /// A single-record optimistic cell for the record's detail view, seeded
    /// from the current overlay. `None` when the id is not in the list.
    pub async fn detail_of(&self, id: &RecordId) -> Option<DetailCell<D::Record>> {
        self.list()
            .await
            .iter()
            .find(|record| record.id() == id)
            .cloned()
            .map(DetailCell::new)
    }
}
