// ============================================================================
// View Surfaces
// ============================================================================
//
// The synchronous UI touchpoints the dispatcher and reconciler drive: the
// modal/edit surface, user notifications, and navigation. The overlay core
// only knows these traits; the recording implementations double as test
// doubles and as the demo binary's console surfaces.
//
// ============================================================================

pub mod recording;

pub use recording::{ModalCall, Notice, NoticeKind, RecordingModal, RecordingNavigator, RecordingNotifier};

/// The modal/edit surface for one entity's form.
pub trait ModalSurface<R>: Send + Sync {
    /// Opens the form, optionally pre-filled with a record's values.
    fn open(&self, prefill: Option<R>);
    /// Closes the form.
    fn close(&self);
}

/// User-facing notifications. Every settled mutation emits exactly one.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn failure(&self, message: &str, detail: &str);
}

/// Navigation after a confirmed delete moves the user off the removed
/// record's detail view.
pub trait Navigator: Send + Sync {
    fn push(&self, path: &str);
}
