pub mod envelope;
pub mod error;
pub mod id;
pub mod policy;

pub use envelope::{MutationEnvelope, MutationKind};
pub use error::{FieldErrors, OverlayError, Result};
pub use id::RecordId;
pub use policy::ReconcilePolicy;
