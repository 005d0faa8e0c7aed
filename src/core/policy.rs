use serde::{Deserialize, Serialize};

use crate::core::OverlayError;

/// Settlement-handling options for one mounted view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcilePolicy {
    /// Message used when a gateway failure carries no reason.
    pub fallback_message: String,
    /// Whether a confirmed delete navigates away from the record's detail
    /// path. List-mounted views have nowhere to leave and turn this off.
    pub navigate_after_delete: bool,
}

impl Default for ReconcilePolicy {
    fn default() -> Self {
        Self {
            fallback_message: OverlayError::GENERIC_FALLBACK.to_string(),
            navigate_after_delete: true,
        }
    }
}

impl ReconcilePolicy {
    /// Policy for a list-mounted view: deletes settle in place.
    pub fn list_view() -> Self {
        Self {
            navigate_after_delete: false,
            ..Self::default()
        }
    }
}
