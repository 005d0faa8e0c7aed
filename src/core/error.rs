use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OverlayError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Gateway error: {0}")]
    Gateway(String),

    #[error("No active session")]
    Unauthenticated,

    #[error("Record '{0}' not found")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, OverlayError>;

impl OverlayError {
    /// Message shown to the user when the server reports no reason.
    pub const GENERIC_FALLBACK: &'static str = "Error, please try again.";

    /// Collapses any error into the string a gateway reports to the client.
    /// Validation and conflict messages pass through; everything else is
    /// replaced by the generic fallback so internals never leak.
    pub fn gateway_message(&self) -> String {
        match self {
            OverlayError::Validation(errors) => errors.to_string(),
            OverlayError::Conflict(msg) => msg.clone(),
            OverlayError::Gateway(msg) => msg.clone(),
            _ => Self::GENERIC_FALLBACK.to_string(),
        }
    }
}

/// Per-field validation messages, keyed by field name.
///
/// Ordered so rendering and assertions are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one message against a field.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Messages recorded for one field, if any.
    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }

    /// Finish a validation pass: empty map is success, otherwise the
    /// collected messages become the error.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(OverlayError::Validation(self))
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}
