// ============================================================================
// Field Validation Helpers
// ============================================================================
//
// Shared checks the catalog descriptors compose into their per-entity
// `validate_params` implementations. Messages accumulate into a FieldErrors
// map; an empty map means the payload passed.
//
// ============================================================================

use lazy_static::lazy_static;
use regex::Regex;

use crate::core::FieldErrors;

lazy_static! {
    static ref SLUG_RE: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

/// Requires a non-empty value.
pub fn require_present(errors: &mut FieldErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(field, "must contain at least 1 character");
    }
}

/// Requires a non-empty lowercase kebab-case slug.
pub fn require_slug(errors: &mut FieldErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(field, "must contain at least 1 character");
    } else if !SLUG_RE.is_match(value) {
        errors.push(field, "must be lowercase kebab-case");
    }
}
