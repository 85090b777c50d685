//! Cross-cutting error types for Expensa.
//!
//! This module defines errors that can originate from any crate in the system.
//! Storage and upload errors (`StoreError`, `UploadError`) are defined in
//! `expensa-db`, which folds them together with these into `ServiceError`.

use thiserror::Error;

/// Errors that can be raised by any Expensa crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// The requested status is not reachable from the current one for the
    /// acting role. No mutation has happened.
    #[error(
        "Cannot move {entity_type} {id} from '{from}' to '{to}': not allowed for the {tier} role"
    )]
    IllegalTransition {
        entity_type: String,
        id: String,
        from: String,
        to: String,
        tier: String,
    },

    /// Data failed validation (schema, format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),
}

impl CoreError {
    #[must_use]
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn illegal_transition_message_is_user_facing() {
        let err = CoreError::IllegalTransition {
            entity_type: "funding_request".into(),
            id: "fr-1".into(),
            from: "pending".into(),
            to: "paid".into(),
            tier: "admin".into(),
        };
        assert_eq!(
            err.to_string(),
            "Cannot move funding_request fr-1 from 'pending' to 'paid': not allowed for the admin role"
        );
    }
}
