//! # Design
//!
//! - Structured, constant-message errors for label sheet validation.
//! - Capture the offending field and value so a bad stored spec is
//!   reproducible in tests without string matching.

use thiserror::Error;

/// Result type for label layout operations.
pub type LabelResult<T> = Result<T, LabelError>;

/// Errors produced while laying out mailing labels.
#[derive(Debug, Error)]
pub enum LabelError {
    /// A sheet specification failed validation.
    #[error("invalid label sheet specification")]
    InvalidSpec {
        /// Field that failed validation.
        field: &'static str,
        /// Static reason for the failure.
        reason: &'static str,
        /// Offending value when available.
        value: Option<String>,
    },
}

impl LabelError {
    pub(crate) fn invalid_spec(
        field: &'static str,
        reason: &'static str,
        value: impl ToString,
    ) -> Self {
        Self::InvalidSpec {
            field,
            reason,
            value: Some(value.to_string()),
        }
    }
}
