//! # Design
//!
//! - Structured, constant-message errors for the transport seam.
//! - The dispatcher logs and swallows these; they exist so transport
//!   implementations can report failures without panicking.

use thiserror::Error;

/// Errors surfaced by a [`Transport`](crate::Transport) implementation.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The transport failed to hand the message to its delivery channel.
    #[error("transport delivery failure")]
    Delivery {
        /// Static description of the failing operation.
        operation: &'static str,
        /// Transport-specific detail, e.g. an SMTP response line.
        detail: String,
    },
}

impl TransportError {
    /// Build a delivery failure with the given operation and detail.
    #[must_use]
    pub fn delivery(operation: &'static str, detail: impl Into<String>) -> Self {
        Self::Delivery {
            operation,
            detail: detail.into(),
        }
    }
}
