#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Bulk mail-merge dispatch: applies tag substitution once per row and hands
//! each message to an external transport, decoupled from the caller.
//!
//! # Design
//! - Fire and forget: the batch runs in one detached task, rows strictly in
//!   order, at most one delivery attempt per row. No retry, no backpressure,
//!   no per-row result reporting; a failed row is logged and the batch moves
//!   on. Callers needing stronger guarantees must wrap the transport.
//! - The transport is a trait seam; this crate performs no network IO.

use async_trait::async_trait;
use letterpress_merge::{TagContext, TagDelimiters, substitute_tags};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub mod error;

pub use error::TransportError;

/// Context field holding each row's destination address.
pub const DESTINATION_FIELD: &str = "EMAILADDRESS";

/// A fully substituted message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Destination address taken from the row context.
    pub to: String,
    /// Subject line after tag substitution.
    pub subject: String,
    /// Message body after tag substitution.
    pub body: String,
}

/// Delivery collaborator, e.g. an SMTP client, outside this crate's scope.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver one message.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the message cannot be handed over;
    /// the dispatcher logs the failure and continues with the next row.
    async fn deliver(&self, message: &OutboundMessage) -> Result<(), TransportError>;
}

/// Substitute and deliver one message per row, detached from the caller.
///
/// Subject and body templates use literal `<<`/`>>` delimiters with no
/// escaping. Rows whose [`DESTINATION_FIELD`] is absent, `null`, or blank
/// are skipped. The call returns as soon as the batch task is scheduled; the
/// returned handle resolves when the batch finishes and exists only so tests
/// can await completion. Per-row outcomes are never reported and dropping
/// the handle does not cancel the batch.
pub fn dispatch_bulk(
    subject: &str,
    body: &str,
    rows: Vec<TagContext>,
    transport: Arc<dyn Transport>,
) -> JoinHandle<()> {
    let subject = subject.to_owned();
    let body = body.to_owned();
    tokio::spawn(async move {
        let delimiters = TagDelimiters::literal();
        for row in rows {
            let destination = row
                .resolve(DESTINATION_FIELD)
                .filter(|address| !address.trim().is_empty());
            let Some(to) = destination else {
                continue;
            };
            let message = OutboundMessage {
                to,
                subject: substitute_tags(&subject, &row, false, &delimiters),
                body: substitute_tags(&body, &row, false, &delimiters),
            };
            debug!(to = %message.to, subject = %message.subject, "sending bulk message");
            if let Err(error) = transport.deliver(&message).await {
                warn!(error = %error, to = %message.to, "bulk message delivery failed");
            }
        }
    })
}
