//! Fake collaborators for exercising the dispatcher without real delivery.

use async_trait::async_trait;
use letterpress_dispatch::{OutboundMessage, Transport, TransportError};
use std::collections::HashSet;
use std::sync::Mutex;

/// Transport that records every delivered message in memory.
///
/// Destinations registered through [`fail_destination`](Self::fail_destination)
/// return an injected delivery error instead of being recorded, which lets
/// tests prove that one bad row never aborts a batch.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<OutboundMessage>>,
    failing: Mutex<HashSet<String>>,
}

impl RecordingTransport {
    /// Fresh transport with no recorded messages and no failures.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inject a delivery failure for the given destination address.
    ///
    /// # Panics
    ///
    /// Panics if the failure set mutex has been poisoned.
    pub fn fail_destination(&self, address: impl Into<String>) {
        self.failing
            .lock()
            .expect("failure set mutex poisoned")
            .insert(address.into());
    }

    /// Snapshot of the messages delivered so far, in delivery order.
    ///
    /// # Panics
    ///
    /// Panics if the sent-message mutex has been poisoned.
    #[must_use]
    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent
            .lock()
            .expect("sent message mutex poisoned")
            .clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn deliver(&self, message: &OutboundMessage) -> Result<(), TransportError> {
        let failing = self
            .failing
            .lock()
            .expect("failure set mutex poisoned")
            .contains(&message.to);
        if failing {
            return Err(TransportError::delivery("deliver", "injected failure"));
        }
        self.sent
            .lock()
            .expect("sent message mutex poisoned")
            .push(message.clone());
        Ok(())
    }
}
