use async_trait::async_trait;
use letterpress_dispatch::{
    DESTINATION_FIELD, OutboundMessage, Transport, TransportError, dispatch_bulk,
};
use letterpress_merge::TagContext;
use letterpress_test_support::fixtures;
use letterpress_test_support::mocks::RecordingTransport;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Semaphore;

#[tokio::test]
async fn substitutes_each_row_and_delivers_in_order() {
    let transport = Arc::new(RecordingTransport::new());
    let handle = dispatch_bulk(
        "Re: <<REFERENCE>>",
        "Dear <<NAME>>,\nYour reference is <<REFERENCE>>.",
        fixtures::mail_rows(3),
        transport.clone(),
    );
    handle.await.expect("batch task panicked");

    let sent = transport.sent();
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[0].to, "person1@example.org");
    assert_eq!(sent[0].subject, "Re: REF-0001");
    assert_eq!(sent[1].to, "person2@example.org");
    assert_eq!(sent[2].body, "Dear Person 3,\nYour reference is REF-0003.");
}

#[tokio::test]
async fn rows_without_a_destination_are_skipped() {
    let transport = Arc::new(RecordingTransport::new());
    let rows = vec![
        TagContext::new().with("NAME", "No Address"),
        TagContext::new()
            .with(DESTINATION_FIELD, "   ")
            .with("NAME", "Blank Address"),
        TagContext::new()
            .with(DESTINATION_FIELD, Value::Null)
            .with("NAME", "Null Address"),
        TagContext::new()
            .with(DESTINATION_FIELD, "kept@example.org")
            .with("NAME", "Kept"),
    ];
    let handle = dispatch_bulk("Hello <<NAME>>", "body", rows, transport.clone());
    handle.await.expect("batch task panicked");

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "kept@example.org");
    assert_eq!(sent[0].subject, "Hello Kept");
}

#[tokio::test]
async fn a_failing_row_never_aborts_the_batch() {
    let transport = Arc::new(RecordingTransport::new());
    transport.fail_destination("person2@example.org");
    let handle = dispatch_bulk(
        "subject",
        "body for <<NAME>>",
        fixtures::mail_rows(3),
        transport.clone(),
    );
    handle.await.expect("batch task panicked");

    // Row 2 fails, is not retried, and rows 1 and 3 still deliver.
    let delivered: Vec<String> = transport.sent().into_iter().map(|m| m.to).collect();
    assert_eq!(delivered, ["person1@example.org", "person3@example.org"]);
}

#[tokio::test]
async fn no_escaping_is_applied_to_bulk_substitutions() {
    let transport = Arc::new(RecordingTransport::new());
    let rows = vec![
        TagContext::new()
            .with(DESTINATION_FIELD, "markup@example.org")
            .with("NAME", "<b>Bob & Co</b>"),
    ];
    let handle = dispatch_bulk("<<NAME>>", "<<NAME>>", rows, transport.clone());
    handle.await.expect("batch task panicked");

    assert_eq!(transport.sent()[0].subject, "<b>Bob & Co</b>");
}

/// Transport that blocks every delivery until a permit is released.
struct GatedTransport {
    gate: Semaphore,
    inner: RecordingTransport,
}

#[async_trait]
impl Transport for GatedTransport {
    async fn deliver(&self, message: &OutboundMessage) -> Result<(), TransportError> {
        self.gate
            .acquire()
            .await
            .expect("gate closed unexpectedly")
            .forget();
        self.inner.deliver(message).await
    }
}

#[tokio::test]
async fn dispatch_returns_before_any_delivery_happens() {
    let transport = Arc::new(GatedTransport {
        gate: Semaphore::new(0),
        inner: RecordingTransport::new(),
    });
    let handle = dispatch_bulk("s", "b", fixtures::mail_rows(1), transport.clone());

    // The call has already returned while the only delivery is still gated.
    assert!(transport.inner.sent().is_empty());

    transport.gate.add_permits(1);
    handle.await.expect("batch task panicked");
    assert_eq!(transport.inner.sent().len(), 1);
}
