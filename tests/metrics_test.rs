//! Tests for metrics integration.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

use tokenview::{
    telemetry, Result, Token, TokenizeBackend, TokenizerClient, TokenizerView, ViewerConfig,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Mock backend
// ============================================================================

/// Backend that always succeeds with no tokens. The skipped-dispatch
/// test never expects it to be called at all.
struct NullBackend;

#[async_trait]
impl TokenizeBackend for NullBackend {
    fn name(&self) -> &str {
        "null"
    }

    async fn tokenize(&self, _text: &str, _tokenizer: &str) -> Result<Vec<Token>> {
        Ok(vec![])
    }
}

// ============================================================================
// Snapshot type alias for readability
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

// ============================================================================
// Helpers
// ============================================================================

/// Sum all counter values matching a given metric name.
fn counter_total(snapshot: &SnapshotVec, name: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Sum counter values matching a metric name and a label pair.
fn counter_with_label(snapshot: &SnapshotVec, name: &str, label: &str, value: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| {
            key.kind() == MetricKind::Counter
                && key.key().name() == name
                && key
                    .key()
                    .labels()
                    .any(|l| l.key() == label && l.value() == value)
        })
        .map(|(_, _, _, v)| match v {
            DebugValue::Counter(count) => *count,
            _ => 0,
        })
        .sum()
}

/// Check if any histogram entries exist for a given metric name.
fn has_histogram(snapshot: &SnapshotVec, name: &str) -> bool {
    snapshot
        .iter()
        .any(|(key, _, _, _)| key.kind() == MetricKind::Histogram && key.key().name() == name)
}

// ============================================================================
// Tests
// ============================================================================

/// Runs async code within a local recorder scope on the multi-thread runtime.
///
/// `block_in_place` ensures the sync `with_local_recorder` closure stays
/// on the current thread while `block_on` drives the inner async work.
#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn successful_request_records_metrics() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let result = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let mock_server = MockServer::start().await;
                Mock::given(method("POST"))
                    .and(path("/tokenize"))
                    .respond_with(
                        ResponseTemplate::new(200)
                            .set_body_json(serde_json::json!([[1, [0, 3]]])),
                    )
                    .mount(&mock_server)
                    .await;

                let client = TokenizerClient::with_base_url(mock_server.uri());
                client.tokenize("cat", "gpt2").await
            })
        })
    });
    assert!(result.is_ok());

    let snapshot = snapshotter.snapshot().into_vec();

    let count = counter_with_label(&snapshot, telemetry::REQUESTS_TOTAL, "status", "ok");
    assert_eq!(count, 1, "expected 1 ok request counter");

    assert!(
        has_histogram(&snapshot, telemetry::REQUEST_DURATION_SECONDS),
        "expected a duration histogram entry"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn failed_request_records_error_metrics() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let _result = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let mock_server = MockServer::start().await;
                Mock::given(method("POST"))
                    .and(path("/tokenize"))
                    .respond_with(
                        ResponseTemplate::new(200)
                            .set_body_json(serde_json::json!({"error": "unknown tokenizer"})),
                    )
                    .mount(&mock_server)
                    .await;

                let client = TokenizerClient::with_base_url(mock_server.uri());
                client.tokenize("cat", "gpt2").await
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();

    let count = counter_with_label(&snapshot, telemetry::REQUESTS_TOTAL, "status", "error");
    assert_eq!(count, 1, "expected 1 error request counter");
    assert_eq!(counter_total(&snapshot, telemetry::REQUESTS_TOTAL), 1);
}

/// The skip counter is emitted by the view driver task, so the runtime
/// is built *inside* the local recorder scope as a current-thread
/// runtime: every task, the driver included, then runs on the thread
/// the recorder is installed on.
#[test]
fn skipped_dispatch_records_counter() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()
            .expect("failed to build runtime");
        rt.block_on(async {
            let view = TokenizerView::spawn(Arc::new(NullBackend), ViewerConfig::empty());
            // Let the initial debounce tick fire with empty input.
            tokio::time::sleep(Duration::from_secs(2)).await;
            drop(view);
        });
    });

    let snapshot = snapshotter.snapshot().into_vec();

    let skipped = counter_total(&snapshot, telemetry::DISPATCHES_SKIPPED_TOTAL);
    assert_eq!(skipped, 1, "expected the empty-input tick to be skipped once");
    assert_eq!(
        counter_total(&snapshot, telemetry::REQUESTS_TOTAL),
        0,
        "no request may be dispatched for empty input"
    );
}

#[tokio::test]
async fn metrics_are_noop_without_recorder() {
    // Verify no panics when no recorder is installed.
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tokenize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let client = TokenizerClient::with_base_url(mock_server.uri());
    let _tokens = client.tokenize("cat", "gpt2").await.unwrap();
}
