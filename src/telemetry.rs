//! Telemetry metric name constants.
//!
//! Centralised metric names for tokenview operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `tokenview_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `backend` — backend name (e.g. "remote")
//! - `status` — outcome: "ok" or "error"

/// Total tokenize requests dispatched after debounce.
///
/// Labels: `backend`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "tokenview_requests_total";

/// Tokenize request duration in seconds.
///
/// Labels: `backend`.
pub const REQUEST_DURATION_SECONDS: &str = "tokenview_request_duration_seconds";

/// Total debounce ticks that fired with empty text or tokenizer id
/// and were skipped without dispatching.
pub const DISPATCHES_SKIPPED_TOTAL: &str = "tokenview_dispatches_skipped_total";
