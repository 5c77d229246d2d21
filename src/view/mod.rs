//! Debounced view session: input state in, render snapshots out.
//!
//! [`TokenizerView`] owns the editable input state and drives tokenize
//! requests through a [`TokenizeBackend`]. Edits arrive as
//! [`ViewerEvent`]s on an mpsc channel; every state change is published
//! as a [`ViewerState`] snapshot on a watch channel.
//!
//! # Dispatch model
//!
//! Edits reset a single pending deadline. When the deadline fires, the
//! most recent `(text, tokenizer)` pair is dispatched; pairs superseded
//! during the quiet period are never sent. Dispatch is skipped entirely
//! when either field is empty.
//!
//! Debouncing throttles dispatch, not delivery: requests may overlap if
//! the user keeps typing while one is in flight. Each request task sends
//! its outcome (with the text it captured at dispatch) back on a second
//! mpsc channel, and the driver applies outcomes strictly in arrival
//! order — the last response received wins, regardless of dispatch
//! order. Superseded in-flight requests are never cancelled; their
//! results are simply overwritten.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant};
use tracing::{debug, warn};

use crate::telemetry;
use crate::traits::TokenizeBackend;
use crate::types::{DisplayMode, RenderState, ResultState, Token, ViewerState};
use crate::{Result, TokenviewError};

/// Quiet period between the last edit and dispatch.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Tokenizer id used when none is configured.
pub const DEFAULT_TOKENIZER: &str = "meta-llama/Llama-2-7b-chat-hf";

/// Example text restored by [`ViewerEvent::ShowExample`].
pub const EXAMPLE_TEXT: &str = "Many words map to one token, but some don't: indivisible.\n\n\
    Unicode characters like emojis may be split into many tokens containing the underlying bytes: \u{1f91a}\u{1f3fe}\n\n\
    Sequences of characters commonly found next to each other may be grouped together: 1234567890";

/// Buffered events between UI and driver.
const EVENT_BUFFER: usize = 64;

/// Buffered request outcomes awaiting application.
const OUTCOME_BUFFER: usize = 16;

/// Configuration for a view session.
///
/// ```rust
/// # use tokenview::ViewerConfig;
/// # use std::time::Duration;
/// let config = ViewerConfig::new()
///     .quiet_period(Duration::from_millis(250))
///     .initial_text("hello");
/// ```
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Delay after the last edit before dispatch. Default: 500ms.
    pub quiet_period: Duration,
    /// Text the session starts with. Default: [`EXAMPLE_TEXT`].
    pub initial_text: String,
    /// Tokenizer id the session starts with. Default: [`DEFAULT_TOKENIZER`].
    pub initial_tokenizer: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            quiet_period: DEFAULT_QUIET_PERIOD,
            initial_text: EXAMPLE_TEXT.to_string(),
            initial_tokenizer: DEFAULT_TOKENIZER.to_string(),
        }
    }
}

impl ViewerConfig {
    /// Create a config with the defaults above.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config that starts with empty input (nothing dispatches
    /// until both fields are set).
    pub fn empty() -> Self {
        Self {
            initial_text: String::new(),
            initial_tokenizer: String::new(),
            ..Self::default()
        }
    }

    /// Set the quiet period.
    pub fn quiet_period(mut self, period: Duration) -> Self {
        self.quiet_period = period;
        self
    }

    /// Set the initial text.
    pub fn initial_text(mut self, text: impl Into<String>) -> Self {
        self.initial_text = text.into();
        self
    }

    /// Set the initial tokenizer id.
    pub fn initial_tokenizer(mut self, tokenizer: impl Into<String>) -> Self {
        self.initial_tokenizer = tokenizer.into();
        self
    }
}

/// Input events accepted by the view session.
#[derive(Debug, Clone)]
pub enum ViewerEvent {
    /// Replace the editable text (one per keystroke).
    SetText(String),
    /// Replace the tokenizer identifier.
    SetTokenizer(String),
    /// Switch display mode. Re-renders only; never dispatches.
    SetMode(DisplayMode),
    /// Clear the editable text.
    Clear,
    /// Restore [`EXAMPLE_TEXT`].
    ShowExample,
}

/// Outcome of one request, paired with the text it was dispatched for.
///
/// Carrying the text here (rather than reading live state on arrival)
/// is what keeps spans valid when input diverges mid-flight.
struct RequestOutcome {
    tokenized_text: String,
    result: Result<Vec<Token>>,
}

/// Handle to a running view session.
///
/// Cloning shares the same session. The driver task exits when every
/// handle has been dropped.
#[derive(Clone)]
pub struct TokenizerView {
    events: mpsc::Sender<ViewerEvent>,
    state: watch::Receiver<ViewerState>,
}

impl TokenizerView {
    /// Spawn a view session over the given backend.
    ///
    /// # Panics
    ///
    /// Requires a tokio runtime context (called within an async fn).
    pub fn spawn(backend: Arc<dyn TokenizeBackend>, config: ViewerConfig) -> Self {
        let initial = ViewerState {
            text: config.initial_text,
            tokenizer: config.initial_tokenizer,
            loading: false,
            render: RenderState::default(),
        };
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
        let (state_tx, state_rx) = watch::channel(initial.clone());

        let driver = Driver {
            backend,
            quiet_period: config.quiet_period,
            state: initial,
            events: event_rx,
            publish: state_tx,
        };
        tokio::spawn(driver.run());

        Self {
            events: event_tx,
            state: state_rx,
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> ViewerState {
        self.state.borrow().clone()
    }

    /// Watch receiver for observing state changes.
    pub fn watch(&self) -> watch::Receiver<ViewerState> {
        self.state.clone()
    }

    /// Send an event to the session.
    pub async fn send(&self, event: ViewerEvent) -> Result<()> {
        self.events
            .send(event)
            .await
            .map_err(|_| TokenviewError::SessionClosed)
    }

    /// Replace the editable text.
    pub async fn set_text(&self, text: impl Into<String>) -> Result<()> {
        self.send(ViewerEvent::SetText(text.into())).await
    }

    /// Replace the tokenizer identifier.
    pub async fn set_tokenizer(&self, tokenizer: impl Into<String>) -> Result<()> {
        self.send(ViewerEvent::SetTokenizer(tokenizer.into())).await
    }

    /// Switch display mode.
    pub async fn set_mode(&self, mode: DisplayMode) -> Result<()> {
        self.send(ViewerEvent::SetMode(mode)).await
    }

    /// Clear the editable text.
    pub async fn clear(&self) -> Result<()> {
        self.send(ViewerEvent::Clear).await
    }

    /// Restore the example text.
    pub async fn show_example(&self) -> Result<()> {
        self.send(ViewerEvent::ShowExample).await
    }
}

/// Driver task state. Single-threaded: all mutation happens here.
struct Driver {
    backend: Arc<dyn TokenizeBackend>,
    quiet_period: Duration,
    state: ViewerState,
    events: mpsc::Receiver<ViewerEvent>,
    publish: watch::Sender<ViewerState>,
}

impl Driver {
    async fn run(mut self) {
        let (outcome_tx, mut outcome_rx) = mpsc::channel::<RequestOutcome>(OUTCOME_BUFFER);

        // Initial tick: a non-empty initial text is tokenized without
        // requiring an edit first.
        let mut deadline: Option<Instant> = Some(Instant::now() + self.quiet_period);

        loop {
            let pending = deadline;
            let timer = async move {
                match pending {
                    Some(at) => time::sleep_until(at).await,
                    None => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                event = self.events.recv() => match event {
                    Some(event) => {
                        if self.apply_event(event) {
                            deadline = Some(Instant::now() + self.quiet_period);
                        }
                    }
                    // Every handle dropped: session over. In-flight
                    // request tasks finish on their own and find the
                    // outcome channel closed.
                    None => break,
                },
                maybe_outcome = outcome_rx.recv() => {
                    if let Some(outcome) = maybe_outcome {
                        self.apply_outcome(outcome);
                    }
                }
                () = timer => {
                    deadline = None;
                    self.dispatch(&outcome_tx);
                }
            }
        }
    }

    /// Apply an input event. Returns true when the debounce deadline
    /// should reset (i.e. the dispatchable pair changed).
    fn apply_event(&mut self, event: ViewerEvent) -> bool {
        let schedules = match event {
            ViewerEvent::SetText(text) => {
                if self.state.text == text {
                    return false;
                }
                self.state.text = text;
                true
            }
            ViewerEvent::SetTokenizer(tokenizer) => {
                if self.state.tokenizer == tokenizer {
                    return false;
                }
                self.state.tokenizer = tokenizer;
                true
            }
            ViewerEvent::SetMode(mode) => {
                self.state.render.mode = mode;
                false
            }
            ViewerEvent::Clear => {
                if self.state.text.is_empty() {
                    return false;
                }
                self.state.text.clear();
                true
            }
            ViewerEvent::ShowExample => {
                if self.state.text == EXAMPLE_TEXT {
                    return false;
                }
                self.state.text = EXAMPLE_TEXT.to_string();
                true
            }
        };
        self.publish_state();
        schedules
    }

    /// Fire the debounced dispatch with the most recent input pair.
    fn dispatch(&mut self, outcome_tx: &mpsc::Sender<RequestOutcome>) {
        if self.state.text.is_empty() || self.state.tokenizer.is_empty() {
            metrics::counter!(telemetry::DISPATCHES_SKIPPED_TOTAL).increment(1);
            debug!("empty text or tokenizer id, skipping dispatch");
            return;
        }

        self.state.loading = true;
        self.publish_state();

        let backend = Arc::clone(&self.backend);
        let text = self.state.text.clone();
        let tokenizer = self.state.tokenizer.clone();
        let tx = outcome_tx.clone();

        tokio::spawn(async move {
            let result = backend.tokenize(&text, &tokenizer).await;
            // Receiver gone means the session ended; nothing to apply.
            let _ = tx
                .send(RequestOutcome {
                    tokenized_text: text,
                    result,
                })
                .await;
        });
    }

    /// Apply a request outcome in arrival order (last response wins).
    fn apply_outcome(&mut self, outcome: RequestOutcome) {
        self.state.loading = false;
        let results = match outcome.result {
            Ok(tokens) => ResultState::Tokens(tokens),
            Err(err) => {
                warn!(error = %err, "tokenization failed");
                ResultState::Error(err.to_string())
            }
        };
        self.state.render = RenderState {
            tokenized_text: outcome.tokenized_text,
            results,
            mode: self.state.render.mode,
        };
        self.publish_state();
    }

    fn publish_state(&self) {
        self.publish.send_replace(self.state.clone());
    }
}
