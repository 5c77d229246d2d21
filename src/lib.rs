//! Tokenview - Debounced client and span renderer for remote tokenization services
//!
//! This crate is the core of a tokenizer visualizer: editable text and a
//! tokenizer id go in, a debounced request goes out to a remote
//! tokenization service, and the returned tokens come back as colored
//! spans mapped onto the exact text that was tokenized.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tokenview::{render, TokenizerClient, TokenizerView, ViewerConfig};
//!
//! #[tokio::main]
//! async fn main() -> tokenview::Result<()> {
//!     let backend = Arc::new(TokenizerClient::new());
//!     let view = TokenizerView::spawn(backend, ViewerConfig::new());
//!
//!     view.set_text("The cat sat on the mat.").await?;
//!
//!     let mut states = view.watch();
//!     loop {
//!         states.changed().await.map_err(|_| tokenview::TokenviewError::SessionClosed)?;
//!         let state = states.borrow_and_update().clone();
//!         if !state.loading && state.render.token_count() > 0 {
//!             println!("{:?}", render::render(&state.render));
//!             break;
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Concurrency model
//!
//! Debouncing throttles dispatch, not delivery: requests may overlap,
//! and the last response *received* wins. Spans are always interpreted
//! against the text captured when their request was dispatched, never
//! against the live input.

pub mod client;
pub mod error;
pub mod render;
pub mod telemetry;
pub mod traits;
pub mod types;
pub mod view;

// Re-export main types at crate root
pub use client::{TokenizerClient, DEFAULT_BASE_URL};
pub use error::{Result, TokenviewError};
pub use traits::TokenizeBackend;
pub use view::{
    TokenizerView, ViewerConfig, ViewerEvent, DEFAULT_QUIET_PERIOD, DEFAULT_TOKENIZER,
    EXAMPLE_TEXT,
};

// Re-export all types
pub use types::{DisplayMode, RenderState, ResultState, Token, ViewerState};
