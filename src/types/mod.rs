//! Public types for the tokenview API.

mod state;
mod token;

pub use state::{DisplayMode, RenderState, ResultState, ViewerState};
pub use token::Token;
