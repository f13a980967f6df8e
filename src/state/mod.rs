//! Shared state handed to every request handler.

mod app_state;

pub use app_state::AppState;
