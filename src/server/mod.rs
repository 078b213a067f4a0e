//! HTTP server for the resolver
//!
//! Router setup and request handlers.

pub mod app;
pub mod handlers;

pub use app::{AppState, create_app};
