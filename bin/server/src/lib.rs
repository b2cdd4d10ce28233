//! cloudbuddy HTTP API.
//!
//! A JSON API over the cloudbuddy assistant: chat, practice questions,
//! conversation history, and service listings. The binary in `main.rs`
//! wires configuration, logging, and the background session sweep around
//! the router built here.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use routes::router;
pub use state::AppState;
