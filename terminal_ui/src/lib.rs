//! Terminal client for a `/tarefas` REST store.
//!
//! [`sync::SyncState`] keeps the local projection of the remote collection,
//! [`app::App`] holds the view state around it and [`terminal::run`] wires both
//! to crossterm events and the HTTP client.

pub mod api;
pub mod app;
pub mod cli;
pub mod error;
pub mod executor;
pub mod logging;
pub mod script;
pub mod sync;
pub mod terminal;
pub mod ui;

pub use error::{ApiError, Error, Result};
