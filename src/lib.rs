//! sessreg library — registry service for distributed election sessions.
//!
//! This crate tracks metadata for ongoing election sessions: a 6-character
//! identifier, the leader node's address and port, and the set of election
//! options. The registry records where a leader can be reached; it does not
//! participate in the election protocol itself.
//!
//! Persistence is a directory of JSON files, one per session, owned
//! exclusively by [`store::FileStore`].

use std::sync::Arc;

pub mod config;
pub mod errors;
pub mod handlers;
pub mod server;
pub mod session;
pub mod store;

use crate::config::Config;
use crate::store::FileStore;

/// Shared application state passed to all handlers via `axum::extract::State`.
pub struct AppState {
    /// Server configuration.
    pub config: Config,
    /// The session store.
    pub store: Arc<FileStore>,
}
