//! State store abstraction for twostep.
//!
//! This module provides a pluggable store layer that abstracts the remote
//! state service (HTTP, in-memory mock for testing).
//!
//! # Design
//!
//! The store is an opaque per-user key-value service:
//! - `sign_in()` / `sign_out()` manage the session credential
//! - `get()` / `put()` read and write the current state
//! - `get_history()` returns past states, oldest first
//!
//! Every call except `sign_in()` carries the credential. A rejected
//! credential surfaces as [`StoreError::Unauthorized`].

mod http;
mod mock;

pub use http::HttpStateStore;
pub use mock::{MockStateStore, StoreCall};

use async_trait::async_trait;
use thiserror::Error;
use twostep_types::{RemoteState, SessionToken, State};

/// Store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The credential was missing, expired or revoked (401).
    #[error("unauthorized")]
    Unauthorized,

    /// The service refused the request.
    #[error("rejected ({status}): {reason}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Reason given by the service.
        reason: String,
    },

    /// The request never got an answer.
    #[error("network error: {0}")]
    Network(String),

    /// The answer could not be understood.
    #[error("invalid response: {0}")]
    Decode(String),
}

impl StoreError {
    /// Whether this error means the session is gone.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, StoreError::Unauthorized)
    }
}

/// Remote state service.
///
/// Implementations handle the underlying transport (HTTP, mock, etc).
#[async_trait]
pub trait RemoteStateStore: Send + Sync {
    /// Load the current state and owner of the session.
    async fn get(&self, token: &SessionToken) -> Result<RemoteState, StoreError>;

    /// Store a new current state.
    async fn put(&self, token: &SessionToken, state: State) -> Result<(), StoreError>;

    /// Load past states, oldest first. May return more than the client keeps.
    async fn get_history(&self, token: &SessionToken) -> Result<Vec<State>, StoreError>;

    /// Open a session for `username`.
    async fn sign_in(&self, username: &str) -> Result<SessionToken, StoreError>;

    /// Close the session.
    async fn sign_out(&self, token: &SessionToken) -> Result<(), StoreError>;
}
