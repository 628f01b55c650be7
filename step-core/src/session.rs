//! Session state machine for twostep.
//!
//! This module provides a pure, side-effect-free state machine gating every
//! mutating operation on authentication. The machine takes events as input
//! and produces a new state plus a list of actions to execute.
//!
//! The actual I/O (loading state, calling sign-out) is performed by
//! step-client, not by this module.

use thiserror::Error;
use twostep_types::SessionToken;

/// Session errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// A mutating operation was attempted without a session.
    #[error("must sign in first")]
    AuthRequired,
}

/// Authentication state - NO I/O, just state transitions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionGate {
    /// No valid session. Mutations are rejected.
    #[default]
    Anonymous,
    /// Signed in; mutations are permitted.
    Authenticated {
        /// Name the server associated with the session.
        username: String,
        /// Credential attached to every remote call.
        token: SessionToken,
    },
}

impl SessionGate {
    /// Create a gate in the Anonymous state.
    pub fn new() -> Self {
        Self::Anonymous
    }

    /// Process an event and return the new state plus actions to execute.
    ///
    /// This is a pure function - no side effects. The caller (step-client)
    /// is responsible for executing the returned actions.
    pub fn on_event(self, event: Event) -> (Self, Vec<Action>) {
        match (self, event) {
            // Sign-in from either state replaces the session and reloads.
            (_, Event::SignInSucceeded { username, token }) => (
                Self::Authenticated {
                    username: username.clone(),
                    token,
                },
                vec![
                    Action::Reconcile,
                    Action::Notify(AuthNotice::SignedIn { username }),
                ],
            ),
            (state, Event::SignInRejected { reason }) => {
                (state, vec![Action::Notify(AuthNotice::SignInFailed { reason })])
            }

            // Reconciliation outcome
            (Self::Anonymous, Event::StateLoaded { username, token }) => (
                Self::Authenticated {
                    username: username.clone(),
                    token,
                },
                vec![Action::Notify(AuthNotice::SignedIn { username })],
            ),
            (Self::Authenticated { .. }, Event::StateLoaded { username, token }) => {
                (Self::Authenticated { username, token }, vec![])
            }
            (Self::Authenticated { .. }, Event::ReconcileFailed { reason }) => (
                Self::Anonymous,
                vec![Action::Notify(AuthNotice::SessionLost { reason })],
            ),

            // Explicit sign-out
            (Self::Authenticated { token, .. }, Event::SignOutRequested) => (
                Self::Anonymous,
                vec![
                    Action::RemoteSignOut { token },
                    Action::ResetLocal,
                    Action::Notify(AuthNotice::SignedOut),
                ],
            ),
            (Self::Anonymous, Event::SignOutRequested) => (
                Self::Anonymous,
                vec![Action::ResetLocal, Action::Notify(AuthNotice::SignedOut)],
            ),

            // Server rejected the credential; local state is kept as-is.
            (Self::Authenticated { .. }, Event::Unauthorized) => (
                Self::Anonymous,
                vec![Action::Notify(AuthNotice::SessionLost {
                    reason: "session expired".into(),
                })],
            ),

            // Invalid transitions - stay in current state
            (state, _) => (state, vec![]),
        }
    }

    /// Check if currently signed in.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// The credential, or `AuthRequired` while Anonymous.
    pub fn ensure_authenticated(&self) -> Result<&SessionToken, SessionError> {
        match self {
            Self::Authenticated { token, .. } => Ok(token),
            Self::Anonymous => Err(SessionError::AuthRequired),
        }
    }

    /// Signed-in username, if any.
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Authenticated { username, .. } => Some(username),
            Self::Anonymous => None,
        }
    }

    /// Current credential, if any.
    pub fn token(&self) -> Option<&SessionToken> {
        self.ensure_authenticated().ok()
    }
}

/// Events that can occur in the session lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The server accepted a sign-in.
    SignInSucceeded {
        /// Name that was signed in.
        username: String,
        /// Credential issued by the server.
        token: SessionToken,
    },
    /// The server rejected a sign-in.
    SignInRejected {
        /// Reason given by the server.
        reason: String,
    },
    /// Reconciliation loaded the remote state for a credential.
    StateLoaded {
        /// Username reported by the server.
        username: String,
        /// Credential the state was loaded with.
        token: SessionToken,
    },
    /// Reconciliation could not load the remote state.
    ReconcileFailed {
        /// Error message describing the failure.
        reason: String,
    },
    /// User requested sign-out.
    SignOutRequested,
    /// A remote call answered 401.
    Unauthorized,
}

/// Actions to be executed by step-client.
///
/// These are instructions, not side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Load state and history from the server.
    Reconcile,
    /// Tell the server to drop the session (best effort).
    RemoteSignOut {
        /// Credential being dropped.
        token: SessionToken,
    },
    /// Reset local state and history to the origin seed.
    ResetLocal,
    /// Surface a message to the user-facing layer.
    Notify(AuthNotice),
}

/// Session notices surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthNotice {
    /// Now signed in.
    SignedIn {
        /// Signed-in username.
        username: String,
    },
    /// Sign-in was refused (`AuthError`).
    SignInFailed {
        /// Reason given by the server.
        reason: String,
    },
    /// Signed out on request.
    SignedOut,
    /// The session ended without a sign-out request.
    SessionLost {
        /// Why the session ended.
        reason: String,
    },
}
