//! SyncController - the main interface for twostep.
//!
//! This module provides [`SyncController`], the single owner of the piece
//! state, the undo/redo history and the session. It is the only component
//! allowed to talk to the [`RemoteStateStore`].
//!
//! # Architecture
//!
//! The controller uses the pure session machine and history buffer from
//! step-core and interprets their actions to perform I/O through the store.
//!
//! ```text
//! Front end → SyncController → RemoteStateStore → Network
//!                   ↓
//!              step-core (history, session gate, transforms)
//! ```
//!
//! # Optimistic writes
//!
//! Mutations (`move_by`, `reset`, `randomize`, `set_color`, `undo`, `redo`)
//! are synchronous. They update local state and history immediately, then
//! spawn a detached Tokio task that writes the new state to the store. The
//! caller never waits on that write:
//!
//! - a failed write is logged and dropped (at-most-once, no retry, no rollback)
//! - a 401 from a write is reported back through a channel and ends the
//!   session the next time the controller is used
//! - overlapping writes are not ordered; whichever response lands last wins
//!
//! Writes are spawned on the current Tokio runtime. Called outside one, a
//! mutation still applies locally and the write is dropped and counted in
//! [`SyncController::failed_writes`]. [`SyncController::flush`] waits for
//! every in-flight write.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use twostep_core::{
    transform, Action, AuthNotice, Event, HistoryBuffer, MoveRejected, SessionError, SessionGate,
    MAX_HISTORY,
};
use twostep_types::{Color, SessionToken, State};

use crate::store::{RemoteStateStore, StoreError};

/// Controller errors.
///
/// None of these are fatal; local state is always left consistent.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Mutation attempted without a session.
    #[error("must sign in first")]
    AuthRequired,

    /// The transform refused the change (e.g. negative x).
    #[error("{0}")]
    Rejected(#[from] MoveRejected),

    /// The store refused the sign-in.
    #[error("sign-in failed: {reason}")]
    SignInRejected {
        /// Reason given by the server.
        reason: String,
    },

    /// Store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl From<SessionError> for ControllerError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::AuthRequired => ControllerError::AuthRequired,
        }
    }
}

/// Result of a spawned write, reported back to the controller.
#[derive(Debug)]
struct WriteOutcome {
    token: SessionToken,
    state: State,
    result: Result<(), StoreError>,
}

/// The piece controller.
///
/// Owns the current state, the history buffer and the session gate.
pub struct SyncController<S: RemoteStateStore + 'static> {
    store: Arc<S>,
    gate: SessionGate,
    state: State,
    history: HistoryBuffer,
    restored_token: Option<SessionToken>,
    rng: StdRng,
    in_flight: Vec<JoinHandle<()>>,
    outcomes_tx: mpsc::UnboundedSender<WriteOutcome>,
    outcomes_rx: mpsc::UnboundedReceiver<WriteOutcome>,
    notices: Vec<AuthNotice>,
    failed_writes: u64,
}

impl<S: RemoteStateStore + 'static> SyncController<S> {
    /// Create a controller at the origin, signed out.
    pub fn new(store: S) -> Self {
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        let state = State::default();
        Self {
            store: Arc::new(store),
            gate: SessionGate::new(),
            state,
            history: HistoryBuffer::new(state),
            restored_token: None,
            rng: StdRng::from_entropy(),
            in_flight: Vec::new(),
            outcomes_tx,
            outcomes_rx,
            notices: Vec::new(),
            failed_writes: 0,
        }
    }

    /// Use a seeded random generator for `randomize()`.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Offer a credential from a previous run to the next `reconcile()`.
    pub fn with_session(mut self, token: SessionToken) -> Self {
        self.restored_token = Some(token);
        self
    }

    /// Seed the starting color (e.g. from the weather lookup).
    ///
    /// Only applies while signed out; the history restarts from the new
    /// seed and nothing is written to the store.
    pub fn seed_color(&mut self, color: Color) {
        if self.gate.is_authenticated() {
            tracing::debug!("Ignoring seed color {} while signed in", color);
            return;
        }
        self.state = self.state.with_color(color);
        self.history.reset(self.state);
    }

    // ===========================================
    // Session
    // ===========================================

    /// Sign in and load the user's state and history.
    pub async fn sign_in(&mut self, username: &str) -> Result<State, ControllerError> {
        self.drain_write_outcomes();

        match self.store.sign_in(username).await {
            Ok(token) => {
                tracing::info!("Signed in as {}", username);
                if self.apply(Event::SignInSucceeded {
                    username: username.to_string(),
                    token,
                }) {
                    self.reconcile().await?;
                }
                Ok(self.state)
            }
            Err(StoreError::Rejected { reason, .. }) => {
                tracing::warn!("Sign-in rejected for {}: {}", username, reason);
                self.apply(Event::SignInRejected {
                    reason: reason.clone(),
                });
                Err(ControllerError::SignInRejected { reason })
            }
            Err(e) => {
                tracing::warn!("Sign-in failed for {}: {}", username, e);
                self.apply(Event::SignInRejected {
                    reason: e.to_string(),
                });
                Err(e.into())
            }
        }
    }

    /// Sign out and reset to a single origin entry.
    ///
    /// The remote sign-out is best effort; local state is reset either way.
    pub async fn sign_out(&mut self) {
        self.drain_write_outcomes();

        let gate = std::mem::take(&mut self.gate);
        let (gate, actions) = gate.on_event(Event::SignOutRequested);
        self.gate = gate;

        for action in actions {
            match action {
                Action::RemoteSignOut { token } => {
                    if let Err(e) = self.store.sign_out(&token).await {
                        tracing::warn!("Remote sign-out failed: {}", e);
                    }
                }
                other => {
                    self.run_local(other);
                }
            }
        }
    }

    /// Load state and history from the store.
    ///
    /// Runs once at startup and after every sign-in. Without a credential
    /// this is a no-op. A failed load leaves the controller signed out.
    pub async fn reconcile(&mut self) -> Result<(), ControllerError> {
        self.drain_write_outcomes();

        let token = match self
            .gate
            .token()
            .cloned()
            .or_else(|| self.restored_token.take())
        {
            Some(token) => token,
            None => {
                tracing::debug!("No session to reconcile");
                return Ok(());
            }
        };

        let remote = match self.store.get(&token).await {
            Ok(remote) => remote,
            Err(e) => {
                tracing::warn!("Failed to load state: {}", e);
                let event = if e.is_unauthorized() {
                    Event::Unauthorized
                } else {
                    Event::ReconcileFailed {
                        reason: e.to_string(),
                    }
                };
                self.apply(event);
                return Err(e.into());
            }
        };

        self.state = remote.state();
        self.history.reset(self.state);
        self.apply(Event::StateLoaded {
            username: remote.username,
            token: token.clone(),
        });

        match self.store.get_history(&token).await {
            Ok(history) if !history.is_empty() => {
                tracing::debug!("Loaded {} history entries", history.len());
                self.history.replace(history, MAX_HISTORY);
            }
            Ok(_) => tracing::debug!("Remote history empty"),
            Err(e) => {
                tracing::warn!("Failed to load history: {}", e);
                if e.is_unauthorized() {
                    self.apply(Event::Unauthorized);
                    return Err(e.into());
                }
            }
        }

        Ok(())
    }

    // ===========================================
    // Mutations
    // ===========================================

    /// Move the piece by `(dx, dy)`.
    ///
    /// A move that would make x negative is rejected without touching state,
    /// history or the network. A negative y is clamped to zero.
    pub fn move_by(&mut self, dx: i64, dy: i64) -> Result<State, ControllerError> {
        let token = self.authorize()?;
        let next = transform::move_by(self.state, dx, dy).map_err(|e| {
            tracing::debug!("{}", e);
            e
        })?;
        Ok(self.commit(token, next))
    }

    /// Move the piece back to `(100, 50)`, keeping its color.
    pub fn reset(&mut self) -> Result<State, ControllerError> {
        let token = self.authorize()?;
        let next = transform::reset(self.state);
        Ok(self.commit(token, next))
    }

    /// Move the piece to a random position.
    pub fn randomize(&mut self) -> Result<State, ControllerError> {
        let token = self.authorize()?;
        let next = transform::randomize(self.state, &mut self.rng);
        Ok(self.commit(token, next))
    }

    /// Recolor the piece.
    pub fn set_color(&mut self, color: Color) -> Result<State, ControllerError> {
        let token = self.authorize()?;
        let next = transform::set_color(self.state, color);
        Ok(self.commit(token, next))
    }

    /// Step back one state and persist it.
    ///
    /// At the oldest entry this is a no-op with no network call.
    pub fn undo(&mut self) -> Result<State, ControllerError> {
        let token = self.authorize()?;
        if !self.history.can_undo() {
            return Ok(self.state);
        }
        let restored = self.history.undo();
        Ok(self.restore(token, restored))
    }

    /// Step forward one state and persist it.
    ///
    /// At the newest entry this is a no-op with no network call.
    pub fn redo(&mut self) -> Result<State, ControllerError> {
        let token = self.authorize()?;
        if !self.history.can_redo() {
            return Ok(self.state);
        }
        let restored = self.history.redo();
        Ok(self.restore(token, restored))
    }

    // ===========================================
    // Queries
    // ===========================================

    /// Current piece state.
    pub fn state(&self) -> State {
        self.state
    }

    /// The history buffer.
    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    /// Whether a session is active.
    pub fn is_signed_in(&self) -> bool {
        self.gate.is_authenticated()
    }

    /// Signed-in username, if any.
    pub fn username(&self) -> Option<&str> {
        self.gate.username()
    }

    /// Current credential, for saving across runs.
    pub fn session_token(&self) -> Option<&SessionToken> {
        self.gate.token()
    }

    /// Whether `undo()` would change anything.
    pub fn can_undo(&self) -> bool {
        self.gate.is_authenticated() && self.history.can_undo()
    }

    /// Whether `redo()` would change anything.
    pub fn can_redo(&self) -> bool {
        self.gate.is_authenticated() && self.history.can_redo()
    }

    /// Number of writes that failed since creation.
    pub fn failed_writes(&self) -> u64 {
        self.failed_writes
    }

    /// Number of writes that have not finished yet.
    pub fn pending_writes(&self) -> usize {
        self.in_flight.iter().filter(|h| !h.is_finished()).count()
    }

    /// Take the session notices produced since the last call.
    pub fn take_notices(&mut self) -> Vec<AuthNotice> {
        std::mem::take(&mut self.notices)
    }

    /// Wait for every in-flight write and process the results.
    pub async fn flush(&mut self) {
        for handle in std::mem::take(&mut self.in_flight) {
            if let Err(e) = handle.await {
                tracing::error!("Write task panicked: {}", e);
            }
        }
        self.drain_write_outcomes();
    }

    // ===========================================
    // Internals
    // ===========================================

    /// Process finished writes; a 401 on the current session ends it.
    fn drain_write_outcomes(&mut self) {
        while let Ok(outcome) = self.outcomes_rx.try_recv() {
            let Err(error) = outcome.result else {
                continue;
            };
            self.failed_writes += 1;
            let current = self.gate.token() == Some(&outcome.token);
            if error.is_unauthorized() && current {
                tracing::warn!(
                    "Session rejected while saving {}; signing out",
                    outcome.state
                );
                self.apply(Event::Unauthorized);
            }
        }
    }

    /// Session check for mutations.
    fn authorize(&mut self) -> Result<SessionToken, ControllerError> {
        self.drain_write_outcomes();
        match self.gate.ensure_authenticated() {
            Ok(token) => Ok(token.clone()),
            Err(e) => {
                tracing::debug!("Mutation refused: {}", e);
                Err(e.into())
            }
        }
    }

    /// Apply a new state: local first, history, then the spawned write.
    fn commit(&mut self, token: SessionToken, next: State) -> State {
        self.state = next;
        self.history.push(next);
        self.persist(token, next);
        next
    }

    /// Apply a state from the history without pushing it.
    fn restore(&mut self, token: SessionToken, restored: State) -> State {
        self.state = restored;
        self.persist(token, restored);
        restored
    }

    /// Spawn a fire-and-forget write of `state`.
    fn persist(&mut self, token: SessionToken, state: State) {
        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                tracing::error!("Cannot save {}: {}", state, e);
                self.failed_writes += 1;
                return;
            }
        };
        let store = Arc::clone(&self.store);
        let tx = self.outcomes_tx.clone();
        self.in_flight.retain(|h| !h.is_finished());
        self.in_flight.push(runtime.spawn(async move {
            let result = store.put(&token, state).await;
            match &result {
                Ok(()) => tracing::debug!("Saved {}", state),
                Err(e) => tracing::warn!("Failed to save {}: {}", state, e),
            }
            // Receiver is gone only when the controller was dropped.
            let _ = tx.send(WriteOutcome {
                token,
                state,
                result,
            });
        }));
    }

    /// Feed an event to the session gate and run the local actions.
    ///
    /// Returns true when the gate asks for a reconcile.
    fn apply(&mut self, event: Event) -> bool {
        let gate = std::mem::take(&mut self.gate);
        let (gate, actions) = gate.on_event(event);
        self.gate = gate;

        let mut reconcile = false;
        for action in actions {
            match action {
                Action::Reconcile => reconcile = true,
                Action::RemoteSignOut { .. } => {
                    // Only produced by SignOutRequested, handled in sign_out().
                }
                other => self.run_local(other),
            }
        }
        reconcile
    }

    fn run_local(&mut self, action: Action) {
        match action {
            Action::ResetLocal => {
                self.state = State::default();
                self.history.reset(self.state);
            }
            Action::Notify(notice) => {
                tracing::info!("Session: {:?}", notice);
                self.notices.push(notice);
            }
            Action::Reconcile | Action::RemoteSignOut { .. } => {}
        }
    }
}
