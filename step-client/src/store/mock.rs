//! Mock state store for testing.
//!
//! Keeps users, sessions and histories in memory, records every call and
//! allows injecting failures.

use super::{RemoteStateStore, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use twostep_types::{RemoteState, SessionToken, State};

/// A call the mock received, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    /// `get()`
    Get,
    /// `put()` with the state written.
    Put(State),
    /// `get_history()`
    GetHistory,
    /// `sign_in()` with the username.
    SignIn(String),
    /// `sign_out()`
    SignOut,
}

/// Mock state store for testing.
///
/// Clones share state, so a test can hand one clone to the controller and
/// inspect the other.
#[derive(Debug, Default)]
pub struct MockStateStore {
    inner: Arc<Mutex<MockStoreInner>>,
}

#[derive(Debug, Default)]
struct MockStoreInner {
    users: HashMap<String, MockUser>,
    sessions: HashMap<String, String>,
    rejected: HashMap<String, String>,
    calls: Vec<StoreCall>,
    next_token: u64,
    put_delay: Option<Duration>,
    fail_next_get: Option<String>,
    fail_next_put: Option<String>,
    fail_next_history: Option<StoreError>,
    fail_next_sign_in: Option<String>,
}

#[derive(Debug, Clone, Default)]
struct MockUser {
    state: State,
    history: Vec<State>,
}

impl MockStateStore {
    /// Create an empty mock store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a user with a current state and server-side history.
    pub fn with_user(self, username: &str, state: State, history: Vec<State>) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner
                .users
                .insert(username.to_string(), MockUser { state, history });
        }
        self
    }

    /// Make `sign_in(username)` fail with the given reason.
    pub fn reject_username(&self, username: &str, reason: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .rejected
            .insert(username.to_string(), reason.to_string());
    }

    /// Revoke every open session; later calls answer `Unauthorized`.
    pub fn expire_sessions(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.sessions.clear();
    }

    /// Open a session without recording a `sign_in` call.
    pub fn issue_token(&self, username: &str) -> SessionToken {
        let mut inner = self.inner.lock().unwrap();
        inner.open_session(username)
    }

    /// Delay every `put()` by `delay` before it takes effect.
    pub fn set_put_delay(&self, delay: Duration) {
        let mut inner = self.inner.lock().unwrap();
        inner.put_delay = Some(delay);
    }

    /// Cause the next `get()` to fail with a network error.
    pub fn fail_next_get(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_get = Some(error.to_string());
    }

    /// Cause the next `put()` to fail with a network error.
    pub fn fail_next_put(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_put = Some(error.to_string());
    }

    /// Cause the next `get_history()` to fail with a network error.
    pub fn fail_next_history(&self, error: &str) {
        self.fail_next_history_with(StoreError::Network(error.to_string()));
    }

    /// Cause the next `get_history()` to fail with `error`.
    pub fn fail_next_history_with(&self, error: StoreError) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_history = Some(error);
    }

    /// Cause the next `sign_in()` to fail with a network error.
    pub fn fail_next_sign_in(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_sign_in = Some(error.to_string());
    }

    /// All calls received so far.
    pub fn calls(&self) -> Vec<StoreCall> {
        let inner = self.inner.lock().unwrap();
        inner.calls.clone()
    }

    /// States written with `put()`, in order.
    pub fn puts(&self) -> Vec<State> {
        let inner = self.inner.lock().unwrap();
        inner
            .calls
            .iter()
            .filter_map(|c| match c {
                StoreCall::Put(state) => Some(*state),
                _ => None,
            })
            .collect()
    }

    /// Stored state for a user.
    pub fn user_state(&self, username: &str) -> Option<State> {
        let inner = self.inner.lock().unwrap();
        inner.users.get(username).map(|u| u.state)
    }

    /// Forget recorded calls, keeping users and sessions.
    pub fn clear_calls(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.clear();
    }
}

impl MockStoreInner {
    fn open_session(&mut self, username: &str) -> SessionToken {
        self.next_token += 1;
        let token = format!("mock-{}-{}", self.next_token, username);
        self.users.entry(username.to_string()).or_default();
        self.sessions.insert(token.clone(), username.to_string());
        SessionToken::new(token)
    }

    fn username_for(&self, token: &SessionToken) -> Result<String, StoreError> {
        self.sessions
            .get(token.as_str())
            .cloned()
            .ok_or(StoreError::Unauthorized)
    }
}

impl Clone for MockStateStore {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl RemoteStateStore for MockStateStore {
    async fn get(&self, token: &SessionToken) -> Result<RemoteState, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(StoreCall::Get);

        if let Some(error) = inner.fail_next_get.take() {
            return Err(StoreError::Network(error));
        }

        let username = inner.username_for(token)?;
        let state = inner.users.get(&username).map(|u| u.state).unwrap_or_default();
        Ok(RemoteState {
            x: state.x,
            y: state.y,
            color: state.color,
            username,
        })
    }

    async fn put(&self, token: &SessionToken, state: State) -> Result<(), StoreError> {
        let delay = {
            let mut inner = self.inner.lock().unwrap();
            inner.calls.push(StoreCall::Put(state));
            inner.put_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut inner = self.inner.lock().unwrap();
        if let Some(error) = inner.fail_next_put.take() {
            return Err(StoreError::Network(error));
        }

        let username = inner.username_for(token)?;
        let user = inner.users.entry(username).or_default();
        user.state = state;
        user.history.push(state);
        Ok(())
    }

    async fn get_history(&self, token: &SessionToken) -> Result<Vec<State>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(StoreCall::GetHistory);

        if let Some(error) = inner.fail_next_history.take() {
            return Err(error);
        }

        let username = inner.username_for(token)?;
        Ok(inner
            .users
            .get(&username)
            .map(|u| u.history.clone())
            .unwrap_or_default())
    }

    async fn sign_in(&self, username: &str) -> Result<SessionToken, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(StoreCall::SignIn(username.to_string()));

        if let Some(error) = inner.fail_next_sign_in.take() {
            return Err(StoreError::Network(error));
        }

        let username = username.trim();
        if username.is_empty() {
            return Err(StoreError::Rejected {
                status: 400,
                reason: "username is required".into(),
            });
        }
        if let Some(reason) = inner.rejected.get(username).cloned() {
            return Err(StoreError::Rejected {
                status: 403,
                reason,
            });
        }

        Ok(inner.open_session(username))
    }

    async fn sign_out(&self, token: &SessionToken) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(StoreCall::SignOut);
        inner.sessions.remove(token.as_str());
        Ok(())
    }
}
