//! Request and response bodies for the state service REST API.

use serde::{Deserialize, Serialize};

use crate::{Color, State};

/// Body of `GET /state`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteState {
    /// Horizontal position
    pub x: u32,
    /// Vertical position
    pub y: u32,
    /// Fill color
    pub color: Color,
    /// Owner of the session
    pub username: String,
}

impl RemoteState {
    /// The piece state carried by this response.
    pub fn state(&self) -> State {
        State::new(self.x, self.y, self.color)
    }
}

/// Body of `GET /history`, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HistoryResponse {
    /// Past states in append order
    #[serde(default)]
    pub history: Vec<State>,
}

/// Body of `POST /signin`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInRequest {
    /// Name to sign in as
    pub username: String,
}

/// Optional JSON body of a successful `POST /signin`.
///
/// Servers that hand out the credential as a cookie may send an empty body.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SignInResponse {
    /// Session credential, when not sent as a cookie
    #[serde(default)]
    pub token: Option<String>,
}

/// Error body returned by the service on 4xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable reason
    pub error: String,
}
