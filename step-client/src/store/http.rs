//! HTTP state store.
//!
//! Talks to the REST state service. The session credential travels as a
//! cookie on every request; the store never looks inside it.

use super::{RemoteStateStore, StoreError};
use crate::config::ServerConfig;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, COOKIE, SET_COOKIE};
use reqwest::{Response, StatusCode};
use std::time::Duration;
use twostep_types::{
    ErrorBody, HistoryResponse, RemoteState, SessionToken, SignInRequest, SignInResponse, State,
};

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            StoreError::Decode(e.to_string())
        } else {
            StoreError::Network(e.to_string())
        }
    }
}

/// State store backed by the REST service.
#[derive(Debug, Clone)]
pub struct HttpStateStore {
    base_url: String,
    cookie_name: String,
    http: reqwest::Client,
}

impl HttpStateStore {
    /// Create a store for the configured server.
    pub fn new(config: &ServerConfig) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cookie_name: config.session_cookie.clone(),
            http,
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the URL for an endpoint path.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn cookie(&self, token: &SessionToken) -> String {
        format!("{}={}", self.cookie_name, token.as_str())
    }
}

/// Map non-success statuses to store errors.
async fn check(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(StoreError::Unauthorized);
    }
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(StoreError::Rejected {
            status: status.as_u16(),
            reason: error_reason(&text, status),
        });
    }
    Ok(response)
}

/// Reason from a `{error: ...}` body, falling back to the raw text.
fn error_reason(body: &str, status: StatusCode) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    }
}

/// Value of the named cookie from `Set-Cookie` headers.
fn session_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|cookie| cookie.split(';').next())
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[async_trait]
impl RemoteStateStore for HttpStateStore {
    async fn get(&self, token: &SessionToken) -> Result<RemoteState, StoreError> {
        let response = self
            .http
            .get(self.url("state"))
            .header(COOKIE, self.cookie(token))
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    async fn put(&self, token: &SessionToken, state: State) -> Result<(), StoreError> {
        let response = self
            .http
            .post(self.url("state"))
            .header(COOKIE, self.cookie(token))
            .json(&state)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn get_history(&self, token: &SessionToken) -> Result<Vec<State>, StoreError> {
        let response = self
            .http
            .get(self.url("history"))
            .header(COOKIE, self.cookie(token))
            .send()
            .await?;
        let body: HistoryResponse = check(response).await?.json().await?;
        Ok(body.history)
    }

    async fn sign_in(&self, username: &str) -> Result<SessionToken, StoreError> {
        let response = self
            .http
            .post(self.url("signin"))
            .json(&SignInRequest {
                username: username.to_string(),
            })
            .send()
            .await?;
        let response = check(response).await?;

        if let Some(value) = session_cookie(response.headers(), &self.cookie_name) {
            return Ok(SessionToken::new(value));
        }

        // No cookie: the credential may be in the body instead.
        let text = response.text().await?;
        let body: SignInResponse = serde_json::from_str(&text).unwrap_or_default();
        body.token
            .filter(|t| !t.is_empty())
            .map(SessionToken::new)
            .ok_or_else(|| StoreError::Decode("sign-in response carried no session".into()))
    }

    async fn sign_out(&self, token: &SessionToken) -> Result<(), StoreError> {
        let response = self
            .http
            .post(self.url("signout"))
            .header(COOKIE, self.cookie(token))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}
