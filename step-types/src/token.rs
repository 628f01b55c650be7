//! Opaque session credential.

use std::fmt;

/// Session credential handed out by the state service on sign-in.
///
/// The client never inspects the bytes. Only presence and the server's
/// acceptance of it (non-401 responses) matter.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a raw credential value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Raw credential value, for attaching to requests.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Never print the credential itself.
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionToken([{} bytes REDACTED])", self.0.len())
    }
}
