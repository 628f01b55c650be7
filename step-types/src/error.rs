//! Error types for twostep wire types.

use thiserror::Error;

/// Errors that can occur when parsing wire types.
#[derive(Debug, Error)]
pub enum WireError {
    /// Unknown color name
    #[error("unknown color: {0}")]
    UnknownColor(String),
}
