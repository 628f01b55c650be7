//! # step-types
//!
//! Data and wire types for twostep.
//!
//! This crate provides the foundational types used across all twostep crates:
//! - [`State`], [`Color`] - The piece's position and color
//! - [`RemoteState`], [`HistoryResponse`], [`SignInRequest`] - REST bodies
//! - [`SessionToken`] - Opaque session credential
//! - [`WireError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod messages;
mod state;
mod token;

pub use error::WireError;
pub use messages::{ErrorBody, HistoryResponse, RemoteState, SignInRequest, SignInResponse};
pub use state::{Color, State, ORIGIN_X, ORIGIN_Y};
pub use token::SessionToken;
