//! # step-core
//!
//! Pure logic for twostep (no I/O, instant tests).
//!
//! This crate implements the history buffer, the session state machine and
//! the piece transforms without any network or disk I/O, enabling fast unit
//! tests.
//!
//! ## Design Philosophy
//!
//! All modules in this crate are **pure** - they take input and produce output
//! without side effects. This enables:
//! - Instant unit tests (no mocks, no async)
//! - Deterministic behavior (randomness is injected as an [`rand::Rng`])
//! - Easy reasoning about state transitions
//!
//! The actual I/O is performed by `step-client`, which interprets the
//! actions produced by the session machine and persists the states the
//! transforms produce.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod history;
pub mod session;
pub mod transform;
pub mod weather;

pub use history::{HistoryBuffer, MAX_HISTORY};
pub use session::{Action, AuthNotice, Event, SessionError, SessionGate};
pub use transform::{move_by, randomize, reset, set_color, MoveRejected, RANDOM_BOUND};
pub use weather::color_for_temperature;
