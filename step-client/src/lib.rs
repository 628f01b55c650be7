//! # step-client
//!
//! Client library for twostep.
//!
//! This is the library the front end uses to move the piece and keep it in
//! sync with the state service.
//!
//! ## Features
//!
//! - **Optimistic updates**: local state changes immediately, writes are
//!   spawned as fire-and-forget tasks
//! - **Bounded undo/redo**: history buffer from step-core
//! - **Session gating**: every mutation requires a signed-in session
//! - **Store abstraction**: pluggable state store (HTTP, mock)
//!
//! ## Example
//!
//! ```ignore
//! use twostep_client::{HttpStateStore, SyncController, ClientConfig};
//!
//! let config = ClientConfig::default();
//! let store = HttpStateStore::new(&config.server)?;
//! let mut controller = SyncController::new(store);
//!
//! controller.sign_in("alice").await?;
//! controller.move_by(10, 0)?;
//! controller.undo()?;
//! controller.flush().await;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod controller;
pub mod store;
pub mod weather;

pub use config::{ClientConfig, ConfigError, ServerConfig, WeatherConfig};
pub use controller::{ControllerError, SyncController};
pub use store::{HttpStateStore, MockStateStore, RemoteStateStore, StoreCall, StoreError};
pub use weather::{initial_color, FixedWeather, WeatherApiClient, WeatherError, WeatherSource};
