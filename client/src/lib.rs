//! Listview Client - async host for the listview engine.
//!
//! Everything that suspends lives here: the remote store adapter and its
//! simulated implementation, the debounce timer for search input, and the
//! [`Session`] that issues loads and optimistic mutations while the engine
//! stays pure.

pub mod config;
pub mod debounce;
pub mod error;
pub mod remote;
pub mod session;

pub use config::{Config, ConfigError};
pub use debounce::DebounceController;
pub use error::{ClientError, Result};
pub use remote::{generate_records, RemoteConfig, RemoteStore, SimulatedStore};
pub use session::{PendingMutation, Session};
