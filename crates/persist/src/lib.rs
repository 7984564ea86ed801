// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! logtrap-persist: the [`Persister`] capability and its implementations.
//!
//! - [`file`] — one JSON document per reader, written atomically
//! - [`noop`] — discards state, used where resuming is not wanted

pub mod error;
pub mod file;
pub mod noop;

use async_trait::async_trait;
use logtrap_core::{ReaderID, State};

pub use error::PersistError;
pub use file::FilePersister;
pub use noop::NoopPersister;

/// Durable storage for a reader's resume point.
#[async_trait]
pub trait Persister: Send + Sync {
    /// Loads the last saved state, or the empty `State` if none exists.
    async fn load_state(&self, reader_id: &ReaderID) -> Result<State, PersistError>;

    /// Durably saves `state`. Must be atomic with respect to concurrent
    /// readers of the previous state.
    async fn save_state(&self, reader_id: &ReaderID, state: &State) -> Result<(), PersistError>;
}
