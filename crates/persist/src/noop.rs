// SPDX-License-Identifier: MIT

//! The trivial [`Persister`](crate::Persister) that discards everything.

use crate::error::PersistError;
use crate::Persister;
use async_trait::async_trait;
use logtrap_core::{ReaderID, State};

/// Always reports an empty `State` and drops every save on the floor.
///
/// Used by the factory when a reader is configured without a state
/// directory, and by tests that don't care about resume behavior.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPersister;

#[async_trait]
impl Persister for NoopPersister {
    async fn load_state(&self, _reader_id: &ReaderID) -> Result<State, PersistError> {
        Ok(State::default())
    }

    async fn save_state(&self, reader_id: &ReaderID, state: &State) -> Result<(), PersistError> {
        tracing::debug!(%reader_id, %state, "discarding state (noop persister)");
        Ok(())
    }
}

#[cfg(test)]
#[path = "noop_tests.rs"]
mod tests;
