// SPDX-License-Identifier: MIT

use logtrap_core::ReaderID;
use thiserror::Error;

/// Errors from loading or saving reader state.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to persist state for {reader_id}: {source}")]
    StorageFailure {
        reader_id: ReaderID,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt state file for {reader_id}: {source}")]
    Corrupt {
        reader_id: ReaderID,
        #[source]
        source: serde_json::Error,
    },
}
