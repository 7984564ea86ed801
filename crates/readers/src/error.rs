// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors a [`crate::Reader`] or [`crate::Watcher`] can fail with.
#[derive(Debug, Error)]
pub enum ReaderError {
    /// The reader was asked to stop via its `CancellationToken`.
    #[error("reader cancelled")]
    Cancelled,

    #[error("container engine event carried an unexpected action {action:?}")]
    UnexpectedAction { action: String },

    #[error("failed to parse container log line {line:?}")]
    LineFormat { line: String },

    #[error("failed to parse timestamp: {0}")]
    Timestamp(#[from] chrono::ParseError),

    #[error("journal error: {0}")]
    Journal(String),

    #[error("pipeline configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Docker(#[from] bollard::errors::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Persist(#[from] logtrap_persist::PersistError),
}
