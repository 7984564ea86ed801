// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors raised while formatting or performing an [`crate::Action`].
#[derive(Debug, Error)]
pub enum ActionError {
    /// A [`crate::NotifyAction`] was invoked with no messages to report.
    #[error("notify action invoked with an empty message bundle")]
    EmptyBundle,

    #[error(transparent)]
    Format(#[from] crate::formatter::FormatError),

    #[error("notification send failed: {0}")]
    Notify(#[from] crate::notify::NotifyError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
