// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors a [`crate::Processor`] can fail with.
///
/// Per spec.md §7's propagation policy, the pipeline logs and swallows
/// these — a single unprocessable line must never stall the pipeline.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    Action(#[from] logtrap_actions::ActionError),

    /// Raised by [`crate::SerialProcessor`] to report which inner
    /// processor (by index) failed first.
    #[error("processor {index} failed: {source}")]
    Inner {
        index: usize,
        #[source]
        source: Box<ProcessError>,
    },

    /// Raised by [`crate::MatcherProcessor::tick`] when more than one
    /// group failed to flush; each is logged individually upstream.
    #[error("{0} group(s) failed to flush on tick")]
    TickFailures(usize),
}
