// SPDX-License-Identifier: MIT

//! The [`Processor`] capability: consumes messages, possibly grouping
//! them, and invokes [`logtrap_actions::Action`].

use crate::error::ProcessError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use logtrap_core::Message;

/// Consumes [`Message`]s and invokes actions, possibly after grouping.
///
/// Processors are never shared across pipelines — each [`crate`] instance
/// holds its own mutable grouping state (spec.md §3's ownership rules).
#[async_trait]
pub trait Processor: Send {
    async fn process_message(&mut self, message: Message) -> Result<(), ProcessError>;

    /// Called on the pipeline's fixed 1-second cadence; the only
    /// mechanism that bounds a group's lifetime absent an end-line match.
    async fn tick(&mut self, now: DateTime<Utc>) -> Result<(), ProcessError>;
}
