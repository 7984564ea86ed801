// SPDX-License-Identifier: MIT

//! The [`Action`] capability: a side-effecting sink invoked with a bundle
//! of matched messages.

use crate::error::ActionError;
use async_trait::async_trait;
use logtrap_core::Message;

/// Performs a side effect for a non-empty bundle of matched messages.
///
/// Actions are shared across pipelines (see spec.md §3's ownership rules),
/// so implementations must be safe for concurrent invocation.
#[async_trait]
pub trait Action: Send + Sync {
    async fn perform(&self, messages: &[Message]) -> Result<(), ActionError>;
}
