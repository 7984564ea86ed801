// SPDX-License-Identifier: MIT

//! [`AnyProcessor`] — invokes its action once per message, with no
//! grouping.

use crate::error::ProcessError;
use crate::processor::Processor;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use logtrap_actions::Action;
use logtrap_core::Message;
use std::sync::Arc;

pub struct AnyProcessor {
    action: Arc<dyn Action>,
}

impl AnyProcessor {
    pub fn new(action: Arc<dyn Action>) -> Self {
        Self { action }
    }
}

#[async_trait]
impl Processor for AnyProcessor {
    async fn process_message(&mut self, message: Message) -> Result<(), ProcessError> {
        self.action.perform(std::slice::from_ref(&message)).await.map_err(ProcessError::from)
    }

    async fn tick(&mut self, _now: DateTime<Utc>) -> Result<(), ProcessError> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "any_tests.rs"]
mod tests;
