// SPDX-License-Identifier: MIT

//! A recording [`Processor`] for pipeline tests.

use crate::error::ProcessError;
use crate::processor::Processor;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use logtrap_core::Message;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct FakeProcessor {
    messages: Arc<Mutex<Vec<Message>>>,
    ticks: Arc<Mutex<Vec<DateTime<Utc>>>>,
}

impl FakeProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.messages.lock().clone()
    }

    pub fn tick_count(&self) -> usize {
        self.ticks.lock().len()
    }
}

#[async_trait]
impl Processor for FakeProcessor {
    async fn process_message(&mut self, message: Message) -> Result<(), ProcessError> {
        self.messages.lock().push(message);
        Ok(())
    }

    async fn tick(&mut self, now: DateTime<Utc>) -> Result<(), ProcessError> {
        self.ticks.lock().push(now);
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
