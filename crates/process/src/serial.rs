// SPDX-License-Identifier: MIT

//! [`SerialProcessor`] — runs an ordered list of processors, stopping at
//! the first to fail.

use crate::error::ProcessError;
use crate::processor::Processor;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use logtrap_core::Message;

pub struct SerialProcessor {
    processors: Vec<Box<dyn Processor>>,
}

impl SerialProcessor {
    pub fn new(processors: Vec<Box<dyn Processor>>) -> Self {
        Self { processors }
    }
}

#[async_trait]
impl Processor for SerialProcessor {
    async fn process_message(&mut self, message: Message) -> Result<(), ProcessError> {
        for (index, processor) in self.processors.iter_mut().enumerate() {
            processor
                .process_message(message.clone())
                .await
                .map_err(|source| ProcessError::Inner { index, source: Box::new(source) })?;
        }
        Ok(())
    }

    async fn tick(&mut self, now: DateTime<Utc>) -> Result<(), ProcessError> {
        for (index, processor) in self.processors.iter_mut().enumerate() {
            processor.tick(now).await.map_err(|source| ProcessError::Inner { index, source: Box::new(source) })?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "serial_tests.rs"]
mod tests;
