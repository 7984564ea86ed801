// SPDX-License-Identifier: MIT

//! [`LogAction`] — formats a bundle into a pooled buffer, then writes it
//! to a shared sink under a single mutex guarding write ordering.

use crate::error::ActionError;
use crate::formatter::Formatter;
use crate::Action;
use async_trait::async_trait;
use logtrap_core::Message;
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

/// Buffers above this size are dropped instead of returned to the pool,
/// so one unusually large bundle doesn't pin that much memory forever.
const MAX_POOL_SIZE: usize = 16;

/// Formats every message in a bundle into one buffer, then writes the
/// whole buffer to `sink` in a single locked section.
///
/// The buffer is drawn from (and returned to) a small pool to bound
/// allocation under sustained matching traffic.
pub struct LogAction<W: Write + Send> {
    formatter: Arc<dyn Formatter>,
    sink: Mutex<W>,
    pool: Mutex<Vec<String>>,
}

impl<W: Write + Send> LogAction<W> {
    pub fn new(formatter: Arc<dyn Formatter>, sink: W) -> Self {
        Self { formatter, sink: Mutex::new(sink), pool: Mutex::new(Vec::new()) }
    }

    fn take_buffer(&self) -> String {
        self.pool.lock().pop().unwrap_or_default()
    }

    fn return_buffer(&self, mut buffer: String) {
        buffer.clear();
        let mut pool = self.pool.lock();
        if pool.len() < MAX_POOL_SIZE {
            pool.push(buffer);
        }
    }
}

impl LogAction<std::io::Stdout> {
    pub fn stdout(formatter: Arc<dyn Formatter>) -> Self {
        Self::new(formatter, std::io::stdout())
    }
}

#[async_trait]
impl<W: Write + Send + 'static> Action for LogAction<W> {
    async fn perform(&self, messages: &[Message]) -> Result<(), ActionError> {
        let mut buffer = self.take_buffer();

        for message in messages {
            buffer.push_str(&self.formatter.format(message)?);
        }

        {
            let mut sink = self.sink.lock();
            sink.write_all(buffer.as_bytes())?;
            sink.flush()?;
        }

        self.return_buffer(buffer);
        Ok(())
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
