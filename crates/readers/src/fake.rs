// SPDX-License-Identifier: MIT

//! A scripted [`Reader`] for pipeline and watcher tests.

use crate::error::ReaderError;
use crate::reader::Reader;
use async_trait::async_trait;
use logtrap_core::{Message, ReaderID, State};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Emits a fixed sequence of messages, then idles until cancelled.
///
/// Unlike a real reader, `state` is ignored — tests that exercise dedup
/// drive the [`crate::Watcher`] directly and assert on what it forwarded.
pub struct FakeReader {
    id: ReaderID,
    messages: Vec<Message>,
}

impl FakeReader {
    pub fn new(id: impl Into<ReaderID>, messages: Vec<Message>) -> Self {
        Self { id: id.into(), messages }
    }
}

#[async_trait]
impl Reader for FakeReader {
    fn reader_id(&self) -> ReaderID {
        self.id.clone()
    }

    async fn read_logs(&self, _state: State, out: mpsc::Sender<Message>, cancel: CancellationToken) -> Result<(), ReaderError> {
        for message in &self.messages {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ReaderError::Cancelled),
                result = out.send(message.clone()) => {
                    if result.is_err() {
                        return Ok(());
                    }
                }
            }
        }

        cancel.cancelled().await;
        Err(ReaderError::Cancelled)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
