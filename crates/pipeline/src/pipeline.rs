// SPDX-License-Identifier: MIT

//! [`Pipeline`] — one Watcher and one fresh Processor, wired together per
//! spec.md §4.7's `process_pipeline()` operation.

use crate::factory::ProcessorFactory;
use chrono::Utc;
use logtrap_core::{ReaderID, State};
use logtrap_persist::Persister;
use logtrap_process::Processor;
use logtrap_readers::{Reader, ReaderError, Watcher};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Owns one [`Watcher`] and builds one fresh `Processor` per run via its
/// [`ProcessorFactory`].
///
/// `buffer_size` is the message channel's capacity between the Watcher and
/// the Processor loop; `0` (the spec default, "rendezvous") is rounded up
/// to `1`, the smallest capacity `tokio::sync::mpsc` allows.
pub struct Pipeline {
    watcher: Arc<Watcher>,
    processor_factory: ProcessorFactory,
    buffer_size: usize,
}

impl Pipeline {
    pub fn new(reader: Arc<dyn Reader>, persister: Arc<dyn Persister>, initial_state: State, processor_factory: ProcessorFactory) -> Self {
        Self { watcher: Arc::new(Watcher::new(reader, persister, initial_state)), processor_factory, buffer_size: 0 }
    }

    #[must_use]
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn reader_id(&self) -> ReaderID {
        self.watcher.reader_id()
    }

    /// Runs this pipeline to completion: builds the Processor, starts the
    /// Watcher, then alternates between forwarded messages and the
    /// 1-second tick until the channel closes. Processor errors are
    /// logged, never propagated; the Watcher's own result is returned.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), ReaderError> {
        let reader_id = self.reader_id();
        let mut processor = (self.processor_factory)().map_err(|e| ReaderError::Config(e.to_string()))?;

        let (tx, mut rx) = mpsc::channel(self.buffer_size.max(1));
        let watch_done = self.watcher.clone().watch_async(tx, cancel);

        let mut ticker = tokio::time::interval(TICK_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            tokio::select! {
                maybe_message = rx.recv() => {
                    match maybe_message {
                        Some(message) => {
                            if let Err(e) = processor.process_message(message).await {
                                tracing::warn!(%reader_id, error = %e, "processor failed on message");
                            }
                        }
                        None => break,
                    }
                }
                _ = ticker.tick() => {
                    if let Err(e) = processor.tick(Utc::now()).await {
                        tracing::warn!(%reader_id, error = %e, "processor tick failed");
                    }
                }
            }
        }

        match watch_done.await {
            Ok(result) => result,
            Err(join_err) => Err(ReaderError::Io(std::io::Error::other(join_err))),
        }
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
