// SPDX-License-Identifier: MIT

//! [`Watcher`] — drives a [`Reader`], deduplicates against its persisted
//! [`State`], and persists the state reached on exit.

use crate::error::ReaderError;
use crate::reader::Reader;
use logtrap_core::{Message, ReaderID, State};
use logtrap_persist::Persister;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const PERSIST_DEADLINE: Duration = Duration::from_secs(5);

/// Wraps a [`Reader`] with resume-state bookkeeping.
///
/// `watch` loads state, runs the reader, forwards messages downstream
/// while updating state, and persists the final state on exit — whether
/// that exit was clean, cancelled, or an error.
pub struct Watcher {
    reader: Arc<dyn Reader>,
    persister: Arc<dyn Persister>,
    initial_state: State,
}

impl Watcher {
    pub fn new(reader: Arc<dyn Reader>, persister: Arc<dyn Persister>, initial_state: State) -> Self {
        Self { reader, persister, initial_state }
    }

    pub fn reader_id(&self) -> ReaderID {
        self.reader.reader_id()
    }

    /// Loads state, runs the reader, forwards messages to `out`, and
    /// persists the state reached on exit. `out` is dropped (closing the
    /// channel for downstream receivers) when this future returns.
    pub async fn watch(&self, out: mpsc::Sender<Message>, cancel: CancellationToken) -> Result<(), ReaderError> {
        let reader_id = self.reader.reader_id();

        tracing::info!(%reader_id, "watch started");

        let mut state = self.persister.load_state(&reader_id).await?;
        if state == State::default() {
            state = self.initial_state.clone();
        }

        tracing::info!(%reader_id, %state, "loaded state");

        let (tx, mut rx) = mpsc::channel(1);
        let reader = self.reader.clone();
        let read_state = state.clone();
        let read_cancel = cancel.clone();

        let read_task = tokio::spawn(async move {
            let result = reader.read_logs(read_state, tx, read_cancel).await;
            if let Err(ref e) = result {
                tracing::warn!(error = %e, "reader stopped with an error");
            }
            result
        });

        let (final_state, forward_result) = self.forward(&mut rx, state, &out, &cancel).await;

        drop(rx);
        let read_result = match read_task.await {
            Ok(result) => result,
            Err(join_err) => Err(ReaderError::Io(std::io::Error::other(join_err))),
        };

        self.persist_state(&reader_id, &final_state).await;

        tracing::info!(%reader_id, "watch done");

        forward_result.or(read_result)
    }

    /// Drains `rx`, deduplicating against `state`'s boundary and forwarding
    /// everything past it. Returns the state reflecting the last forwarded
    /// message.
    async fn forward(
        &self,
        rx: &mut mpsc::Receiver<Message>,
        mut state: State,
        out: &mpsc::Sender<Message>,
        cancel: &CancellationToken,
    ) -> (State, Result<(), ReaderError>) {
        let mut dedup_done = state.num_messages == 0;
        let mut count: u64 = 0;

        while let Some(message) = rx.recv().await {
            if !dedup_done {
                if message.timestamp == state.timestamp {
                    count += 1;
                    if count <= state.num_messages {
                        continue;
                    }
                }
                dedup_done = true;
            }

            let timestamp = message.timestamp;
            let cursor = message.cursor.clone();

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return (state, Err(ReaderError::Cancelled)),
                result = out.send(message) => {
                    if result.is_err() {
                        return (state, Err(ReaderError::Cancelled));
                    }
                    state = state.with_timestamp(timestamp).with_cursor(cursor);
                }
            }
        }

        (state, Ok(()))
    }

    /// Persists `state` against a fresh 5-second deadline, so even a
    /// cancellation-driven shutdown gets one chance to write it. Failures
    /// are logged, never propagated.
    async fn persist_state(&self, reader_id: &ReaderID, state: &State) {
        match tokio::time::timeout(PERSIST_DEADLINE, self.persister.save_state(reader_id, state)).await {
            Ok(Ok(())) => tracing::info!(%reader_id, %state, "saved state"),
            Ok(Err(e)) => tracing::error!(%reader_id, error = %e, "failed to save state"),
            Err(_) => tracing::error!(%reader_id, "timed out saving state"),
        }
    }

    /// Spawns [`Watcher::watch`] and returns a single-shot receiver carrying
    /// its completion result.
    pub fn watch_async(self: Arc<Self>, out: mpsc::Sender<Message>, cancel: CancellationToken) -> tokio::sync::oneshot::Receiver<Result<(), ReaderError>> {
        let (done_tx, done_rx) = tokio::sync::oneshot::channel();

        tokio::spawn(async move {
            let result = self.watch(out, cancel).await;
            let _ = done_tx.send(result);
        });

        done_rx
    }
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
