// SPDX-License-Identifier: MIT

//! [`JournalReader`] — tails the local systemd journal.
//!
//! The `systemd` journal API is not safe to call from more than one thread
//! over the lifetime of a single [`systemd::journal::Journal`], so the
//! whole blocking read loop runs on one dedicated thread via
//! `spawn_blocking`, matching the original's `runtime.LockOSThread()`
//! usage — this is about the library's threading contract, not CPU
//! affinity.

use crate::error::ReaderError;
use crate::reader::Reader;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use logtrap_core::{Fields, Message, ReaderID, State};
use std::time::Duration;
use systemd::journal::{Journal, JournalRecord, JournalSeek, JournalWaitResult, OpenOptions};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const WAIT_TIMEOUT: Duration = Duration::from_secs(1);

/// Reads the local systemd journal, resuming by cursor or timestamp.
pub struct JournalReader {
    id: ReaderID,
}

impl JournalReader {
    pub fn new(id: impl Into<ReaderID>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl Reader for JournalReader {
    fn reader_id(&self) -> ReaderID {
        self.id.clone()
    }

    async fn read_logs(&self, state: State, out: mpsc::Sender<Message>, cancel: CancellationToken) -> Result<(), ReaderError> {
        let reader_id = self.id.clone();
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

        let blocking = tokio::task::spawn_blocking(move || run_blocking(reader_id, state, out, stop_rx));

        tokio::select! {
            _ = cancel.cancelled() => {
                let _ = stop_tx.send(());
                let _ = blocking.await;
                Err(ReaderError::Cancelled)
            }
            result = blocking => match result {
                Ok(inner) => inner,
                Err(e) => Err(ReaderError::Io(std::io::Error::other(e))),
            },
        }
    }
}

/// Runs entirely on the blocking thread: opens the journal, seeks, then
/// loops `next()`/`wait()` until `stop` fires or an entry fails to read.
fn run_blocking(
    reader_id: ReaderID,
    state: State,
    out: mpsc::Sender<Message>,
    mut stop: tokio::sync::oneshot::Receiver<()>,
) -> Result<(), ReaderError> {
    let mut journal = OpenOptions::default().system(true).local_only(true).open().map_err(|e| ReaderError::Journal(e.to_string()))?;

    seek(&mut journal, &state);

    loop {
        if stop.try_recv().is_ok() {
            return Ok(());
        }

        match journal.next_entry() {
            Ok(Some(record)) => {
                let message = record_to_message(&reader_id, &record);
                if out.blocking_send(message).is_err() {
                    return Ok(());
                }
            }
            Ok(None) => match journal.wait(Some(WAIT_TIMEOUT)) {
                Ok(JournalWaitResult::Nop) => continue,
                Ok(JournalWaitResult::Append) | Ok(JournalWaitResult::Invalidate) => continue,
                Err(e) => return Err(ReaderError::Journal(e.to_string())),
            },
            Err(e) => return Err(ReaderError::Journal(e.to_string())),
        }
    }
}

/// Seeks by cursor if available, else by timestamp; a failed seek is
/// logged and reading continues from the journal's natural position.
fn seek(journal: &mut Journal, state: &State) {
    if !state.cursor.is_empty() {
        if let Err(e) = journal.seek(JournalSeek::Cursor { cursor: state.cursor.clone() }) {
            tracing::warn!(cursor = %state.cursor, error = %e, "failed to seek journal by cursor");
        }
        return;
    }

    if state.timestamp != State::default().timestamp {
        let usec = state.timestamp.timestamp_micros().max(0) as u64;
        if let Err(e) = journal.seek(JournalSeek::ClockRealtime { usec }) {
            tracing::warn!(%usec, error = %e, "failed to seek journal by timestamp");
        }
    }
}

fn record_to_message(reader_id: &ReaderID, record: &JournalRecord) -> Message {
    let timestamp = realtime_timestamp(record);
    let cursor = record.get("__CURSOR").cloned().unwrap_or_default();
    let text = record.get("MESSAGE").cloned().unwrap_or_default();

    let fields: Fields = record.iter().filter(|(k, _)| !k.starts_with("__")).map(|(k, v)| (k.clone(), v.clone())).collect();

    Message::new(timestamp, reader_id.clone(), text, fields).with_cursor(cursor)
}

fn realtime_timestamp(record: &JournalRecord) -> DateTime<Utc> {
    record
        .get("__REALTIME_TIMESTAMP")
        .and_then(|v| v.parse::<i64>().ok())
        .and_then(|usec| Utc.timestamp_micros(usec).single())
        .unwrap_or_else(|| State::default().timestamp)
}
