// SPDX-License-Identifier: MIT

use super::*;
use crate::fake::FakeReader;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use logtrap_core::Fields;
use logtrap_persist::{NoopPersister, PersistError};
use parking_lot::Mutex;

fn ts(secs: i64) -> chrono::DateTime<chrono::Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

fn message(id: &str, secs: i64, text: &str) -> Message {
    Message::new(ts(secs), ReaderID::new(id), text, Fields::new())
}

struct RecordingPersister {
    saved: Mutex<Vec<State>>,
}

impl RecordingPersister {
    fn new() -> Self {
        Self { saved: Mutex::new(Vec::new()) }
    }
}

#[async_trait]
impl Persister for RecordingPersister {
    async fn load_state(&self, _reader_id: &ReaderID) -> Result<State, PersistError> {
        Ok(State::default())
    }

    async fn save_state(&self, _reader_id: &ReaderID, state: &State) -> Result<(), PersistError> {
        self.saved.lock().push(state.clone());
        Ok(())
    }
}

#[tokio::test]
async fn forwards_every_message_when_no_prior_state() {
    let reader = Arc::new(FakeReader::new("t", vec![message("t", 1, "a"), message("t", 2, "b")]));
    let watcher = Watcher::new(reader, Arc::new(NoopPersister), State::default());

    let (tx, mut rx) = mpsc::channel(4);
    let cancel = CancellationToken::new();
    let child_cancel = cancel.clone();

    let handle = tokio::spawn(async move { watcher.watch(tx, child_cancel).await });

    let first = rx.recv().await.unwrap();
    let second = rx.recv().await.unwrap();
    assert_eq!(first.text(), "a");
    assert_eq!(second.text(), "b");
    assert!(rx.recv().await.is_none());

    cancel.cancel();
    let _ = handle.await.unwrap();
}

#[tokio::test]
async fn skips_messages_already_delivered_at_the_boundary_timestamp() {
    let messages = vec![message("t", 10, "old-1"), message("t", 10, "old-2"), message("t", 10, "new"), message("t", 20, "newer")];
    let reader = Arc::new(FakeReader::new("t", messages));

    let initial_state = State::default().with_timestamp(ts(10)).with_timestamp(ts(10));
    assert_eq!(initial_state.num_messages, 2);

    let watcher = Watcher::new(reader, Arc::new(NoopPersister), initial_state);

    let (tx, mut rx) = mpsc::channel(4);
    let cancel = CancellationToken::new();
    let child_cancel = cancel.clone();
    let handle = tokio::spawn(async move { watcher.watch(tx, child_cancel).await });

    let first = rx.recv().await.unwrap();
    let second = rx.recv().await.unwrap();
    assert_eq!(first.text(), "new");
    assert_eq!(second.text(), "newer");
    assert!(rx.recv().await.is_none());

    cancel.cancel();
    let _ = handle.await.unwrap();
}

#[tokio::test]
async fn persists_final_state_reflecting_the_last_forwarded_message() {
    let reader = Arc::new(FakeReader::new("t", vec![message("t", 1, "a"), message("t", 2, "b")]));
    let persister = Arc::new(RecordingPersister::new());
    let watcher = Watcher::new(reader, persister.clone(), State::default());

    let (tx, mut rx) = mpsc::channel(4);
    let cancel = CancellationToken::new();
    let child_cancel = cancel.clone();
    let handle = tokio::spawn(async move { watcher.watch(tx, child_cancel).await });

    while rx.recv().await.is_some() {}
    cancel.cancel();
    let _ = handle.await.unwrap();

    let saved = persister.saved.lock();
    let last = saved.last().expect("a final save happened");
    assert_eq!(last.timestamp, ts(2));
}
