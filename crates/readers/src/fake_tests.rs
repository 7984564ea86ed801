// SPDX-License-Identifier: MIT

use super::*;
use chrono::{TimeZone, Utc};
use logtrap_core::Fields;
use tokio::sync::mpsc;

fn message(id: &str, secs: i64, text: &str) -> Message {
    Message::new(Utc.timestamp_opt(secs, 0).unwrap(), ReaderID::new(id), text, Fields::new())
}

#[tokio::test]
async fn replays_its_scripted_messages_in_order() {
    let reader = FakeReader::new("t", vec![message("t", 1, "a"), message("t", 2, "b")]);
    let (tx, mut rx) = mpsc::channel(4);
    let cancel = CancellationToken::new();
    let child_cancel = cancel.clone();

    let handle = tokio::spawn(async move { reader.read_logs(State::default(), tx, child_cancel).await });

    assert_eq!(rx.recv().await.unwrap().text(), "a");
    assert_eq!(rx.recv().await.unwrap().text(), "b");

    cancel.cancel();
    let result = handle.await.unwrap();
    assert!(matches!(result, Err(ReaderError::Cancelled)));
}

#[tokio::test]
async fn stops_without_error_once_the_receiver_is_dropped() {
    let reader = FakeReader::new("t", vec![message("t", 1, "a"), message("t", 2, "b")]);
    let (tx, rx) = mpsc::channel(4);
    drop(rx);

    let result = reader.read_logs(State::default(), tx, CancellationToken::new()).await;
    assert!(result.is_ok());
}
