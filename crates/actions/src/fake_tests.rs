// SPDX-License-Identifier: MIT

use super::*;
use chrono::{TimeZone, Utc};
use logtrap_core::{Fields, ReaderID};

fn message(text: &str) -> Message {
    Message::new(Utc.timestamp_opt(0, 0).unwrap(), ReaderID::new("r"), text, Fields::new())
}

#[tokio::test]
async fn records_each_bundle_it_is_invoked_with() {
    let action = FakeAction::new();
    action.perform(&[message("a")]).await.unwrap();
    action.perform(&[message("b"), message("c")]).await.unwrap();

    let bundles = action.bundles();
    assert_eq!(bundles.len(), 2);
    assert_eq!(bundles[1].len(), 2);
}

#[tokio::test]
async fn fail_next_call_returns_an_error_exactly_once() {
    let action = FakeAction::new();
    action.fail_next_call();

    assert!(action.perform(&[message("a")]).await.is_err());
    assert!(action.perform(&[message("b")]).await.is_ok());
    assert_eq!(action.bundles().len(), 1);
}
