// SPDX-License-Identifier: MIT

use super::fake::FakeNotifier;
use super::*;
use crate::formatter::PlainFormatter;
use chrono::{TimeZone, Utc};
use logtrap_core::{Fields, ReaderID};

fn message(text: &str) -> Message {
    Message::new(Utc.timestamp_opt(0, 0).unwrap(), ReaderID::new("r"), text, Fields::new())
}

#[tokio::test]
async fn empty_bundle_is_rejected() {
    let notifier = Arc::new(FakeNotifier::new());
    let action = NotifyAction::new(Arc::new(PlainFormatter), Arc::new(PlainFormatter), 0, 0, vec![notifier]);

    let result = action.perform(&[]).await;
    assert!(matches!(result, Err(ActionError::EmptyBundle)));
}

#[tokio::test]
async fn title_comes_from_the_first_message_body_from_all() {
    let notifier = Arc::new(FakeNotifier::new());
    let action = NotifyAction::new(Arc::new(PlainFormatter), Arc::new(PlainFormatter), 0, 0, vec![notifier.clone()]);

    action.perform(&[message("first"), message("second")]).await.unwrap();

    let calls = notifier.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].title.contains("first"));
    assert!(calls[0].body.contains("first"));
    assert!(calls[0].body.contains("second"));
}

#[tokio::test]
async fn truncates_title_and_body_to_their_configured_sizes() {
    let notifier = Arc::new(FakeNotifier::new());
    let action = NotifyAction::new(Arc::new(PlainFormatter), Arc::new(PlainFormatter), 5, 10, vec![notifier.clone()]);

    action.perform(&[message("a-much-longer-message")]).await.unwrap();

    let calls = notifier.calls();
    assert_eq!(calls[0].title.chars().count(), 5);
    assert_eq!(calls[0].body.chars().count(), 10);
}

#[tokio::test]
async fn zero_max_size_means_unlimited() {
    let notifier = Arc::new(FakeNotifier::new());
    let action = NotifyAction::new(Arc::new(PlainFormatter), Arc::new(PlainFormatter), 0, 0, vec![notifier.clone()]);

    action.perform(&[message("a-much-longer-message-than-any-small-limit")]).await.unwrap();

    let calls = notifier.calls();
    assert!(calls[0].title.contains("a-much-longer-message"));
}
