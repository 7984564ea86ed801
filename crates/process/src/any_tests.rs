// SPDX-License-Identifier: MIT

use super::*;
use chrono::{TimeZone, Utc};
use logtrap_actions::FakeAction;
use logtrap_core::{Fields, ReaderID};

fn message(text: &str) -> Message {
    Message::new(Utc.timestamp_opt(0, 0).unwrap(), ReaderID::new("r"), text, Fields::new())
}

#[tokio::test]
async fn invokes_the_action_once_per_message() {
    let action = Arc::new(FakeAction::new());
    let mut processor = AnyProcessor::new(action.clone());

    processor.process_message(message("a")).await.unwrap();
    processor.process_message(message("b")).await.unwrap();

    let bundles = action.bundles();
    assert_eq!(bundles.len(), 2);
    assert_eq!(bundles[0].len(), 1);
    assert_eq!(bundles[1][0].text(), "b");
}

#[tokio::test]
async fn tick_is_a_no_op() {
    let action = Arc::new(FakeAction::new());
    let mut processor = AnyProcessor::new(action.clone());

    processor.tick(Utc::now()).await.unwrap();
    assert!(action.bundles().is_empty());
}
