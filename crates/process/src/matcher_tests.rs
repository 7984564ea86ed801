// SPDX-License-Identifier: MIT

use super::*;
use chrono::{TimeZone, Utc};
use logtrap_actions::FakeAction;
use logtrap_core::{Fields, ReaderID};

fn message(text: &str) -> Message {
    Message::new(Utc.timestamp_opt(0, 0).unwrap(), ReaderID::new("r"), text, Fields::new())
}

fn bundles_as_text(action: &FakeAction) -> Vec<Vec<String>> {
    action.bundles().into_iter().map(|bundle| bundle.iter().map(|m| m.text().to_string()).collect()).collect()
}

#[tokio::test]
async fn single_line_mode_flushes_every_matched_message_immediately() {
    let action = Arc::new(FakeAction::new());
    let config = MatcherConfig { start: Matcher::Substring("ERROR".to_string()), end: None, include_end: false, max_lines: 0, group_by: vec![] };
    let mut processor = MatcherProcessor::new(config, action.clone());

    for line in ["ERROR boot", "ok", "ERROR disk"] {
        processor.process_message(message(line)).await.unwrap();
    }

    assert_eq!(bundles_as_text(&action), vec![vec!["ERROR boot".to_string()], vec!["ERROR disk".to_string()]]);
}

#[tokio::test]
async fn multi_line_excludes_the_end_line_and_leaves_the_next_group_open_for_tick() {
    let action = Arc::new(FakeAction::new());
    let config = MatcherConfig {
        start: Matcher::Prefix("BEGIN".to_string()),
        end: Some(Matcher::Prefix("END".to_string())),
        include_end: false,
        max_lines: 0,
        group_by: vec![],
    };
    let mut processor = MatcherProcessor::new(config, action.clone());

    for line in ["BEGIN", "a", "b", "END", "noise", "BEGIN", "c"] {
        processor.process_message(message(line)).await.unwrap();
    }

    assert_eq!(bundles_as_text(&action), vec![vec!["BEGIN".to_string(), "a".to_string(), "b".to_string()]]);

    processor.tick(Utc::now()).await.unwrap();
    assert_eq!(bundles_as_text(&action), vec![vec!["BEGIN".to_string(), "a".to_string(), "b".to_string()], vec!["BEGIN".to_string(), "c".to_string()]]);
}

#[tokio::test]
async fn max_lines_overflow_flushes_at_the_nplus1th_message() {
    let action = Arc::new(FakeAction::new());
    let config = MatcherConfig { start: Matcher::Any, end: Some(Matcher::Substring("stop".to_string())), include_end: true, max_lines: 2, group_by: vec![] };
    let mut processor = MatcherProcessor::new(config, action.clone());

    for line in ["x", "y", "z"] {
        processor.process_message(message(line)).await.unwrap();
    }

    assert_eq!(bundles_as_text(&action), vec![vec!["x".to_string(), "y".to_string(), "z".to_string()]]);
    assert!(processor.groups.is_empty());
}

#[tokio::test]
async fn include_end_keeps_the_end_line_in_the_flushed_bundle() {
    let action = Arc::new(FakeAction::new());
    let config = MatcherConfig {
        start: Matcher::Prefix("BEGIN".to_string()),
        end: Some(Matcher::Prefix("END".to_string())),
        include_end: true,
        max_lines: 0,
        group_by: vec![],
    };
    let mut processor = MatcherProcessor::new(config, action.clone());

    for line in ["BEGIN", "a", "END"] {
        processor.process_message(message(line)).await.unwrap();
    }

    assert_eq!(bundles_as_text(&action), vec![vec!["BEGIN".to_string(), "a".to_string(), "END".to_string()]]);
}

#[tokio::test]
async fn group_by_keeps_independent_open_groups_per_field_value() {
    let action = Arc::new(FakeAction::new());
    let config = MatcherConfig {
        start: Matcher::Prefix("BEGIN".to_string()),
        end: Some(Matcher::Prefix("END".to_string())),
        include_end: false,
        max_lines: 0,
        group_by: vec!["pod".to_string()],
    };
    let mut processor = MatcherProcessor::new(config, action.clone());

    let mut fields_a = Fields::new();
    fields_a.insert("pod".to_string(), "a".to_string());
    let mut fields_b = Fields::new();
    fields_b.insert("pod".to_string(), "b".to_string());

    let begin_a = Message::new(Utc::now(), ReaderID::new("r"), "BEGIN", fields_a.clone());
    let begin_b = Message::new(Utc::now(), ReaderID::new("r"), "BEGIN", fields_b.clone());
    let end_a = Message::new(Utc::now(), ReaderID::new("r"), "END", fields_a);
    let end_b = Message::new(Utc::now(), ReaderID::new("r"), "END", fields_b);

    processor.process_message(begin_a).await.unwrap();
    processor.process_message(begin_b).await.unwrap();
    processor.process_message(end_a).await.unwrap();
    processor.process_message(end_b).await.unwrap();

    let bundles = bundles_as_text(&action);
    assert_eq!(bundles.len(), 2);
    assert!(bundles.iter().all(|b| b == &vec!["BEGIN".to_string()]));
}

#[tokio::test]
async fn discards_lines_before_a_start_match() {
    let action = Arc::new(FakeAction::new());
    let config = MatcherConfig { start: Matcher::Substring("ERROR".to_string()), end: None, include_end: false, max_lines: 0, group_by: vec![] };
    let mut processor = MatcherProcessor::new(config, action.clone());

    processor.process_message(message("debug noise")).await.unwrap();
    assert!(action.bundles().is_empty());
}
