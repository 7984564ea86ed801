// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn splits_timestamp_and_text_on_the_first_space() {
    let (ts, text) = split_timestamp("2024-01-02T03:04:05.123456789Z hello world").unwrap();
    assert_eq!(ts.to_rfc3339(), "2024-01-02T03:04:05.123456789+00:00");
    assert_eq!(text, "hello world");
}

#[test]
fn rejects_a_line_with_no_space() {
    let result = split_timestamp("no-space-here");
    assert!(matches!(result, Err(ReaderError::LineFormat { .. })));
}

#[test]
fn rejects_an_unparseable_timestamp() {
    let result = split_timestamp("not-a-timestamp hello");
    assert!(matches!(result, Err(ReaderError::Timestamp(_))));
}
