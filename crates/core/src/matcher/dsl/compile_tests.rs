// SPDX-License-Identifier: MIT

use super::*;
use crate::message::Fields;
use crate::reader_id::ReaderID;
use chrono::{TimeZone, Utc};

fn message(text: &str) -> crate::message::Message {
    crate::message::Message::new(Utc.timestamp_opt(0, 0).unwrap(), ReaderID::new("t"), text, Fields::new())
}

#[test]
fn single_root_expression_compiles_directly() {
    let matcher = compile("(any)").unwrap();
    assert!(matches!(matcher, Matcher::Any));
}

#[test]
fn multiple_root_expressions_become_implicit_and() {
    let matcher = compile(r#"(any) (not (any))"#).unwrap();
    assert!(matches!(matcher, Matcher::And(_)));
    assert!(!matcher.match_message(&message("x")));
}

#[test]
fn or_of_two_equality_matchers() {
    let matcher = compile(r#"(or (eq "a") (eq "b"))"#).unwrap();
    assert!(matcher.match_message(&message("a")));
    assert!(matcher.match_message(&message("b")));
    assert!(!matcher.match_message(&message("c")));
}

#[test]
fn field_matcher_compiles_with_two_text_args() {
    let matcher = compile(r#"(field "unit" "ssh.*")"#).unwrap();
    let mut fields = Fields::new();
    fields.insert("unit".to_string(), "sshd.service".to_string());
    let msg = crate::message::Message::new(Utc.timestamp_opt(0, 0).unwrap(), ReaderID::new("t"), "x", fields);
    assert!(matcher.match_message(&msg));
}

#[test]
fn unary_function_with_wrong_arity_is_rejected() {
    let err = compile(r#"(not (eq "a") (eq "b"))"#).unwrap_err();
    assert!(matches!(err, MatcherError::Parse(ParseError::ArityMismatch { .. })));
}

#[test]
fn any_with_arguments_is_rejected() {
    let err = compile(r#"(any "x")"#).unwrap_err();
    assert!(matches!(err, MatcherError::Parse(ParseError::ArityMismatch { .. })));
}

#[test]
fn nested_function_where_text_expected_is_rejected() {
    let err = compile(r#"(eq (any))"#).unwrap_err();
    assert!(matches!(err, MatcherError::Parse(ParseError::UnexpectedToken { .. })));
}

#[test]
fn invalid_regexp_surfaces_invalid_pattern() {
    let err = compile(r#"(re "(unclosed")"#).unwrap_err();
    assert!(matches!(err, MatcherError::InvalidPattern { .. }));
}
