// SPDX-License-Identifier: MIT

//! Message matching: the structured [`Matcher`] tree and its DSL front end.

pub mod dsl;

use crate::message::Message;
use regex::Regex;
use thiserror::Error;

pub use dsl::compile::compile;
pub use dsl::parser::ParseError;

/// Errors raised while constructing or compiling a [`Matcher`].
#[derive(Debug, Error, Clone)]
pub enum MatcherError {
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// A predicate over a [`Message`], either terminal (inspecting the
/// message's text or a single field) or composite (combining other
/// matchers).
#[derive(Debug, Clone)]
pub enum Matcher {
    Any,
    Not(Box<Matcher>),
    And(Vec<Matcher>),
    Or(Vec<Matcher>),
    String(String),
    Substring(String),
    Prefix(String),
    Suffix(String),
    Regexp(Box<Regex>),
    Field { name: String, pattern: Box<Regex> },
}

impl Matcher {
    pub fn regexp(pattern: &str) -> Result<Matcher, MatcherError> {
        let compiled = Regex::new(pattern).map_err(|source| MatcherError::InvalidPattern { pattern: pattern.to_string(), source })?;
        Ok(Matcher::Regexp(Box::new(compiled)))
    }

    pub fn field(name: impl Into<String>, pattern: &str) -> Result<Matcher, MatcherError> {
        let compiled = Regex::new(pattern).map_err(|source| MatcherError::InvalidPattern { pattern: pattern.to_string(), source })?;
        Ok(Matcher::Field { name: name.into(), pattern: Box::new(compiled) })
    }

    /// Evaluates this matcher against `message`.
    pub fn match_message(&self, message: &Message) -> bool {
        match self {
            Matcher::Any => true,
            Matcher::Not(inner) => !inner.match_message(message),
            Matcher::And(children) => children.iter().all(|child| child.match_message(message)),
            Matcher::Or(children) => children.iter().any(|child| child.match_message(message)),
            Matcher::String(expected) => message.text() == expected,
            Matcher::Substring(needle) => message.text().contains(needle.as_str()),
            Matcher::Prefix(prefix) => message.text().starts_with(prefix.as_str()),
            Matcher::Suffix(suffix) => message.text().ends_with(suffix.as_str()),
            Matcher::Regexp(pattern) => pattern.is_match(message.text()),
            Matcher::Field { name, pattern } => match message.fields.get(name) {
                Some(value) => pattern.is_match(value),
                None => false,
            },
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
