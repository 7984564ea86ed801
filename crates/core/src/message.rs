// SPDX-License-Identifier: MIT

//! The log message and the fields it carries.

use crate::reader_id::ReaderID;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Key used to store a message's free-text body inside [`Fields`].
pub const MESSAGE_FIELD: &str = "MESSAGE";

/// Key-value pairs attached to a [`Message`].
///
/// A `BTreeMap` rather than a hash map keeps field order stable across
/// formatting and tests.
pub type Fields = BTreeMap<String, String>;

/// Which stream a message was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Source {
    #[default]
    Undefined,
    Stdout,
    Stderr,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Source::Undefined => "undefined",
            Source::Stdout => "stdout",
            Source::Stderr => "stderr",
        };
        f.write_str(name)
    }
}

/// A single log entry as read off a source, before any matching or
/// formatting has been applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "ts")]
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub cursor: String,
    #[serde(skip_serializing_if = "Fields::is_empty", default)]
    pub fields: Fields,
    #[serde(skip_serializing_if = "is_undefined", default)]
    pub source: Source,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reader_id: Option<ReaderID>,
}

fn is_undefined(source: &Source) -> bool {
    *source == Source::Undefined
}

impl Message {
    /// Builds a message, storing `text` under [`MESSAGE_FIELD`] alongside
    /// any `extra` fields.
    pub fn new(timestamp: DateTime<Utc>, reader_id: ReaderID, text: impl Into<String>, extra: Fields) -> Self {
        let mut fields = extra;
        fields.insert(MESSAGE_FIELD.to_string(), text.into());

        Self { timestamp, cursor: String::new(), fields, source: Source::Undefined, reader_id: Some(reader_id) }
    }

    #[must_use]
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = cursor.into();
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: Source) -> Self {
        self.source = source;
        self
    }

    /// The message's free-text body, or empty string if absent.
    pub fn text(&self) -> &str {
        self.fields.get(MESSAGE_FIELD).map(String::as_str).unwrap_or_default()
    }

    /// A compact one-line rendering suitable for a tracing field.
    pub fn summary(&self) -> String {
        match &self.reader_id {
            Some(id) => format!("[{id}] {}", self.text()),
            None => self.text().to_string(),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
