// SPDX-License-Identifier: MIT

//! [`ReaderID`] — a string unique across the process.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of a [`crate::message::Message`] source.
///
/// Readers that fan out into children (the container-engine reader) derive
/// child IDs by appending `":"` and a distinguishing token, e.g.
/// `container:abcd1234`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReaderID(String);

impl ReaderID {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive a child ID by appending `:` and `token`.
    pub fn child(&self, token: impl fmt::Display) -> Self {
        Self(format!("{}:{}", self.0, token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReaderID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ReaderID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ReaderID {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
#[path = "reader_id_tests.rs"]
mod tests;
