// SPDX-License-Identifier: MIT

//! Persisted reader progress.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Progress marker a [`crate::Reader`] hands to its persister.
///
/// `num_messages` counts how many messages have been read at `timestamp`;
/// readers resuming from a saved state use it to skip messages already
/// delivered at the boundary timestamp before forwarding new ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    #[serde(rename = "time")]
    pub timestamp: DateTime<Utc>,
    pub num_messages: u64,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub cursor: String,
}

impl Default for State {
    fn default() -> Self {
        let epoch = DateTime::<Utc>::from_naive_utc_and_offset(Default::default(), Utc);
        Self { timestamp: epoch, num_messages: 0, cursor: String::new() }
    }
}

impl State {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self { timestamp, num_messages: 1, cursor: String::new() }
    }

    /// Returns a new `State` with `timestamp` applied. If the timestamp has
    /// advanced past the current one, `num_messages` resets to 0 before
    /// being incremented, so it always ends up `>= 1`.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        if timestamp > self.timestamp {
            self.timestamp = timestamp;
            self.num_messages = 0;
        }

        self.num_messages += 1;

        self
    }

    #[must_use]
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = cursor.into();
        self
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "State{{ts={} same_timestamp={} cursor={:?}}}",
            self.timestamp.to_rfc3339(),
            self.num_messages,
            self.cursor,
        )
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
