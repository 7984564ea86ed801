// SPDX-License-Identifier: MIT

//! [`MatcherProcessor`] — the multi-line grouping core: opens a group on
//! a start-line match, appends until an end-line match or a line-count
//! overflow, then flushes the whole group through its action.

use crate::error::ProcessError;
use crate::processor::Processor;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use logtrap_actions::Action;
use logtrap_core::{Clock, Matcher, Message, SystemClock};
use std::collections::HashMap;
use std::sync::Arc;

/// Static configuration for a [`MatcherProcessor`], mirroring the
/// `{start, end?, include_end, max_lines, group_by[], action}` shape from
/// spec.md §4.5.1.
#[derive(Clone)]
pub struct MatcherConfig {
    pub start: Matcher,
    pub end: Option<Matcher>,
    pub include_end: bool,
    /// `0` means unbounded.
    pub max_lines: usize,
    pub group_by: Vec<String>,
}

/// One open multi-line match: the messages accumulated so far and when
/// the group was opened.
struct Group {
    created_at: DateTime<Utc>,
    messages: Vec<Message>,
}

pub struct MatcherProcessor {
    config: MatcherConfig,
    action: Arc<dyn Action>,
    clock: Arc<dyn Clock>,
    groups: HashMap<String, Group>,
}

impl MatcherProcessor {
    pub fn new(config: MatcherConfig, action: Arc<dyn Action>) -> Self {
        Self::with_clock(config, action, Arc::new(SystemClock))
    }

    pub fn with_clock(config: MatcherConfig, action: Arc<dyn Action>, clock: Arc<dyn Clock>) -> Self {
        Self { config, action, clock, groups: HashMap::new() }
    }

    /// `reader_id` concatenated with each `group_by` field's value,
    /// prefixed by `_`; an empty `group_by` collapses to just
    /// `reader_id`.
    fn group_key(&self, message: &Message) -> String {
        let reader_id = message.reader_id.as_ref().map(ToString::to_string).unwrap_or_default();
        let mut key = reader_id;
        for field in &self.config.group_by {
            key.push('_');
            if let Some(value) = message.fields.get(field) {
                key.push_str(value);
            }
        }
        key
    }

    async fn flush(&mut self, key: &str) -> Result<(), ProcessError> {
        let Some(group) = self.groups.remove(key) else {
            return Ok(());
        };
        self.action.perform(&group.messages).await.map_err(ProcessError::from)
    }
}

#[async_trait]
impl Processor for MatcherProcessor {
    async fn process_message(&mut self, message: Message) -> Result<(), ProcessError> {
        let key = self.group_key(&message);

        if !self.groups.contains_key(&key) {
            if !self.config.start.match_message(&message) {
                return Ok(());
            }

            self.groups.insert(key.clone(), Group { created_at: self.clock.now(), messages: vec![message] });

            if self.config.end.is_none() {
                return self.flush(&key).await;
            }

            return Ok(());
        }

        let is_end = self.config.end.as_ref().is_some_and(|end| end.match_message(&message));

        if !is_end || self.config.include_end {
            if let Some(group) = self.groups.get_mut(&key) {
                group.messages.push(message);
            }
        }

        let overflowed = self.config.max_lines > 0 && self.groups.get(&key).map(|g| g.messages.len()).unwrap_or(0) > self.config.max_lines;

        if overflowed || is_end {
            self.flush(&key).await
        } else {
            Ok(())
        }
    }

    async fn tick(&mut self, _now: DateTime<Utc>) -> Result<(), ProcessError> {
        let keys: Vec<String> = self.groups.keys().cloned().collect();
        let mut failures = 0usize;

        for key in keys {
            if self.flush(&key).await.is_err() {
                failures += 1;
            }
        }

        if failures > 0 {
            Err(ProcessError::TickFailures(failures))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "matcher_tests.rs"]
mod tests;
