// SPDX-License-Identifier: MIT

//! The in-memory configuration tree described in spec.md §6, expressed as
//! `serde`-deserializable structs over TOML.
//!
//! Loading the full production configuration (environment overlays,
//! schema migration, ...) is out of scope; this is the minimal shape the
//! [`crate::Factory`] needs to materialize a set of pipelines.

use crate::error::ConfigError;
use logtrap_core::State;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub readers: Vec<ReaderConfig>,
    #[serde(default)]
    pub actions: HashMap<String, ActionConfig>,
    #[serde(default)]
    pub processors: HashMap<String, ProcessorConfig>,
    #[serde(default)]
    pub persister: PersisterConfig,
}

impl Config {
    pub fn from_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = tokio::fs::read_to_string(path).await?;
        Self::from_str(&contents)
    }
}

/// `{ id?, type, processors: [name], initial_state? }`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReaderConfig {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub processors: Vec<String>,
    pub initial_state: Option<State>,
    /// Container-engine readers only: the Docker daemon socket to connect
    /// to. `None` uses `bollard`'s platform default.
    #[serde(default)]
    pub docker_host: Option<String>,
}

impl ReaderConfig {
    /// `id` if set, else `type` — the effective reader ID from spec.md §6.
    pub fn effective_id(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.kind)
    }
}

/// `{ type: "log"|"notify", log?, notify? }`.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub log: Option<LogActionConfig>,
    pub notify: Option<NotifyActionConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogActionConfig {
    /// `"plain"`, `"json"`, or `"template"`.
    pub format: String,
    pub template: Option<String>,
    pub open_tag: Option<char>,
    pub close_tag: Option<char>,
    pub quote_open: Option<String>,
    pub quote_close: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotifyActionConfig {
    pub title_format: String,
    pub body_format: String,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub max_title_size: usize,
    #[serde(default)]
    pub max_body_size: usize,
}

/// `{ type: "any"|"matcher", action: name, matcher? }`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessorConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub action: String,
    pub matcher: Option<MatcherProcessorConfig>,
}

/// `{start_line, end_line?, include_end, max_lines, group_by: [field_name]}`;
/// `start_line`/`end_line` are matcher DSL source, compiled via
/// [`logtrap_core::matcher::compile`].
#[derive(Debug, Clone, Deserialize)]
pub struct MatcherProcessorConfig {
    pub start_line: String,
    pub end_line: Option<String>,
    #[serde(default)]
    pub include_end: bool,
    #[serde(default)]
    pub max_lines: usize,
    #[serde(default)]
    pub group_by: Vec<String>,
}

/// `{ type: "noop"|"file", file?: { dir } }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersisterConfig {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub file: Option<FilePersisterConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilePersisterConfig {
    pub dir: String,
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
