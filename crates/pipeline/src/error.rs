// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Failures building a [`crate::Pipeline`] set from a [`crate::Config`].
///
/// All variants are fatal to startup: none of them are recoverable once
/// the process is already running pipelines.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown reader type {kind:?}")]
    UnknownReaderType { kind: String },

    #[error("unknown action type {kind:?}")]
    UnknownActionType { kind: String },

    #[error("unknown processor type {kind:?}")]
    UnknownProcessorType { kind: String },

    #[error("unknown persister type {kind:?}")]
    UnknownPersisterType { kind: String },

    #[error("duplicate reader id {id:?}")]
    DuplicateReaderId { id: String },

    #[error("processor {processor:?} references undefined action {action:?}")]
    UndefinedAction { processor: String, action: String },

    #[error("undefined processor {processor:?}")]
    UndefinedProcessor { processor: String },

    #[error("invalid matcher pattern: {0}")]
    Matcher(#[from] logtrap_core::MatcherError),

    #[error("invalid formatter template: {0}")]
    Format(#[from] logtrap_actions::formatter::FormatError),

    #[error("unknown log format {format:?}")]
    UnknownFormat { format: String },

    #[error("unknown notify service {service:?}")]
    UnknownNotifyService { service: String },

    #[error("{context} is missing its {field} table")]
    MissingField { context: String, field: &'static str },

    #[error("reader {reader:?} requires a Docker connection: {source}")]
    Docker { reader: String, source: bollard::errors::Error },
}
