// SPDX-License-Identifier: MIT

//! [`Formatter`] and its three implementations: [`PlainFormatter`],
//! [`JsonFormatter`], [`TemplateFormatter`].

mod json;
mod plain;
mod template;

pub use json::JsonFormatter;
pub use plain::PlainFormatter;
pub use template::{FormatError, TemplateFormatter};

use logtrap_core::Message;

/// Renders a single [`Message`] as one line of output.
///
/// Implementations are a closed set known at compile time, so this is
/// modeled as a trait object only where the Action needs to hold
/// whichever one the configuration picked; the variants themselves never
/// need exhaustive matching from outside this module.
pub trait Formatter: Send + Sync {
    fn format(&self, message: &Message) -> Result<String, FormatError>;
}
