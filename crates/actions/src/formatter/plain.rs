// SPDX-License-Identifier: MIT

//! `"<RFC3339-nano-timestamp> <reader_id> <fields>\n"`.

use super::{FormatError, Formatter};
use logtrap_core::Message;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, Default)]
pub struct PlainFormatter;

impl Formatter for PlainFormatter {
    fn format(&self, message: &Message) -> Result<String, FormatError> {
        let reader_id = message.reader_id.as_ref().map(ToString::to_string).unwrap_or_default();

        let mut out = format!("{} {} ", message.timestamp.to_rfc3339_opts(chrono::SecondsFormat::Nanos, true), reader_id);

        for (i, (key, value)) in message.fields.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{key}={value:?}");
        }
        out.push('\n');

        Ok(out)
    }
}

#[cfg(test)]
#[path = "plain_tests.rs"]
mod tests;
