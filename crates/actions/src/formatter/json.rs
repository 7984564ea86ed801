// SPDX-License-Identifier: MIT

//! One JSON object per message, followed by a newline.

use super::{FormatError, Formatter};
use logtrap_core::Message;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, message: &Message) -> Result<String, FormatError> {
        let mut line = serde_json::to_string(message).map_err(FormatError::Json)?;
        line.push('\n');
        Ok(line)
    }
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
