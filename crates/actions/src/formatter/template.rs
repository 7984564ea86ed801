// SPDX-License-Identifier: MIT

//! A tiny template language: literal text plus `{field}` placeholders,
//! with configurable delimiters and a quote character wrapped around
//! every substituted value.

use super::Formatter;
use logtrap_core::Message;
use thiserror::Error;

/// The conventional placeholder name that substitutes the message's
/// timestamp instead of a field lookup.
const TIMESTAMP_PLACEHOLDER: &str = "$timestamp";

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("multiple open tags at position {0}: only one placeholder may be open at a time")]
    MultipleOpenTags(usize),

    #[error("close tag at position {0} without a matching open tag")]
    CloseWithoutOpen(usize),

    #[error("unclosed tag starting at position {0}")]
    Unclosed(usize),

    #[error("failed to serialise message as JSON: {0}")]
    Json(#[source] serde_json::Error),
}

#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Field(String),
}

/// A parsed `{field}`-style template, compiled once at construction like
/// [`logtrap_core::Matcher::regexp`] compiles its pattern once.
pub struct TemplateFormatter {
    segments: Vec<Segment>,
    quote_open: String,
    quote_close: String,
}

impl TemplateFormatter {
    /// Parses `template` using `open`/`close` placeholder delimiters. Every
    /// substituted value (field or `$timestamp`) is wrapped in
    /// `quote_open`/`quote_close`.
    pub fn new(template: &str, open: char, close: char, quote_open: &str, quote_close: &str) -> Result<Self, FormatError> {
        let segments = parse(template, open, close)?;
        Ok(Self { segments, quote_open: quote_open.to_string(), quote_close: quote_close.to_string() })
    }

    /// The defaults named in spec.md §4.6: `{`, `}`, `` ` ``, `` ` ``.
    pub fn with_defaults(template: &str) -> Result<Self, FormatError> {
        Self::new(template, '{', '}', "`", "`")
    }
}

fn parse(template: &str, open: char, close: char) -> Result<Vec<Segment>, FormatError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut tag: Option<(usize, String)> = None;

    for (pos, ch) in template.char_indices() {
        if ch == open {
            if tag.is_some() {
                return Err(FormatError::MultipleOpenTags(pos));
            }
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            tag = Some((pos, String::new()));
        } else if ch == close {
            match tag.take() {
                Some((_, name)) => segments.push(Segment::Field(name)),
                None => return Err(FormatError::CloseWithoutOpen(pos)),
            }
        } else if let Some((_, name)) = tag.as_mut() {
            name.push(ch);
        } else {
            literal.push(ch);
        }
    }

    if let Some((start, _)) = tag {
        return Err(FormatError::Unclosed(start));
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    Ok(segments)
}

impl Formatter for TemplateFormatter {
    fn format(&self, message: &Message) -> Result<String, FormatError> {
        let mut out = String::new();

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(name) => {
                    let value = if name == TIMESTAMP_PLACEHOLDER {
                        go_millis_timestamp(message.timestamp)
                    } else {
                        message.fields.get(name).cloned().unwrap_or_default()
                    };
                    out.push_str(&self.quote_open);
                    out.push_str(&value);
                    out.push_str(&self.quote_close);
                }
            }
        }

        Ok(out)
    }
}

/// Renders `ts` the way Go's reference layout `2006-01-02T15:04:05.999Z`
/// would: up to three fractional-second digits, trailing zeros (and a
/// trailing bare `.`) trimmed away.
fn go_millis_timestamp(ts: chrono::DateTime<chrono::Utc>) -> String {
    let with_millis = ts.format("%Y-%m-%dT%H:%M:%S%.3f").to_string();
    let trimmed = with_millis.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed}Z")
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
