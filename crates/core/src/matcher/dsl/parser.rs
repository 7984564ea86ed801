// SPDX-License-Identifier: MIT

//! Recursive-descent-over-a-stack parser for the matcher DSL.

use super::lexer::LexerError;
use super::span::{context_snippet, Span};
use super::token::{Token, TokenKind};
use thiserror::Error;

/// One parsed DSL expression: a text literal or a function application.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Text { value: String, span: Span },
    Fn { name: String, args: Vec<Expr>, span: Span },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Text { span, .. } => *span,
            Expr::Fn { span, .. } => *span,
        }
    }
}

const KNOWN_FUNCTIONS: &[&str] =
    &["and", "or", "not", "any", "field", "eq", "string", "substring", "pre", "prefix", "suf", "suffix", "re", "regexp"];

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("lexer error: {0}")]
    Lexer(#[from] LexerError),

    #[error("empty expression at position {}", span.start)]
    EmptyExpression { span: Span },

    #[error("no expressions in input")]
    EmptyRoot,

    #[error("text literal at root position {}", span.start)]
    TextAtRoot { span: Span },

    #[error("unmatched ')' at position {}", span.start)]
    UnmatchedCloseParen { span: Span },

    #[error("unclosed '(' starting at position {}", span.start)]
    UnclosedParen { span: Span },

    #[error("unknown function '{name}' at position {}", span.start)]
    UnknownFunction { name: String, span: Span },

    #[error("unexpected {found} at position {}", span.start)]
    UnexpectedToken { found: TokenKind, span: Span },

    #[error("'{name}' expects {expected} argument(s), got {got}")]
    ArityMismatch { name: String, expected: &'static str, got: usize, span: Span },
}

impl ParseError {
    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::Lexer(e) => Some(e.span()),
            ParseError::EmptyRoot => None,
            ParseError::EmptyExpression { span }
            | ParseError::TextAtRoot { span }
            | ParseError::UnmatchedCloseParen { span }
            | ParseError::UnclosedParen { span }
            | ParseError::UnknownFunction { span, .. }
            | ParseError::UnexpectedToken { span, .. }
            | ParseError::ArityMismatch { span, .. } => Some(*span),
        }
    }

    pub fn diagnostic(&self, source: &str) -> String {
        match self.span() {
            Some(span) => format!("{}\n{}", self, context_snippet(source, span)),
            None => self.to_string(),
        }
    }
}

struct Frame {
    name: Option<(String, Span)>,
    open: Span,
    args: Vec<Expr>,
}

/// Parses `tokens` into the top-level list of expressions (the Root).
///
/// Consumes one token at a time, pushing a [`Frame`] on `(` and popping it
/// into a completed [`Expr::Fn`] on `)`.
pub fn parse(tokens: Vec<Token>) -> Result<Vec<Expr>, ParseError> {
    let mut root = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();

    for token in tokens {
        match token.kind {
            TokenKind::LParen => {
                stack.push(Frame { name: None, open: token.span, args: Vec::new() });
            }
            TokenKind::RParen => {
                let frame = stack.pop().ok_or(ParseError::UnmatchedCloseParen { span: token.span })?;
                let (name, name_span) = frame.name.ok_or(ParseError::EmptyExpression { span: frame.open })?;

                if !KNOWN_FUNCTIONS.contains(&name.as_str()) {
                    return Err(ParseError::UnknownFunction { name, span: name_span });
                }

                let span = frame.open.merge(token.span);
                let expr = Expr::Fn { name, args: frame.args, span };

                match stack.last_mut() {
                    Some(parent) => parent.args.push(expr),
                    None => root.push(expr),
                }
            }
            TokenKind::Function(name) => match stack.last_mut() {
                Some(frame) if frame.name.is_none() => {
                    frame.name = Some((name, token.span));
                }
                Some(_) | None => {
                    return Err(ParseError::UnexpectedToken { found: TokenKind::Function(name), span: token.span });
                }
            },
            TokenKind::Text(value) => match stack.last_mut() {
                Some(frame) if frame.name.is_some() => {
                    frame.args.push(Expr::Text { value, span: token.span });
                }
                _ => return Err(ParseError::TextAtRoot { span: token.span }),
            },
        }
    }

    if let Some(frame) = stack.pop() {
        return Err(ParseError::UnclosedParen { span: frame.open });
    }

    if root.is_empty() {
        return Err(ParseError::EmptyRoot);
    }

    Ok(root)
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
