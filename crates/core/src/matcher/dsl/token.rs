// SPDX-License-Identifier: MIT

//! Token types for the matcher DSL lexer.

use super::span::Span;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    LParen,
    RParen,
    /// A bare identifier naming a matcher function, e.g. `and`, `field`, `re`.
    Function(String),
    /// A double-quoted text literal, already unescaped.
    Text(String),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::Function(name) => write!(f, "function '{name}'"),
            TokenKind::Text(text) => write!(f, "text {text:?}"),
        }
    }
}
