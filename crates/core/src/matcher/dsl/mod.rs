// SPDX-License-Identifier: MIT

//! The matcher DSL: a small s-expression language for configuring
//! matchers alongside the structured form.
//!
//! An expression is either a parenthesised function application
//! `(name arg arg ...)` or a double-quoted text literal used as an
//! argument. See [`compile::compile`] for the full grammar.

pub mod compile;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod token;
