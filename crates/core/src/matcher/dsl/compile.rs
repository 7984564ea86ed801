// SPDX-License-Identifier: MIT

//! Compiles DSL source into a [`Matcher`] tree.

use super::lexer::lex;
use super::parser::{parse, Expr, ParseError};
use super::span::Span;
use crate::matcher::{Matcher, MatcherError};

/// Parses and compiles `source` into a [`Matcher`].
///
/// A Root of exactly one expression compiles to that matcher directly; a
/// Root of more than one compiles to an implicit `and` over all of them.
pub fn compile(source: &str) -> Result<Matcher, MatcherError> {
    let tokens = lex(source).map_err(ParseError::Lexer)?;
    let root = parse(tokens)?;

    let mut matchers = root.into_iter().map(compile_expr).collect::<Result<Vec<_>, _>>()?;

    if matchers.len() == 1 {
        Ok(matchers.remove(0))
    } else {
        Ok(Matcher::And(matchers))
    }
}

fn compile_expr(expr: Expr) -> Result<Matcher, MatcherError> {
    let Expr::Fn { name, args, span } = expr else {
        // The parser rejects a bare Expr::Text at this level (TextAtRoot),
        // so this arm only fires for arguments, which go through
        // `expect_text` instead and never reach here.
        return Err(ParseError::TextAtRoot { span: expr.span() }.into());
    };

    match name.as_str() {
        "any" => {
            one_of::<0>(&name, args, span)?;
            Ok(Matcher::Any)
        }
        "not" => {
            let [inner] = one_of(&name, args, span)?;
            Ok(Matcher::Not(Box::new(compile_expr(inner)?)))
        }
        "and" => Ok(Matcher::And(one_or_more(&name, args, span)?.into_iter().map(compile_expr).collect::<Result<_, _>>()?)),
        "or" => Ok(Matcher::Or(one_or_more(&name, args, span)?.into_iter().map(compile_expr).collect::<Result<_, _>>()?)),
        "field" => {
            let [field_name, pattern] = one_of(&name, args, span)?;
            Matcher::field(expect_text(field_name)?, &expect_text(pattern)?)
        }
        "eq" | "string" => {
            let [text] = one_of(&name, args, span)?;
            Ok(Matcher::String(expect_text(text)?))
        }
        "substring" => {
            let [text] = one_of(&name, args, span)?;
            Ok(Matcher::Substring(expect_text(text)?))
        }
        "pre" | "prefix" => {
            let [text] = one_of(&name, args, span)?;
            Ok(Matcher::Prefix(expect_text(text)?))
        }
        "suf" | "suffix" => {
            let [text] = one_of(&name, args, span)?;
            Ok(Matcher::Suffix(expect_text(text)?))
        }
        "re" | "regexp" => {
            let [text] = one_of(&name, args, span)?;
            Matcher::regexp(&expect_text(text)?)
        }
        other => Err(ParseError::UnknownFunction { name: other.to_string(), span }.into()),
    }
}

/// Converts `args` into a fixed-size array, or an [`ParseError::ArityMismatch`]
/// naming `expected` by the array's own length.
fn one_of<const N: usize>(name: &str, args: Vec<Expr>, span: Span) -> Result<[Expr; N], MatcherError> {
    let got = args.len();
    <[Expr; N]>::try_from(args).map_err(|_| {
        let expected: &'static str = match N {
            0 => "0",
            1 => "1",
            2 => "2",
            _ => "more",
        };
        ParseError::ArityMismatch { name: name.to_string(), expected, got, span }.into()
    })
}

fn one_or_more(name: &str, args: Vec<Expr>, span: Span) -> Result<Vec<Expr>, MatcherError> {
    if args.is_empty() {
        return Err(ParseError::ArityMismatch { name: name.to_string(), expected: "1 or more", got: 0, span }.into());
    }
    Ok(args)
}

/// Terminal matchers expect a text literal argument, not a nested function.
fn expect_text(expr: Expr) -> Result<String, MatcherError> {
    match expr {
        Expr::Text { value, .. } => Ok(value),
        Expr::Fn { name, span, .. } => {
            Err(ParseError::UnexpectedToken { found: super::token::TokenKind::Function(name), span }.into())
        }
    }
}

#[cfg(test)]
#[path = "compile_tests.rs"]
mod tests;
