// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! logtrap-process: the [`Processor`] capability and its three
//! implementations.
//!
//! - [`processor`] — the `Processor` trait
//! - [`any`] — `AnyProcessor`, one action invocation per message
//! - [`serial`] — `SerialProcessor`, an ordered chain that stops on error
//! - [`matcher`] — `MatcherProcessor`, the multi-line grouping core

pub mod any;
pub mod error;
pub mod matcher;
pub mod processor;
pub mod serial;

pub use any::AnyProcessor;
pub use error::ProcessError;
pub use matcher::{MatcherConfig, MatcherProcessor};
pub use processor::Processor;
pub use serial::SerialProcessor;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeProcessor;
