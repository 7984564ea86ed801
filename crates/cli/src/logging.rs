// SPDX-License-Identifier: MIT

//! Structured logging setup, following the teacher's `tracing` +
//! `tracing-subscriber` (env-filter, fmt) wiring.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs a global subscriber writing to stderr. Honors `RUST_LOG`,
/// defaulting to `info` when unset or invalid.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry().with(filter).with(fmt::layer().with_writer(std::io::stderr)).try_init();
}
