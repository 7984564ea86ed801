// SPDX-License-Identifier: MIT

//! `logtrapd` — the log-tailing daemon binary.
//!
//! Process bootstrap, signal handling and logger wiring live here; the
//! engine itself (readers, watchers, processors, actions, the factory
//! that wires them together from a [`logtrap_pipeline::Config`]) lives in
//! the library crates this binary only assembles and runs.

mod logging;
mod run;

use clap::{Parser, Subcommand};
use run::ConfigSource;
use std::path::PathBuf;
use std::process::ExitCode;

/// Environment variable carrying the configuration document inline,
/// overriding `--config` when no path is given.
const CONFIG_ENV_VAR: &str = "LOGTRAP_CONFIG";

#[derive(Parser)]
#[command(name = "logtrapd", version, about = "Tails logs, matches them, dispatches actions")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the daemon until cancelled (the default if no subcommand is given).
    Run,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init();

    match cli.command {
        Some(Command::Run) | None => {}
    }

    let source = match load_config_source(cli.config) {
        Ok(source) => source,
        Err(message) => {
            tracing::error!("{message}");
            return ExitCode::FAILURE;
        }
    };

    match run::run(source).await {
        Ok(run::Outcome::Cancelled) => ExitCode::SUCCESS,
        Ok(run::Outcome::PipelineFailures(count)) => {
            tracing::error!(count, "one or more pipelines exited with an error");
            ExitCode::from(1)
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start pipelines");
            ExitCode::from(2)
        }
    }
}

fn load_config_source(config_flag: Option<PathBuf>) -> Result<ConfigSource, String> {
    if let Some(path) = config_flag {
        return Ok(ConfigSource::Path(path));
    }

    if let Ok(inline) = std::env::var(CONFIG_ENV_VAR) {
        return Ok(ConfigSource::Inline(inline));
    }

    Err(format!("no configuration supplied: pass --config <path> or set {CONFIG_ENV_VAR}"))
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
