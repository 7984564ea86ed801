// SPDX-License-Identifier: MIT

//! Wires a loaded [`Config`] into running pipelines, fans them out onto
//! their own tasks, and waits for either a shutdown signal or every
//! pipeline to finish.

use logtrap_pipeline::{Config, ConfigError, Factory};
use std::path::PathBuf;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Where the configuration document came from — a file path or an
/// environment variable's inline contents (spec.md §6's CLI surface).
pub enum ConfigSource {
    Path(PathBuf),
    Inline(String),
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] ConfigError),
}

/// What the run loop ended with, for `main` to turn into an exit code.
pub enum Outcome {
    /// Every pipeline stopped because of cancellation (SIGINT/SIGTERM);
    /// this is a clean shutdown, not a failure.
    Cancelled,
    /// At least one pipeline exited with a non-cancellation error; the
    /// count is how many did.
    PipelineFailures(usize),
}

/// Loads `source`, builds one Pipeline per configured reader, runs them
/// all concurrently until either a shutdown signal fires or they all
/// finish on their own, and reports how many failed.
pub async fn run(source: ConfigSource) -> Result<Outcome, RunError> {
    let config = match source {
        ConfigSource::Path(path) => Config::from_path(&path).await.map_err(RunError::from)?,
        ConfigSource::Inline(text) => Config::from_str(&text).map_err(RunError::from)?,
    };

    let pipelines = Factory::new(&config).build_pipelines()?;
    tracing::info!(count = pipelines.len(), "pipelines built");

    let cancel = CancellationToken::new();
    let mut handles = Vec::with_capacity(pipelines.len());

    for pipeline in pipelines {
        let reader_id = pipeline.reader_id();
        let child_cancel = cancel.child_token();

        handles.push((
            reader_id,
            tokio::spawn(async move { pipeline.run(child_cancel).await }),
        ));
    }

    // The signal listener runs on its own task rather than being awaited
    // inline: with no pipelines configured (or once every pipeline has
    // already finished on its own) there is nothing left to wait for, and
    // the loop below should return without requiring a signal.
    let signal_cancel = cancel.clone();
    tokio::spawn(async move { wait_for_shutdown_signal(&signal_cancel).await });

    let mut failures = 0usize;
    let mut all_cancelled = true;

    for (reader_id, handle) in handles {
        match handle.await {
            Ok(Ok(())) => {}
            Ok(Err(logtrap_readers::ReaderError::Cancelled)) => {}
            Ok(Err(e)) => {
                tracing::error!(%reader_id, error = %e, "pipeline failed");
                failures += 1;
                all_cancelled = false;
            }
            Err(join_err) => {
                tracing::error!(%reader_id, error = %join_err, "pipeline task panicked");
                failures += 1;
                all_cancelled = false;
            }
        }
    }

    if all_cancelled && failures == 0 {
        Ok(Outcome::Cancelled)
    } else {
        Ok(Outcome::PipelineFailures(failures))
    }
}

/// Waits for SIGINT or SIGTERM, then cancels every pipeline's token.
async fn wait_for_shutdown_signal(cancel: &CancellationToken) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                let _ = tokio::signal::ctrl_c().await;
                cancel.cancel();
                return;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => tracing::info!("received SIGTERM, shutting down"),
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    tracing::warn!(error = %e, "failed to listen for SIGINT");
                } else {
                    tracing::info!("received SIGINT, shutting down");
                }
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("received ctrl-c, shutting down");
    }

    cancel.cancel();
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
