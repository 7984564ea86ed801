// SPDX-License-Identifier: MIT

//! [`PerContainerReader`] — tails a single container's combined log
//! stream, demuxing stdout/stderr when the container has no TTY attached.

use crate::error::ReaderError;
use crate::reader::Reader;
use async_trait::async_trait;
use bollard::container::LogOutput;
use bollard::container::LogsOptions;
use bollard::Docker;
use chrono::{DateTime, Utc};
use futures_util::stream::StreamExt;
use logtrap_core::{Fields, Message, ReaderID, Source, State};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Tails `docker logs --follow` for one container, splitting each
/// `"<RFC3339Nano> <text>"` line into a timestamp and a [`Message`].
pub struct PerContainerReader {
    id: ReaderID,
    container_id: String,
    docker: Docker,
}

impl PerContainerReader {
    pub fn new(id: impl Into<ReaderID>, container_id: impl Into<String>, docker: Docker) -> Self {
        Self { id: id.into(), container_id: container_id.into(), docker }
    }

    async fn has_tty(&self) -> Result<bool, ReaderError> {
        let inspection = self.docker.inspect_container(&self.container_id, None).await.map_err(ReaderError::Docker)?;
        Ok(inspection.config.and_then(|c| c.tty).unwrap_or(false))
    }
}

#[async_trait]
impl Reader for PerContainerReader {
    fn reader_id(&self) -> ReaderID {
        self.id.clone()
    }

    async fn read_logs(&self, state: State, out: mpsc::Sender<Message>, cancel: CancellationToken) -> Result<(), ReaderError> {
        let tty = self.has_tty().await?;

        let since = if state.timestamp == State::default().timestamp { 0 } else { state.timestamp.timestamp() };

        let options = LogsOptions::<String> {
            follow: true,
            stdout: true,
            stderr: true,
            timestamps: true,
            since,
            ..Default::default()
        };

        let mut stream = self.docker.logs(&self.container_id, Some(options));

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ReaderError::Cancelled),
                maybe_frame = stream.next() => {
                    match maybe_frame {
                        None => return Ok(()),
                        Some(Err(e)) => {
                            if is_closed_pipe(&e) {
                                return Ok(());
                            }
                            return Err(ReaderError::Docker(e));
                        }
                        Some(Ok(frame)) => {
                            if let Some(message) = self.frame_to_message(frame, tty)? {
                                if out.send(message).await.is_err() {
                                    return Err(ReaderError::Cancelled);
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

impl PerContainerReader {
    fn frame_to_message(&self, frame: LogOutput, tty: bool) -> Result<Option<Message>, ReaderError> {
        let (source, bytes) = match frame {
            LogOutput::StdOut { message } => (Source::Stdout, message),
            LogOutput::StdErr { message } => (Source::Stderr, message),
            LogOutput::Console { message } => (Source::Undefined, message),
            LogOutput::StdIn { .. } => return Ok(None),
        };

        let source = if tty { Source::Undefined } else { source };

        let line = String::from_utf8_lossy(&bytes);
        let line = line.trim_end_matches(['\n', '\r']);
        if line.is_empty() {
            return Ok(None);
        }

        let (timestamp, text) = split_timestamp(line)?;

        let mut fields = Fields::new();
        fields.insert("container_id".to_string(), self.container_id.clone());

        Ok(Some(Message::new(timestamp, self.id.clone(), text, fields).with_source(source)))
    }
}

/// Splits `"<RFC3339NanoFixed> <text>"` on the first space and parses the
/// timestamp half as UTC.
fn split_timestamp(line: &str) -> Result<(DateTime<Utc>, String), ReaderError> {
    let (ts_str, rest) = line.split_once(' ').ok_or_else(|| ReaderError::LineFormat { line: line.to_string() })?;
    let timestamp = DateTime::parse_from_rfc3339(ts_str).map_err(ReaderError::Timestamp)?.with_timezone(&Utc);
    Ok((timestamp, rest.to_string()))
}

fn is_closed_pipe(error: &bollard::errors::Error) -> bool {
    matches!(error, bollard::errors::Error::IOError { err } if err.kind() == std::io::ErrorKind::BrokenPipe)
}

#[cfg(test)]
#[path = "per_container_tests.rs"]
mod tests;
