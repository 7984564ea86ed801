// SPDX-License-Identifier: MIT

//! The [`Reader`] capability and the [`ChildRunner`] seam used by the
//! container-engine reader to spawn fully-wired per-container pipelines.

use crate::error::ReaderError;
use async_trait::async_trait;
use logtrap_core::{Message, ReaderID, State};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Produces a sequence of [`Message`]s from some external source.
///
/// A reader must not close `out` — the [`crate::Watcher`] that owns it
/// decides when the channel is done. A reader terminates only when
/// `cancel` fires or it hits an internal failure.
#[async_trait]
pub trait Reader: Send + Sync {
    fn reader_id(&self) -> ReaderID;

    async fn read_logs(&self, state: State, out: mpsc::Sender<Message>, cancel: CancellationToken) -> Result<(), ReaderError>;
}

/// Spawns a fully assembled child pipeline (its own Watcher, Processor and
/// Action) for one fan-out target, e.g. a single container.
///
/// The container-engine reader doesn't know how to build a Processor or
/// Action — that lives in the factory crate that assembles pipelines. This
/// trait is the seam between the two so `logtrap-readers` never has to
/// depend on `logtrap-pipeline`.
#[async_trait]
pub trait ChildRunner: Send + Sync {
    async fn run_child(&self, child_id: ReaderID, cancel: CancellationToken) -> Result<(), ReaderError>;
}
