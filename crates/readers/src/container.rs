// SPDX-License-Identifier: MIT

//! [`ContainerEngineReader`] — fans out into one child reader (and its own
//! fully wired Watcher + Pipeline) per running container.
//!
//! The engine-level reader only tracks container lifecycle (`start`/
//! `stop` events); it never reads container log bytes itself — that's
//! [`crate::PerContainerReader`]'s job, assembled per child by the
//! injected [`ChildRunner`].

use crate::error::ReaderError;
use crate::reader::{ChildRunner, Reader};
use async_trait::async_trait;
use bollard::container::ListContainersOptions;
use bollard::system::EventsOptions;
use bollard::Docker;
use chrono::Utc;
use futures_util::stream::StreamExt;
use logtrap_core::{Fields, Message, ReaderID, State};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Per-container bookkeeping. `generation` disambiguates a restarted
/// container's new child from a stale completion signal belonging to the
/// previous one.
struct ChildSlot {
    generation: u64,
    /// Set when a `start` arrives while the previous child for this
    /// container is still draining — the corresponding "Waiting for
    /// previous" state from spec.md §4.3.2.
    restart_requested: bool,
}

/// Tails the container engine's event stream and spawns a child
/// Watcher+Pipeline (via [`ChildRunner`]) for every container that is or
/// becomes running.
pub struct ContainerEngineReader {
    id: ReaderID,
    docker: Docker,
    child_runner: Arc<dyn ChildRunner>,
}

impl ContainerEngineReader {
    pub fn new(id: impl Into<ReaderID>, docker: Docker, child_runner: Arc<dyn ChildRunner>) -> Self {
        Self { id: id.into(), docker, child_runner }
    }

    fn emit_event_message(&self, action: &str, container_id: &str) -> Message {
        let mut fields = Fields::new();
        fields.insert("action".to_string(), action.to_string());
        fields.insert("container_id".to_string(), container_id.to_string());
        Message::new(Utc::now(), self.id.clone(), format!("Container {action}"), fields)
    }

    fn spawn_child(&self, container_id: String, generation: u64, done_tx: mpsc::Sender<(String, u64)>, cancel: &CancellationToken) {
        let child_id = self.id.child(&container_id);
        let child_cancel = cancel.child_token();
        let child_runner = self.child_runner.clone();

        tracing::info!(%child_id, generation, "starting container child reader");

        tokio::spawn(async move {
            if let Err(e) = child_runner.run_child(child_id.clone(), child_cancel).await {
                tracing::warn!(%child_id, error = %e, "container child reader stopped with an error");
            }
            let _ = done_tx.send((container_id, generation)).await;
        });
    }
}

#[async_trait]
impl Reader for ContainerEngineReader {
    fn reader_id(&self) -> ReaderID {
        self.id.clone()
    }

    async fn read_logs(&self, state: State, out: mpsc::Sender<Message>, cancel: CancellationToken) -> Result<(), ReaderError> {
        let since = if state.timestamp == State::default().timestamp { 0 } else { state.timestamp.timestamp() };

        let mut filters: HashMap<String, Vec<String>> = HashMap::new();
        filters.insert("type".to_string(), vec!["container".to_string()]);
        filters.insert("event".to_string(), vec!["start".to_string(), "stop".to_string()]);

        let events = self.docker.events(Some(EventsOptions::<String> { since: Some(since), until: None, filters }));
        tokio::pin!(events);

        let running = self
            .docker
            .list_containers(Some(ListContainersOptions::<String> { all: false, ..Default::default() }))
            .await
            .map_err(ReaderError::Docker)?;

        let (done_tx, mut done_rx) = mpsc::channel::<(String, u64)>(64);
        let mut children: HashMap<String, ChildSlot> = HashMap::new();

        for container in running {
            if let Some(id) = container.id {
                children.insert(id.clone(), ChildSlot { generation: 0, restart_requested: false });
                self.spawn_child(id, 0, done_tx.clone(), &cancel);
            }
        }

        let run_result = loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => break Err(ReaderError::Cancelled),

                Some((container_id, generation)) = done_rx.recv() => {
                    self.handle_done(container_id, generation, &mut children, done_tx.clone(), &cancel);
                }

                maybe_event = events.next() => {
                    match maybe_event {
                        None => break Err(ReaderError::Docker(bollard::errors::Error::DockerResponseServerError {
                            status_code: 0_u16,
                            message: "container event stream ended".to_string(),
                        })),
                        Some(Err(e)) => break Err(ReaderError::Docker(e)),
                        Some(Ok(event)) => {
                            if let Err(e) = self.handle_event(event, &out, &mut children, done_tx.clone(), &cancel).await {
                                break Err(e);
                            }
                        }
                    }
                }
            }
        };

        // Structured concurrency: drain every outstanding child before this
        // reader itself returns, regardless of why the loop above exited.
        while !children.is_empty() {
            match done_rx.recv().await {
                Some((container_id, generation)) => {
                    if children.get(&container_id).map(|slot| slot.generation) == Some(generation) {
                        children.remove(&container_id);
                    }
                }
                None => break,
            }
        }

        run_result
    }
}

impl ContainerEngineReader {
    async fn handle_event(
        &self,
        event: bollard::models::EventMessage,
        out: &mpsc::Sender<Message>,
        children: &mut HashMap<String, ChildSlot>,
        done_tx: mpsc::Sender<(String, u64)>,
        cancel: &CancellationToken,
    ) -> Result<(), ReaderError> {
        let action = event.action.unwrap_or_default();
        let container_id = event.actor.and_then(|actor| actor.id).unwrap_or_default();

        if action != "start" && action != "stop" {
            return Err(ReaderError::UnexpectedAction { action });
        }

        let message = self.emit_event_message(&action, &container_id);
        if out.send(message).await.is_err() {
            return Err(ReaderError::Cancelled);
        }

        if action == "start" {
            match children.get_mut(&container_id) {
                None => {
                    children.insert(container_id.clone(), ChildSlot { generation: 0, restart_requested: false });
                    self.spawn_child(container_id, 0, done_tx, cancel);
                }
                Some(slot) => {
                    // A child is already Watching this container (it hasn't
                    // reported completion yet) — queue the restart rather
                    // than racing a second reader against the same container.
                    slot.restart_requested = true;
                }
            }
        }

        // `stop` intentionally leaves the child tracked: removal only
        // happens once its completion signal arrives, so in-flight log
        // lines are drained first.
        Ok(())
    }

    fn handle_done(
        &self,
        container_id: String,
        generation: u64,
        children: &mut HashMap<String, ChildSlot>,
        done_tx: mpsc::Sender<(String, u64)>,
        cancel: &CancellationToken,
    ) {
        let Some(slot) = children.get(&container_id) else { return };
        if slot.generation != generation {
            return;
        }

        if slot.restart_requested && !cancel.is_cancelled() {
            let next_generation = generation + 1;
            children.insert(container_id.clone(), ChildSlot { generation: next_generation, restart_requested: false });
            self.spawn_child(container_id, next_generation, done_tx, cancel);
        } else {
            children.remove(&container_id);
        }
    }
}

#[cfg(test)]
#[path = "container_tests.rs"]
mod tests;
