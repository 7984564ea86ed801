// SPDX-License-Identifier: MIT

use super::*;
use crate::error::ReaderError;
use async_trait::async_trait;
use bollard::models::{EventActor, EventMessage};
use std::sync::Arc;

struct NoopChildRunner;

#[async_trait]
impl ChildRunner for NoopChildRunner {
    async fn run_child(&self, _child_id: ReaderID, cancel: CancellationToken) -> Result<(), ReaderError> {
        cancel.cancelled().await;
        Err(ReaderError::Cancelled)
    }
}

fn reader() -> ContainerEngineReader {
    let docker = Docker::connect_with_local_defaults().expect("docker client config");
    ContainerEngineReader::new("container", docker, Arc::new(NoopChildRunner))
}

fn start_event(container_id: &str) -> EventMessage {
    EventMessage { action: Some("start".to_string()), actor: Some(EventActor { id: Some(container_id.to_string()), attributes: None }), ..Default::default() }
}

fn stop_event(container_id: &str) -> EventMessage {
    EventMessage { action: Some("stop".to_string()), actor: Some(EventActor { id: Some(container_id.to_string()), attributes: None }), ..Default::default() }
}

#[tokio::test]
async fn start_event_spawns_a_child_and_emits_a_message() {
    let reader = reader();
    let (out_tx, mut out_rx) = mpsc::channel(4);
    let mut children = HashMap::new();
    let (done_tx, _done_rx) = mpsc::channel(4);
    let cancel = CancellationToken::new();

    reader.handle_event(start_event("abc"), &out_tx, &mut children, done_tx, &cancel).await.unwrap();

    assert!(children.contains_key("abc"));
    let message = out_rx.recv().await.unwrap();
    assert_eq!(message.text(), "Container start");
    assert_eq!(message.fields.get("container_id").map(String::as_str), Some("abc"));

    cancel.cancel();
}

#[tokio::test]
async fn stop_event_does_not_remove_the_tracked_child() {
    let reader = reader();
    let (out_tx, mut out_rx) = mpsc::channel(4);
    let mut children = HashMap::new();
    let (done_tx, _done_rx) = mpsc::channel(4);
    let cancel = CancellationToken::new();

    reader.handle_event(start_event("abc"), &out_tx, &mut children, done_tx.clone(), &cancel).await.unwrap();
    let _ = out_rx.recv().await.unwrap();

    reader.handle_event(stop_event("abc"), &out_tx, &mut children, done_tx, &cancel).await.unwrap();
    let _ = out_rx.recv().await.unwrap();

    assert!(children.contains_key("abc"), "child stays tracked until its own completion signal arrives");

    cancel.cancel();
}

#[tokio::test]
async fn restart_while_watching_queues_rather_than_double_spawns() {
    let reader = reader();
    let (out_tx, mut out_rx) = mpsc::channel(4);
    let mut children = HashMap::new();
    let (done_tx, _done_rx) = mpsc::channel(4);
    let cancel = CancellationToken::new();

    reader.handle_event(start_event("abc"), &out_tx, &mut children, done_tx.clone(), &cancel).await.unwrap();
    let _ = out_rx.recv().await.unwrap();

    reader.handle_event(start_event("abc"), &out_tx, &mut children, done_tx, &cancel).await.unwrap();
    let _ = out_rx.recv().await.unwrap();

    let slot = children.get("abc").unwrap();
    assert_eq!(slot.generation, 0);
    assert!(slot.restart_requested);

    cancel.cancel();
}

#[tokio::test]
async fn unknown_action_is_fatal() {
    let reader = reader();
    let (out_tx, _out_rx) = mpsc::channel(4);
    let mut children = HashMap::new();
    let (done_tx, _done_rx) = mpsc::channel(4);
    let cancel = CancellationToken::new();

    let event = EventMessage { action: Some("pause".to_string()), actor: Some(EventActor { id: Some("abc".to_string()), attributes: None }), ..Default::default() };

    let result = reader.handle_event(event, &out_tx, &mut children, done_tx, &cancel).await;
    assert!(matches!(result, Err(ReaderError::UnexpectedAction { action }) if action == "pause"));
}

#[tokio::test]
async fn done_signal_advances_generation_when_a_restart_was_queued() {
    let reader = reader();
    let mut children = HashMap::new();
    children.insert("abc".to_string(), ChildSlot { generation: 0, restart_requested: true });
    let (done_tx, _done_rx) = mpsc::channel(4);
    let cancel = CancellationToken::new();

    reader.handle_done("abc".to_string(), 0, &mut children, done_tx, &cancel);

    let slot = children.get("abc").unwrap();
    assert_eq!(slot.generation, 1);
    assert!(!slot.restart_requested);

    cancel.cancel();
}

#[tokio::test]
async fn done_signal_removes_the_container_when_no_restart_was_queued() {
    let reader = reader();
    let mut children = HashMap::new();
    children.insert("abc".to_string(), ChildSlot { generation: 0, restart_requested: false });
    let (done_tx, _done_rx) = mpsc::channel(4);
    let cancel = CancellationToken::new();

    reader.handle_done("abc".to_string(), 0, &mut children, done_tx, &cancel);

    assert!(!children.contains_key("abc"));
}

#[tokio::test]
async fn stale_done_signal_is_ignored() {
    let reader = reader();
    let mut children = HashMap::new();
    children.insert("abc".to_string(), ChildSlot { generation: 1, restart_requested: false });
    let (done_tx, _done_rx) = mpsc::channel(4);
    let cancel = CancellationToken::new();

    // generation 0 belongs to a reader that already restarted once.
    reader.handle_done("abc".to_string(), 0, &mut children, done_tx, &cancel);

    assert_eq!(children.get("abc").unwrap().generation, 1);
}
