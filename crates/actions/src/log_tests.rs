// SPDX-License-Identifier: MIT

use super::*;
use crate::formatter::PlainFormatter;
use chrono::{TimeZone, Utc};
use logtrap_core::{Fields, ReaderID};
use parking_lot::Mutex as PlMutex;
use std::io;
use std::sync::Arc;

#[derive(Clone, Default)]
struct SharedBuf(Arc<PlMutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn message(text: &str) -> Message {
    Message::new(Utc.timestamp_opt(0, 0).unwrap(), ReaderID::new("r"), text, Fields::new())
}

#[tokio::test]
async fn writes_every_message_in_the_bundle_in_order() {
    let buf = SharedBuf::default();
    let action = LogAction::new(Arc::new(PlainFormatter), buf.clone());

    action.perform(&[message("first"), message("second")]).await.unwrap();

    let written = String::from_utf8(buf.0.lock().clone()).unwrap();
    let first_pos = written.find("first").unwrap();
    let second_pos = written.find("second").unwrap();
    assert!(first_pos < second_pos);
}

#[tokio::test]
async fn reuses_a_returned_buffer_across_calls() {
    let buf = SharedBuf::default();
    let action = LogAction::new(Arc::new(PlainFormatter), buf.clone());

    action.perform(&[message("one")]).await.unwrap();
    action.perform(&[message("two")]).await.unwrap();

    let written = String::from_utf8(buf.0.lock().clone()).unwrap();
    assert!(written.contains("one"));
    assert!(written.contains("two"));
}
