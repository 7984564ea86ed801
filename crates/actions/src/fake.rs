// SPDX-License-Identifier: MIT

//! A recording [`Action`] for processor and pipeline tests.

use crate::error::ActionError;
use crate::Action;
use async_trait::async_trait;
use logtrap_core::Message;
use parking_lot::Mutex;

/// Records every bundle it was invoked with.
#[derive(Default)]
pub struct FakeAction {
    bundles: Mutex<Vec<Vec<Message>>>,
    fail_next: Mutex<bool>,
}

impl FakeAction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bundles(&self) -> Vec<Vec<Message>> {
        self.bundles.lock().clone()
    }

    /// The next `perform` call returns `ActionError::EmptyBundle` instead
    /// of recording its bundle, to exercise the swallow-and-log path.
    pub fn fail_next_call(&self) {
        *self.fail_next.lock() = true;
    }
}

#[async_trait]
impl Action for FakeAction {
    async fn perform(&self, messages: &[Message]) -> Result<(), ActionError> {
        let mut fail_next = self.fail_next.lock();
        if *fail_next {
            *fail_next = false;
            return Err(ActionError::EmptyBundle);
        }
        drop(fail_next);

        self.bundles.lock().push(messages.to_vec());
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
