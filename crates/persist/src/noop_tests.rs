// SPDX-License-Identifier: MIT

use super::*;

#[tokio::test]
async fn load_is_always_default() {
    let persister = NoopPersister;
    let state = persister.load_state(&ReaderID::new("journal")).await.unwrap();
    assert_eq!(state, State::default());
}

#[tokio::test]
async fn save_succeeds_without_persisting() {
    let persister = NoopPersister;
    let state = State::default().with_cursor("abc");
    persister.save_state(&ReaderID::new("journal"), &state).await.unwrap();

    // A second load still reports the default, proving nothing was kept.
    assert_eq!(persister.load_state(&ReaderID::new("journal")).await.unwrap(), State::default());
}
