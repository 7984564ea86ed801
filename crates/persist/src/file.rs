// SPDX-License-Identifier: MIT

//! File-backed [`Persister`](crate::Persister): one JSON document per reader.

use crate::error::PersistError;
use crate::Persister;
use async_trait::async_trait;
use logtrap_core::{ReaderID, State};
use rand::Rng;
use std::path::{Path, PathBuf};

/// Stores each reader's state as `dir/<reader_id>.json`.
///
/// Saves write to a uniquely-named temporary sibling and commit by rename,
/// so a reader loading state never observes a partial write. The random
/// suffix on the temp name avoids collisions between concurrent saves of
/// the same reader ID.
pub struct FilePersister {
    dir: PathBuf,
}

impl FilePersister {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn state_path(&self, reader_id: &ReaderID) -> PathBuf {
        self.dir.join(format!("{reader_id}.json"))
    }

    fn temp_path(&self, reader_id: &ReaderID) -> PathBuf {
        let suffix: String = {
            let mut rng = rand::thread_rng();
            (0..16).map(|_| format!("{:02x}", rng.gen::<u8>())).collect()
        };
        self.dir.join(format!("{reader_id}.json.tmp{suffix}"))
    }
}

#[async_trait]
impl Persister for FilePersister {
    async fn load_state(&self, reader_id: &ReaderID) -> Result<State, PersistError> {
        let path = self.state_path(reader_id);

        let contents = match tokio::fs::read(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(State::default()),
            Err(source) => return Err(PersistError::StorageFailure { reader_id: reader_id.clone(), source }),
        };

        serde_json::from_slice(&contents).map_err(|source| PersistError::Corrupt { reader_id: reader_id.clone(), source })
    }

    async fn save_state(&self, reader_id: &ReaderID, state: &State) -> Result<(), PersistError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| PersistError::StorageFailure { reader_id: reader_id.clone(), source })?;

        let path = self.state_path(reader_id);
        let temp_path = self.temp_path(reader_id);

        let json = serde_json::to_vec(state).map_err(|source| PersistError::Corrupt { reader_id: reader_id.clone(), source })?;

        write_then_rename(&temp_path, &path, &json)
            .await
            .map_err(|source| PersistError::StorageFailure { reader_id: reader_id.clone(), source })
    }
}

async fn write_then_rename(temp_path: &Path, path: &Path, contents: &[u8]) -> std::io::Result<()> {
    tokio::fs::write(temp_path, contents).await?;
    tokio::fs::rename(temp_path, path).await
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
