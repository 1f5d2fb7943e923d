// localStorage-backed high score.

use web_sys::{Storage, window};

use crate::error::StorageError;
use crate::round::ScoreStore;

pub const HIGH_SCORE_KEY: &str = "whoopee_chaos_high_score";

pub struct LocalStorageScoreStore {
    key: String,
}

impl LocalStorageScoreStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl Default for LocalStorageScoreStore {
    fn default() -> Self {
        Self::new(HIGH_SCORE_KEY)
    }
}

fn storage() -> Result<Storage, StorageError> {
    window()
        .ok_or(StorageError::Unavailable)?
        .local_storage()
        .map_err(|e| StorageError::Read(format!("{e:?}")))?
        .ok_or(StorageError::Unavailable)
}

impl ScoreStore for LocalStorageScoreStore {
    fn load(&self) -> Result<u32, StorageError> {
        let raw = storage()?
            .get_item(&self.key)
            .map_err(|e| StorageError::Read(format!("{e:?}")))?;
        match raw {
            None => Ok(0),
            Some(s) => s.trim().parse::<u32>().map_err(|_| StorageError::Corrupt(s)),
        }
    }

    fn save(&mut self, score: u32) -> Result<(), StorageError> {
        storage()?
            .set_item(&self.key, &score.to_string())
            .map_err(|e| StorageError::Write(format!("{e:?}")))
    }
}
