use thiserror::Error;

/// Errors produced by the tracker engine.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The stored blob could not be decoded into a tracker state.
    ///
    /// Recovered internally by falling back to a freshly initialized state;
    /// callers of [`Tracker`](crate::tracker::Tracker) never see it.
    #[error("Corrupt persisted state: {0}")]
    CorruptPersistedState(#[from] serde_json::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Type mismatch at {path}: expected {expected}")]
    TypeMismatch { path: String, expected: &'static str },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<rusqlite::Error> for TrackerError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

pub type Result<T, E = TrackerError> = std::result::Result<T, E>;
