use thiserror::Error;

/// Failures of the word backing store. These never reach a game session:
/// the word source swallows them and falls back to the built-in list.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("word database not found at {0}")]
    Missing(String),
    #[error("word database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("could not read word list: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors surfaced to callers of the game service.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ServiceError {
    #[error("session not found")]
    SessionNotFound(String),
    #[error("key must be exactly one character, got {0:?}")]
    InvalidKey(String),
}

/// Errors decoding a request line.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("malformed request: {0}")]
    Malformed(#[from] serde_json::Error),
}
