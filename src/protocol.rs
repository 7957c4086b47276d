//! Line-delimited JSON messages exchanged with front ends.
//!
//! Every request is one JSON object tagged by `action`; every response is one
//! JSON object on its own line.

use crate::error::ProtocolError;
use crate::game::{GameStateSnapshot, KeypressResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Request {
    NewGame {
        #[serde(default)]
        session_id: Option<String>,
    },
    Keypress {
        #[serde(default)]
        session_id: Option<String>,
        #[serde(default)]
        key: String,
    },
    NextWord {
        #[serde(default)]
        session_id: Option<String>,
    },
    GameState {
        #[serde(default)]
        session_id: Option<String>,
    },
    TimeUp {
        #[serde(default)]
        session_id: Option<String>,
    },
    RefreshWords,
    WordCount,
}

impl Request {
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(line)?)
    }

    /// The session the request targets, falling back to `default` when absent.
    pub fn session_id<'a>(&'a self, default: &'a str) -> Option<&'a str> {
        match self {
            Request::NewGame { session_id }
            | Request::Keypress { session_id, .. }
            | Request::NextWord { session_id }
            | Request::GameState { session_id }
            | Request::TimeUp { session_id } => Some(session_id.as_deref().unwrap_or(default)),
            Request::RefreshWords | Request::WordCount => None,
        }
    }

    /// Requests that may touch the word database.
    pub fn does_io(&self) -> bool {
        matches!(self, Request::RefreshWords)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeypressResponse {
    pub keypress_result: KeypressResult,
    pub game_state: GameStateSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCountResponse {
    pub word_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Keypress(KeypressResponse),
    State(GameStateSnapshot),
    Refresh(RefreshResponse),
    WordCount(WordCountResponse),
    Error(ErrorResponse),
}

impl Response {
    pub fn error(message: impl Into<String>) -> Self {
        Response::Error(ErrorResponse {
            error: message.into(),
        })
    }

    /// Serialized form, newline terminated.
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}
