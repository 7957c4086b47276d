//! The operations front ends invoke: each one resolves a session, applies a
//! game transition and returns the resulting state.

use crate::error::ServiceError;
use crate::game::{GameRules, GameStateSnapshot};
use crate::protocol::{KeypressResponse, RefreshResponse, Request, Response, WordCountResponse};
use crate::session::{lock_session, SessionStore};
use crate::word_source::{WordCache, WordOrigin};
use log::{debug, info, warn};
use std::sync::Arc;

pub struct GameService {
    sessions: SessionStore,
    words: Arc<WordCache>,
}

impl GameService {
    pub fn new(words: Arc<WordCache>, rules: GameRules) -> Self {
        Self {
            sessions: SessionStore::new(rules),
            words,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn words(&self) -> &WordCache {
        &self.words
    }

    pub fn new_game(&self, session_id: &str) -> GameStateSnapshot {
        let state = self.sessions.start_new(session_id, self.words.as_ref());
        info!(
            "new game for {:?} starting with {:?}",
            session_id, state.current_word
        );
        state
    }

    /// Applies one keystroke, creating the session if needed. `key` must be
    /// exactly one character.
    pub fn keypress(&self, session_id: &str, key: &str) -> Result<KeypressResponse, ServiceError> {
        let mut chars = key.chars();
        let key_char = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => return Err(ServiceError::InvalidKey(key.to_string())),
        };

        let session = self.sessions.get_or_create(session_id, self.words.as_ref());
        let mut game = lock_session(&session);
        let keypress_result = game.handle_keypress(key_char);
        Ok(KeypressResponse {
            keypress_result,
            game_state: game.state(),
        })
    }

    /// Moves to the queued word when the current one is complete; otherwise
    /// returns the unchanged state.
    pub fn advance_word(&self, session_id: &str) -> Result<GameStateSnapshot, ServiceError> {
        let session = self
            .sessions
            .get(session_id)
            .ok_or_else(|| ServiceError::SessionNotFound(session_id.to_string()))?;
        let mut game = lock_session(&session);
        game.advance_word(self.words.as_ref());
        Ok(game.state())
    }

    pub fn game_state(&self, session_id: &str) -> GameStateSnapshot {
        let session = self.sessions.get_or_create(session_id, self.words.as_ref());
        let state = lock_session(&session).state();
        state
    }

    /// Ends the game of an existing session. Unknown ids are not created.
    pub fn time_up(&self, session_id: &str) -> Result<GameStateSnapshot, ServiceError> {
        let session = self
            .sessions
            .get(session_id)
            .ok_or_else(|| ServiceError::SessionNotFound(session_id.to_string()))?;
        let mut game = lock_session(&session);
        game.force_timeout();
        info!("time up for {:?}, final score {}", session_id, game.state().score);
        Ok(game.state())
    }

    /// Reloads the word pool. Blocks on the word database.
    pub fn refresh_words(&self) -> RefreshResponse {
        let report = self.words.refresh();
        // Falling back to the built-in list still succeeds; the cache's
        // origin tells the two apart.
        let message = match report.origin {
            WordOrigin::Store => format!("{} words loaded", report.count),
            _ => format!("{} words loaded (built-in list)", report.count),
        };
        RefreshResponse {
            success: true,
            message,
        }
    }

    pub fn word_count(&self) -> WordCountResponse {
        WordCountResponse {
            word_count: self.words.len(),
        }
    }

    /// Routes a decoded request; `default_session_id` stands in for a missing id.
    pub fn dispatch(&self, request: &Request, default_session_id: &str) -> Response {
        debug!("dispatching {:?}", request);
        let session_id = request.session_id(default_session_id).unwrap_or(default_session_id);

        let result = match request {
            Request::NewGame { .. } => Ok(Response::State(self.new_game(session_id))),
            Request::Keypress { key, .. } => self.keypress(session_id, key).map(Response::Keypress),
            Request::NextWord { .. } => self.advance_word(session_id).map(Response::State),
            Request::GameState { .. } => Ok(Response::State(self.game_state(session_id))),
            Request::TimeUp { .. } => self.time_up(session_id).map(Response::State),
            Request::RefreshWords => Ok(Response::Refresh(self.refresh_words())),
            Request::WordCount => Ok(Response::WordCount(self.word_count())),
        };

        result.unwrap_or_else(|e| {
            warn!("{:?} rejected: {}", request, e);
            Response::error(e.to_string())
        })
    }
}
