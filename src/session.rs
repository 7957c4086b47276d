use crate::game::{GameRules, GameSession, GameStateSnapshot};
use crate::word_source::WordSource;
use log::info;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

/// A session shared between requests. Every mutation goes through the mutex,
/// so keystrokes on one session are applied one at a time.
pub type SharedSession = Arc<Mutex<GameSession>>;

pub fn lock_session(session: &SharedSession) -> MutexGuard<'_, GameSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Session id -> game. Sessions are created on first use and live as long
/// as the store.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SharedSession>>,
    rules: GameRules,
}

impl SessionStore {
    pub fn new(rules: GameRules) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            rules,
        }
    }

    pub fn get(&self, id: &str) -> Option<SharedSession> {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        sessions.get(id).cloned()
    }

    /// Looks a session up, creating a fresh game when the id is unknown.
    pub fn get_or_create(&self, id: &str, words: &dyn WordSource) -> SharedSession {
        if let Some(session) = self.get(id) {
            return session;
        }

        // Built outside the map lock; if another request won the race its
        // session is kept and this one is dropped.
        let fresh = Arc::new(Mutex::new(GameSession::new(self.rules, words)));
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let session = sessions.entry(id.to_string()).or_insert_with(|| {
            info!("session {:?} created", id);
            fresh
        });
        Arc::clone(session)
    }

    /// Starts a new game for `id`, resetting an existing session in place,
    /// and returns its opening state. The map stays write-locked until the
    /// reset or insert is done, so concurrent calls never leave two games
    /// behind one id.
    pub fn start_new(&self, id: &str, words: &dyn WordSource) -> GameStateSnapshot {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(session) = sessions.get(id) {
            let mut game = lock_session(session);
            game.reset(words);
            info!("session {:?} restarted", id);
            return game.state();
        }

        let game = GameSession::new(self.rules, words);
        let state = game.state();
        sessions.insert(id.to_string(), Arc::new(Mutex::new(game)));
        info!("session {:?} created", id);
        state
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(GameRules::default())
    }
}
