use crate::typing_policy::{keys_match, skip_spaces};
use crate::word_source::WordSource;
use serde::{Deserialize, Serialize};

/// Scoring, lives and timing constants of a game.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    pub starting_lives: u32,
    pub letter_points: u32,
    pub completion_bonus: u32,
    pub base_time_limit: f64,
    pub min_time_limit: f64,
    pub time_step: f64,
    /// Extra draws allowed when the next word equals the current one
    pub distinct_attempts: usize,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            starting_lives: 3,
            letter_points: 10,
            completion_bonus: 50,
            base_time_limit: 10.0,
            min_time_limit: 2.0,
            time_step: 0.5,
            distinct_attempts: 10,
        }
    }
}

impl GameRules {
    /// Seconds allotted for a word after `completed` finished words.
    pub fn time_limit_for(&self, completed: u32) -> f64 {
        (self.base_time_limit - completed as f64 * self.time_step).max(self.min_time_limit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeypressResult {
    pub success: bool,
    pub correct: bool,
}

impl KeypressResult {
    fn correct() -> Self {
        Self {
            success: true,
            correct: true,
        }
    }

    fn incorrect() -> Self {
        Self {
            success: true,
            correct: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    NotStarted,
    InProgress,
    WordComplete,
    GameOver,
}

/// Serialized view of a session. Field names on the wire follow the
/// existing front end (`typed_letters`, `current_index`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub current_word: String,
    pub next_word: String,
    #[serde(rename = "typed_letters")]
    pub typed_prefix: String,
    #[serde(rename = "current_index")]
    pub cursor: usize,
    pub lives: u32,
    pub score: u32,
    pub game_over: bool,
    pub word_completed: bool,
    pub word_count: u32,
    pub time_limit: f64,
    pub game_started: bool,
}

/// One player's game: the word being typed, the queued word, and the
/// running lives/score/time budget.
#[derive(Debug, Clone)]
pub struct GameSession {
    rules: GameRules,
    current_word: String,
    expected: Vec<char>,
    next_word: String,
    typed_prefix: String,
    cursor: usize,
    lives: u32,
    score: u32,
    game_over: bool,
    word_completed: bool,
    word_count: u32,
    time_limit: f64,
    game_started: bool,
}

impl GameSession {
    pub fn new(rules: GameRules, words: &dyn WordSource) -> Self {
        let mut session = Self {
            rules,
            current_word: String::new(),
            expected: Vec::new(),
            next_word: String::new(),
            typed_prefix: String::new(),
            cursor: 0,
            lives: rules.starting_lives,
            score: 0,
            game_over: false,
            word_completed: false,
            word_count: 0,
            time_limit: rules.base_time_limit,
            game_started: false,
        };
        session.reset(words);
        session
    }

    /// Starts over with fresh words and full lives.
    pub fn reset(&mut self, words: &dyn WordSource) {
        let current = words.random_word();
        self.next_word = self.pick_distinct(words, &current);
        self.set_current_word(current);
        self.lives = self.rules.starting_lives;
        self.score = 0;
        self.game_over = false;
        self.word_completed = false;
        self.word_count = 0;
        self.time_limit = self.rules.base_time_limit;
        self.game_started = false;
        self.skip_spaces();
    }

    /// Draws a word, retrying a bounded number of times while it equals
    /// `current`. A duplicate is accepted once the attempts run out.
    fn pick_distinct(&self, words: &dyn WordSource, current: &str) -> String {
        let mut candidate = words.random_word();
        let mut attempts = 0;
        while candidate == current && attempts < self.rules.distinct_attempts {
            candidate = words.random_word();
            attempts += 1;
        }
        candidate
    }

    fn set_current_word(&mut self, word: String) {
        self.expected = word.chars().collect();
        self.current_word = word;
        self.typed_prefix.clear();
        self.cursor = 0;
    }

    fn skip_spaces(&mut self) {
        self.cursor = skip_spaces(&self.expected, self.cursor, &mut self.typed_prefix);
    }

    pub fn expected_char(&self) -> Option<char> {
        self.expected.get(self.cursor).copied()
    }

    /// Applies one keystroke.
    pub fn handle_keypress(&mut self, key: char) -> KeypressResult {
        self.game_started = true;

        if self.game_over {
            return KeypressResult::incorrect();
        }

        match self.expected_char() {
            Some(expected) if keys_match(key, expected) => {
                self.typed_prefix.push(expected);
                self.cursor += 1;
                self.score = self.score.saturating_add(self.rules.letter_points);
                self.skip_spaces();

                if self.cursor == self.expected.len() {
                    self.word_completed = true;
                    self.score = self.score.saturating_add(self.rules.completion_bonus);
                }
                KeypressResult::correct()
            }
            _ => {
                if !self.word_completed {
                    self.lives = self.lives.saturating_sub(1);
                    if self.lives == 0 {
                        self.game_over = true;
                    }
                }
                KeypressResult::incorrect()
            }
        }
    }

    /// Moves on to the queued word. Does nothing unless the current word is
    /// complete and the game is still running.
    pub fn advance_word(&mut self, words: &dyn WordSource) {
        if !self.word_completed || self.game_over {
            return;
        }

        let current = std::mem::take(&mut self.next_word);
        self.next_word = self.pick_distinct(words, &current);
        self.set_current_word(current);
        self.word_completed = false;
        self.word_count += 1;
        self.game_started = true;
        self.time_limit = self.rules.time_limit_for(self.word_count);
        self.skip_spaces();
    }

    /// External timer expiry.
    pub fn force_timeout(&mut self) {
        self.game_over = true;
    }

    pub fn phase(&self) -> Phase {
        if self.game_over {
            Phase::GameOver
        } else if self.word_completed {
            Phase::WordComplete
        } else if self.game_started {
            Phase::InProgress
        } else {
            Phase::NotStarted
        }
    }

    pub fn state(&self) -> GameStateSnapshot {
        GameStateSnapshot {
            current_word: self.current_word.clone(),
            next_word: self.next_word.clone(),
            typed_prefix: self.typed_prefix.clone(),
            cursor: self.cursor,
            lives: self.lives,
            score: self.score,
            game_over: self.game_over,
            word_completed: self.word_completed,
            word_count: self.word_count,
            time_limit: self.time_limit,
            game_started: self.game_started,
        }
    }
}
