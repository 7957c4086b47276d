use crate::app_dirs::AppDirs;
use crate::error::StoreError;
use chrono::Local;
use itertools::Itertools;
use log::info;
use rusqlite::{params, Connection, OpenFlags};
use std::path::{Path, PathBuf};

/// Backing store of candidate words.
pub trait WordStore: Send + Sync {
    /// Loads every stored word. Entries may still need trimming.
    fn load_words(&self) -> Result<Vec<String>, StoreError>;

    /// Human readable location, used in log lines.
    fn describe(&self) -> String;
}

/// Word table kept in a SQLite file.
///
/// The connection is opened per operation so a database that appears (or
/// disappears) while the server runs is picked up on the next refresh.
#[derive(Debug, Clone)]
pub struct SqliteWordStore {
    path: PathBuf,
}

impl SqliteWordStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("typerush_words.db"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open_existing(&self) -> Result<Connection, StoreError> {
        if !self.path.exists() {
            return Err(StoreError::Missing(self.path.display().to_string()));
        }
        Ok(Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY,
        )?)
    }

    fn open_for_write(&self) -> Result<Connection, StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&self.path)?;
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS words (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                word TEXT NOT NULL UNIQUE,
                added_at TEXT NOT NULL
            )
            "#,
            [],
        )?;

        Ok(conn)
    }

    /// Inserts words, skipping ones already present. Returns how many rows were added.
    pub fn insert_words(&self, words: &[String]) -> Result<usize, StoreError> {
        let mut conn = self.open_for_write()?;
        let added_at = Local::now().to_rfc3339();

        let tx = conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare("INSERT OR IGNORE INTO words (word, added_at) VALUES (?1, ?2)")?;
            for word in words {
                inserted += stmt.execute(params![word, added_at])?;
            }
        }
        tx.commit()?;

        info!("{} new words written to {}", inserted, self.path.display());
        Ok(inserted)
    }

    /// Number of rows in the word table
    pub fn count(&self) -> Result<usize, StoreError> {
        let conn = self.open_existing()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM words", [], |row| row.get(0))?;
        Ok(count.max(0) as usize)
    }
}

impl WordStore for SqliteWordStore {
    fn load_words(&self) -> Result<Vec<String>, StoreError> {
        let conn = self.open_existing()?;
        let mut stmt = conn.prepare("SELECT word FROM words WHERE word IS NOT NULL")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut words = Vec::new();
        for word in rows {
            words.push(word?);
        }
        Ok(words)
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }
}

/// Fixed in-memory word list. Handy for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticWords(pub Vec<String>);

impl StaticWords {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(words.into_iter().map(Into::into).collect())
    }
}

impl WordStore for StaticWords {
    fn load_words(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.0.clone())
    }

    fn describe(&self) -> String {
        format!("static list of {}", self.0.len())
    }
}

/// Trims entries and drops the empty ones.
pub fn clean_words(words: Vec<String>) -> Vec<String> {
    words
        .into_iter()
        .map(|w| w.trim().to_string())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Reads an import file: the first column of each record (one word per line
/// works too), `#` lines skipped, lower-cased and deduplicated.
pub fn read_word_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>, StoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .from_path(path)?;

    let mut words = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(first) = record.get(0) {
            words.push(first.to_lowercase());
        }
    }

    Ok(clean_words(words).into_iter().unique().collect())
}
