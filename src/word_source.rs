//! Word Source: a cache of candidate practice words in front of a
//! [`WordStore`], with the embedded default list as the second tier.
//!
//! Readers take a cheap clone of the current list (`Arc`); a reload builds a
//! complete new list outside the lock and swaps it in with a single write, so
//! no reader ever sees a partially populated cache.

use crate::word_store::{clean_words, WordStore};
use include_dir::{include_dir, Dir};
use log::{error, info, warn};
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

static WORDS_DIR: Dir = include_dir!("src/words");

/// Last resort if the embedded list cannot be read.
pub const FALLBACK_WORD: &str = "python";

/// Anything that can hand out a random practice word.
pub trait WordSource: Send + Sync {
    fn random_word(&self) -> String;
}

/// Where the words currently in the cache came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum WordOrigin {
    Unloaded,
    Store,
    Defaults,
}

#[derive(Debug)]
pub struct WordList {
    pub words: Vec<String>,
    pub origin: WordOrigin,
}

/// Outcome of a reload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshReport {
    pub count: usize,
    pub origin: WordOrigin,
}

#[derive(Deserialize)]
struct WordFile {
    words: Vec<String>,
}

/// Words shipped inside the binary.
pub fn default_words() -> Vec<String> {
    let parsed = WORDS_DIR
        .get_file("default.json")
        .and_then(|f| f.contents_utf8())
        .and_then(|s| serde_json::from_str::<WordFile>(s).ok())
        .map(|f| clean_words(f.words))
        .unwrap_or_default();

    if parsed.is_empty() {
        vec![FALLBACK_WORD.to_string()]
    } else {
        parsed
    }
}

pub struct WordCache {
    store: Box<dyn WordStore>,
    list: RwLock<Arc<WordList>>,
    fallbacks: AtomicUsize,
}

impl WordCache {
    /// Builds the cache and loads it right away.
    pub fn new(store: Box<dyn WordStore>) -> Self {
        let cache = Self::lazy(store);
        cache.refresh();
        cache
    }

    /// Builds an empty cache; the first `random_word` call loads it.
    pub fn lazy(store: Box<dyn WordStore>) -> Self {
        Self {
            store,
            list: RwLock::new(Arc::new(WordList {
                words: Vec::new(),
                origin: WordOrigin::Unloaded,
            })),
            fallbacks: AtomicUsize::new(0),
        }
    }

    /// Current list; cloning the `Arc` keeps it alive across a concurrent swap.
    pub fn snapshot(&self) -> Arc<WordList> {
        let guard = self.list.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    pub fn len(&self) -> usize {
        self.snapshot().words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn origin(&self) -> WordOrigin {
        self.snapshot().origin
    }

    /// How many times a load ended on the default list.
    pub fn fallback_activations(&self) -> usize {
        self.fallbacks.load(Ordering::Relaxed)
    }

    /// Reloads from the backing store. Never fails: a broken or empty store
    /// degrades to the default list.
    pub fn refresh(&self) -> RefreshReport {
        let list = Arc::new(self.load());
        let report = RefreshReport {
            count: list.words.len(),
            origin: list.origin,
        };

        let mut guard = self.list.write().unwrap_or_else(PoisonError::into_inner);
        *guard = list;
        report
    }

    fn load(&self) -> WordList {
        let source = self.store.describe();
        match self.store.load_words() {
            Ok(words) => {
                let words = clean_words(words);
                if words.is_empty() {
                    warn!("{} has no usable words", source);
                    self.defaults()
                } else {
                    info!("{} words loaded from {}", words.len(), source);
                    WordList {
                        words,
                        origin: WordOrigin::Store,
                    }
                }
            }
            Err(e) => {
                error!("failed to load words from {}: {}", source, e);
                self.defaults()
            }
        }
    }

    fn defaults(&self) -> WordList {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
        let words = default_words();
        warn!("using {} built-in words", words.len());
        WordList {
            words,
            origin: WordOrigin::Defaults,
        }
    }
}

impl WordSource for WordCache {
    fn random_word(&self) -> String {
        let mut list = self.snapshot();
        if list.words.is_empty() {
            self.refresh();
            list = self.snapshot();
        }

        list.words
            .choose(&mut rand::thread_rng())
            .map(|w| w.to_lowercase())
            .unwrap_or_else(|| FALLBACK_WORD.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::word_store::StaticWords;
    use std::sync::Mutex;

    struct BrokenStore;

    impl WordStore for BrokenStore {
        fn load_words(&self) -> Result<Vec<String>, StoreError> {
            Err(StoreError::Missing("test".to_string()))
        }

        fn describe(&self) -> String {
            "broken".to_string()
        }
    }

    /// Returns each queued batch once, then keeps returning the last one.
    struct ChangingStore(Mutex<Vec<Vec<String>>>);

    impl WordStore for ChangingStore {
        fn load_words(&self) -> Result<Vec<String>, StoreError> {
            let mut batches = self.0.lock().unwrap();
            if batches.len() > 1 {
                Ok(batches.remove(0))
            } else {
                Ok(batches[0].clone())
            }
        }

        fn describe(&self) -> String {
            "changing".to_string()
        }
    }

    #[test]
    fn default_words_are_embedded() {
        let words = default_words();
        assert!(words.len() > 10);
        assert!(words.contains(&"python".to_string()));
        assert!(words.iter().any(|w| w.contains(' ')));
    }

    #[test]
    fn loads_from_store() {
        let cache = WordCache::new(Box::new(StaticWords::new(["elma", "armut"])));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.origin(), WordOrigin::Store);
        assert_eq!(cache.fallback_activations(), 0);
    }

    #[test]
    fn broken_store_falls_back_to_defaults() {
        let cache = WordCache::new(Box::new(BrokenStore));
        assert_eq!(cache.origin(), WordOrigin::Defaults);
        assert_eq!(cache.len(), default_words().len());
        assert_eq!(cache.fallback_activations(), 1);
        assert!(!cache.random_word().is_empty());
    }

    #[test]
    fn empty_store_falls_back_to_defaults() {
        let cache = WordCache::new(Box::new(StaticWords::new(["", "   "])));
        assert_eq!(cache.origin(), WordOrigin::Defaults);
        assert_eq!(cache.fallback_activations(), 1);
    }

    #[test]
    fn random_word_is_lowercase_member() {
        let cache = WordCache::new(Box::new(StaticWords::new(["Kedi", "KÖPEK"])));
        for _ in 0..20 {
            let w = cache.random_word();
            assert!(w == "kedi" || w == "köpek", "unexpected word {w}");
        }
    }

    #[test]
    fn lazy_cache_loads_on_first_pick() {
        let cache = WordCache::lazy(Box::new(StaticWords::new(["zaman"])));
        assert_eq!(cache.origin(), WordOrigin::Unloaded);
        assert!(cache.is_empty());

        assert_eq!(cache.random_word(), "zaman");
        assert_eq!(cache.origin(), WordOrigin::Store);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn refresh_swaps_whole_list() {
        let store = ChangingStore(Mutex::new(vec![
            vec!["a".to_string()],
            vec!["b".to_string(), "c".to_string()],
        ]));
        let cache = WordCache::new(Box::new(store));
        let before = cache.snapshot();
        assert_eq!(before.words, vec!["a"]);

        let report = cache.refresh();
        assert_eq!(
            report,
            RefreshReport {
                count: 2,
                origin: WordOrigin::Store
            }
        );
        // A reader holding the old list keeps a consistent view.
        assert_eq!(before.words, vec!["a"]);
        assert_eq!(cache.snapshot().words, vec!["b", "c"]);
    }

    #[test]
    fn concurrent_reads_during_refresh() {
        let cache = Arc::new(WordCache::new(Box::new(StaticWords::new(["ev", "okul"]))));
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        if i == 0 {
                            cache.refresh();
                        } else {
                            let w = cache.random_word();
                            assert!(w == "ev" || w == "okul");
                        }
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(cache.len(), 2);
    }
}
