use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

pub const THEME_KEY: &str = "rpsTheme";
pub const HISTORY_KEY: &str = "rpsHistory";
pub const LEADERBOARD_KEY: &str = "rpsLeaderboard";
pub const DIFFICULTY_KEY: &str = "rpsDifficulty";
/// Mode and difficulty the saved `rpsHistory` was played under
pub const MATCH_KEY: &str = "rpsMatch";

/// Errors raised by a persistence backend
#[derive(Debug)]
pub enum StoreError {
    /// Reading or writing the backing medium failed
    Io(std::io::Error),
    /// Stored content is not valid JSON
    Json(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "Storage I/O error: {e}"),
            StoreError::Json(e) => write!(f, "Malformed stored JSON: {e}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Json(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Json(e)
    }
}

/// Durable key-value storage of JSON documents, last write wins per key
pub trait Store {
    fn load(&self, key: &str) -> Result<Option<Value>, StoreError>;
    fn save(&mut self, key: &str, value: Value) -> Result<(), StoreError>;
}

/// Load `key`, falling back to `T::default()` when it is missing or unreadable
pub fn load_or_default<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: Store + ?Sized,
{
    match store.load(key) {
        Ok(Some(value)) => serde_json::from_value(value).unwrap_or_else(|e| {
            warn!("Ignoring malformed value under {key}: {e}");
            T::default()
        }),
        Ok(None) => T::default(),
        Err(e) => {
            warn!("Could not load {key}, using default: {e}");
            T::default()
        }
    }
}

/// Serialize and save `value`. Failures are logged, never returned.
pub fn save_value<T, S>(store: &mut S, key: &str, value: &T)
where
    T: Serialize + ?Sized,
    S: Store + ?Sized,
{
    let result = serde_json::to_value(value)
        .map_err(StoreError::from)
        .and_then(|json| store.save(key, json));

    if let Err(e) = result {
        warn!("Could not save {key}: {e}");
    }
}

/// In-process store, lost on exit
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }
}

impl Store for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::matches::Leaderboard;
    use crate::games::rock_paper_scissors::RoundRecord;
    use serde_json::json;

    struct BrokenStore;

    impl Store for BrokenStore {
        fn load(&self, _key: &str) -> Result<Option<Value>, StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk on fire")))
        }

        fn save(&mut self, _key: &str, _value: Value) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk on fire")))
        }
    }

    #[test]
    fn test_missing_key_gives_default() {
        let store = MemoryStore::new();
        let history: Vec<RoundRecord> = load_or_default(&store, HISTORY_KEY);
        assert!(history.is_empty());
    }

    #[test]
    fn test_malformed_history_gives_empty() {
        let mut store = MemoryStore::new();
        store.save(HISTORY_KEY, json!({"not": "a list"})).unwrap();

        let history: Vec<RoundRecord> = load_or_default(&store, HISTORY_KEY);
        assert!(history.is_empty());
    }

    #[test]
    fn test_malformed_leaderboard_gives_empty() {
        let mut store = MemoryStore::new();
        store.save(LEADERBOARD_KEY, json!({"player": -3})).unwrap();

        let board: Leaderboard = load_or_default(&store, LEADERBOARD_KEY);
        assert_eq!(board, Leaderboard::default());
    }

    #[test]
    fn test_backend_failure_gives_default() {
        let mut store = BrokenStore;
        let board: Leaderboard = load_or_default(&store, LEADERBOARD_KEY);
        assert_eq!(board, Leaderboard::default());

        // Must not panic
        save_value(&mut store, LEADERBOARD_KEY, &board);
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let board = Leaderboard {
            player: 2,
            draws: 1,
            ..Leaderboard::default()
        };
        save_value(&mut store, LEADERBOARD_KEY, &board);

        assert_eq!(store.get(LEADERBOARD_KEY), Some(&json!({"player": 2, "draws": 1})));
        let loaded: Leaderboard = load_or_default(&store, LEADERBOARD_KEY);
        assert_eq!(loaded, board);
    }
}
