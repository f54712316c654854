//! High score leaderboard system
//!
//! Persisted to key-value storage, tracks the top 10 scores. Equal scores keep
//! the order they were submitted in; there is no secondary sort key.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{LeaderboardError, StorageError};
use crate::platform::Storage;

/// Maximum number of entries to keep
pub const MAX_ENTRIES: usize = 10;

/// Storage key the leaderboard is saved under
pub const STORAGE_KEY: &str = "skyflap_leaderboard";

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    name: String,
    score: u32,
}

impl ScoreEntry {
    /// Surrounding whitespace is dropped; nothing left means `InvalidName`
    pub fn new(name: &str, score: u32) -> Result<Self, LeaderboardError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LeaderboardError::InvalidName);
        }
        Ok(Self {
            name: name.to_string(),
            score,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn score(&self) -> u32 {
        self.score
    }
}

/// Entries sorted by descending score, at most [`MAX_ENTRIES`] long.
/// Decoding goes through [`Leaderboard::from_json`], which re-normalizes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Leaderboard {
    entries: Vec<ScoreEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from entries in any order; drops nameless ones, sorts, truncates
    pub fn from_entries(entries: impl IntoIterator<Item = ScoreEntry>) -> Self {
        let mut entries: Vec<ScoreEntry> = entries
            .into_iter()
            .filter(|e| !e.name.trim().is_empty())
            .collect();
        // Stable: equal scores keep their relative order
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(MAX_ENTRIES);
        Self { entries }
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Check if a score would make it onto the board
    pub fn qualifies(&self, score: u32) -> bool {
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert an entry, keeping the board sorted and bounded.
    /// Returns the rank achieved (1-indexed) or None if it fell off the end.
    pub fn insert(&mut self, entry: ScoreEntry) -> Option<usize> {
        // After any equal scores, so earlier submissions stay ahead
        let pos = self
            .entries
            .iter()
            .position(|e| entry.score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_ENTRIES);

        (pos < MAX_ENTRIES).then_some(pos + 1)
    }

    /// Serialize to the persisted JSON array
    pub fn to_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode persisted JSON, trying the current format first and the legacy
    /// record shape second. None if neither matches.
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str::<Vec<ScoreEntry>>(json) {
            Ok(entries) => Some(Self::from_entries(entries)),
            Err(_) => legacy::decode(json),
        }
    }
}

/// Older saves stored each entry as a loosely-typed map, often with every
/// value stringified. Records that cannot be mapped are dropped.
mod legacy {
    use super::*;

    const NAME_KEYS: [&str; 3] = ["name", "playerName", "player"];
    const SCORE_KEYS: [&str; 2] = ["score", "points"];

    pub(super) fn decode(json: &str) -> Option<Leaderboard> {
        let records: Vec<Value> = serde_json::from_str(json).ok()?;
        let total = records.len();
        let entries: Vec<ScoreEntry> = records.iter().filter_map(record_to_entry).collect();
        if entries.len() < total {
            log::debug!(
                "Dropped {} unreadable legacy leaderboard records",
                total - entries.len()
            );
        }
        log::info!("Migrated {} legacy leaderboard entries", entries.len());
        Some(Leaderboard::from_entries(entries))
    }

    fn record_to_entry(record: &Value) -> Option<ScoreEntry> {
        let map = record.as_object()?;
        let name = NAME_KEYS
            .iter()
            .find_map(|k| map.get(*k))
            .and_then(Value::as_str)?;
        let score = SCORE_KEYS
            .iter()
            .find_map(|k| map.get(*k))
            .and_then(score_value)?;
        ScoreEntry::new(name, score).ok()
    }

    fn score_value(value: &Value) -> Option<u32> {
        match value {
            Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Owns the leaderboard and the storage it is persisted to
pub struct LeaderboardStore<S: Storage> {
    storage: S,
    board: Leaderboard,
}

impl<S: Storage> LeaderboardStore<S> {
    /// Open the store, loading whatever is persisted
    pub fn open(storage: S) -> Self {
        let mut store = Self {
            storage,
            board: Leaderboard::new(),
        };
        store.board = store.load();
        store
    }

    /// Read the persisted board. Missing or unreadable data gives an empty one.
    pub fn load(&self) -> Leaderboard {
        let json = match self.storage.get_item(STORAGE_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => {
                log::info!("No leaderboard found, starting fresh");
                return Leaderboard::new();
            }
            Err(e) => {
                log::warn!("Could not read leaderboard: {}", e);
                return Leaderboard::new();
            }
        };

        match Leaderboard::from_json(&json) {
            Some(board) => {
                log::info!("Loaded {} leaderboard entries", board.len());
                board
            }
            None => {
                log::warn!("Leaderboard data is corrupt, starting fresh");
                Leaderboard::new()
            }
        }
    }

    /// Persist the full board, replacing what was stored
    pub fn save(&mut self, board: &Leaderboard) -> Result<(), StorageError> {
        let json = board.to_json()?;
        self.storage.set_item(STORAGE_KEY, &json)?;
        self.board = board.clone();
        log::info!("Leaderboard saved ({} entries)", board.len());
        Ok(())
    }

    /// Record a score. The board only changes if the save succeeds.
    pub fn submit(&mut self, name: &str, score: u32) -> Result<&Leaderboard, LeaderboardError> {
        let entry = ScoreEntry::new(name, score)?;
        let mut board = self.board.clone();
        match board.insert(entry) {
            Some(rank) => log::info!("{} placed #{} with {}", name.trim(), rank, score),
            None => log::info!("{} scored {}, not enough for the board", name.trim(), score),
        }
        self.save(&board)?;
        Ok(&self.board)
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.board
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStorage;
    use proptest::prelude::*;

    fn entry(name: &str, score: u32) -> ScoreEntry {
        ScoreEntry::new(name, score).unwrap()
    }

    fn names(board: &Leaderboard) -> Vec<&str> {
        board.entries().iter().map(|e| e.name()).collect()
    }

    #[test]
    fn test_eleven_submissions_keep_top_ten() {
        let mut store = LeaderboardStore::open(MemoryStorage::new());
        let scores = [5, 80, 12, 80, 3, 44, 12, 99, 0, 61, 7];
        for (i, score) in scores.iter().enumerate() {
            store.submit(&format!("p{i}"), *score).unwrap();
        }

        let board = store.leaderboard();
        assert_eq!(board.len(), MAX_ENTRIES);
        let got: Vec<u32> = board.entries().iter().map(|e| e.score()).collect();
        assert_eq!(got, vec![99, 80, 80, 61, 44, 12, 12, 7, 5, 3]);
        // Equal scores keep submission order
        assert_eq!(
            names(board),
            vec!["p7", "p1", "p3", "p9", "p5", "p2", "p6", "p10", "p0", "p4"]
        );
    }

    #[test]
    fn test_empty_name_rejected_and_board_unchanged() {
        let mut store = LeaderboardStore::open(MemoryStorage::new());
        store.submit("ada", 10).unwrap();
        let before = store.leaderboard().clone();

        assert!(matches!(
            store.submit("", 42),
            Err(LeaderboardError::InvalidName)
        ));
        assert!(matches!(
            store.submit("   ", 42),
            Err(LeaderboardError::InvalidName)
        ));
        assert_eq!(store.leaderboard(), &before);
        assert_eq!(store.load(), before);
    }

    #[test]
    fn test_submit_persists() {
        let mut store = LeaderboardStore::open(MemoryStorage::new());
        store.submit("  grace ", 31).unwrap();

        let reopened = LeaderboardStore::open(store.storage().clone());
        assert_eq!(reopened.leaderboard().entries(), &[entry("grace", 31)]);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let mut store = LeaderboardStore::open(MemoryStorage::new());
        let board = Leaderboard::from_entries(vec![
            entry("a", 9),
            entry("b", 4),
            entry("c", 4),
            entry("d", 0),
        ]);
        store.save(&board).unwrap();
        assert_eq!(store.load(), board);
    }

    #[test]
    fn test_missing_and_corrupt_data_load_empty() {
        let store = LeaderboardStore::open(MemoryStorage::new());
        assert!(store.load().is_empty());

        let mut storage = MemoryStorage::new();
        storage.set_item(STORAGE_KEY, "{not json").unwrap();
        assert!(LeaderboardStore::open(storage.clone()).load().is_empty());

        storage.set_item(STORAGE_KEY, r#"{"name":"x","score":1}"#).unwrap();
        assert!(LeaderboardStore::open(storage).load().is_empty());
    }

    #[test]
    fn test_legacy_records_are_mapped() {
        let legacy = r#"[
            {"name": "old", "score": "17"},
            {"playerName": "older", "points": 40},
            {"name": "", "score": "3"},
            {"name": "neg", "score": -5},
            {"name": "nan", "score": "lots"},
            {"color": "blue"},
            "just a string",
            {"name": "tie", "score": "17", "extra": true}
        ]"#;
        let board = Leaderboard::from_json(legacy).unwrap();
        assert_eq!(
            board.entries(),
            &[entry("older", 40), entry("old", 17), entry("tie", 17)]
        );
    }

    #[test]
    fn test_loaded_data_is_normalized() {
        let unsorted = r#"[
            {"name":"a","score":1},{"name":"b","score":2},{"name":"c","score":3},
            {"name":"d","score":4},{"name":"e","score":5},{"name":"f","score":6},
            {"name":"g","score":7},{"name":"h","score":8},{"name":"i","score":9},
            {"name":"j","score":10},{"name":"k","score":11},{"name":"","score":50}
        ]"#;
        let board = Leaderboard::from_json(unsorted).unwrap();
        assert_eq!(board.len(), MAX_ENTRIES);
        assert_eq!(board.top_score(), Some(11));
        assert_eq!(board.entries().last().map(|e| e.score()), Some(2));
    }

    #[test]
    fn test_rank_helpers() {
        let mut board = Leaderboard::new();
        assert!(board.qualifies(0));
        assert_eq!(board.potential_rank(5), Some(1));

        for i in 0..MAX_ENTRIES as u32 {
            board.insert(entry("x", (i + 1) * 10));
        }
        assert!(!board.qualifies(10));
        assert!(board.qualifies(11));
        assert_eq!(board.potential_rank(55), Some(6));
        assert_eq!(board.insert(entry("low", 1)), None);
        assert_eq!(board.insert(entry("high", 1000)), Some(1));
        assert_eq!(board.len(), MAX_ENTRIES);
    }

    proptest! {
        #[test]
        fn saved_board_loads_back_equal(
            raw in prop::collection::vec(("[a-z ]{1,8}", any::<u32>()), 1..25)
        ) {
            let board = Leaderboard::from_entries(
                raw.iter().filter_map(|(name, score)| ScoreEntry::new(name, *score).ok()),
            );
            let mut store = LeaderboardStore::open(MemoryStorage::new());
            store.save(&board).unwrap();

            let loaded = store.load();
            prop_assert_eq!(&loaded, &board);
            prop_assert!(loaded.len() <= MAX_ENTRIES);
            prop_assert!(loaded.entries().windows(2).all(|w| w[0].score() >= w[1].score()));
        }
    }
}
