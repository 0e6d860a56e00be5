//! Key-value persistence for votes, pick counters, and user settings. The
//! engine only ever talks to the [`KeyValueStore`] trait, so the challenge
//! lifecycle tests run against the in-memory store and the shipped build
//! uses the JSON file store.

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

pub const PICK_STATS_KEY: &str = "pick_stats";
pub const SETTINGS_KEY: &str = "settings";

/// Host-supplied local storage: string keys to string values, read and
/// written once per operation. No transactions, single local user.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_owned(), value.to_owned());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// JSON-file-backed store, write-through on every mutation. A missing or
/// malformed file starts empty rather than failing.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl JsonFileStore {
    /// Open the store in the platform data directory.
    pub fn open_default() -> Option<Self> {
        let dirs = directories::ProjectDirs::from("", "", "slate")?;
        std::fs::create_dir_all(dirs.data_dir()).ok()?;
        Some(Self::open(dirs.data_dir().join("store.json")))
    }

    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = std::fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        Self { path, entries }
    }

    fn flush(&self) {
        match serde_json::to_string_pretty(&self.entries) {
            Ok(raw) => {
                if let Err(e) = std::fs::write(&self.path, raw) {
                    warn!("store flush to {} failed: {e}", self.path.display());
                }
            }
            Err(e) => warn!("store serialization failed: {e}"),
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_owned(), value.to_owned());
        self.flush();
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
        self.flush();
    }
}

// ---------------------------------------------------------------------------
// Stored records — deserialized defensively, malformed means default
// ---------------------------------------------------------------------------

/// Running pick-challenge counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickStats {
    pub points: i64,
    pub streak: i64,
    pub correct: i64,
    pub total: i64,
}

impl PickStats {
    pub fn load<S: KeyValueStore>(store: &S) -> Self {
        load_record(store, PICK_STATS_KEY)
    }

    pub fn save<S: KeyValueStore>(&self, store: &mut S) {
        save_record(store, PICK_STATS_KEY, self);
    }

    pub fn record(&mut self, correct: bool) {
        self.total += 1;
        if correct {
            self.correct += 1;
            self.streak += 1;
            self.points += 10;
        } else {
            self.streak = 0;
        }
    }

    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }
}

/// User preferences surfaced by the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserSettings {
    pub favorite_sport: Option<String>,
    pub hide_scores: bool,
}

impl UserSettings {
    pub fn load<S: KeyValueStore>(store: &S) -> Self {
        load_record(store, SETTINGS_KEY)
    }

    pub fn save<S: KeyValueStore>(&self, store: &mut S) {
        save_record(store, SETTINGS_KEY, self);
    }
}

fn load_record<S: KeyValueStore, T: Default + for<'de> Deserialize<'de>>(store: &S, key: &str) -> T {
    store
        .get(key)
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default()
}

fn save_record<S: KeyValueStore, T: Serialize>(store: &mut S, key: &str, record: &T) {
    match serde_json::to_string(record) {
        Ok(raw) => store.set(key, &raw),
        Err(e) => warn!("failed to serialize {key}: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_and_removes() {
        let mut store = MemoryStore::default();
        assert_eq!(store.get("k"), None);
        store.set("k", "v");
        assert_eq!(store.get("k").as_deref(), Some("v"));
        store.remove("k");
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn pick_stats_survive_a_store_round_trip() {
        let mut store = MemoryStore::default();
        let mut stats = PickStats::default();
        stats.record(true);
        stats.record(true);
        stats.record(false);
        stats.save(&mut store);

        let loaded = PickStats::load(&store);
        assert_eq!(loaded, stats);
        assert_eq!(loaded.points, 20);
        assert_eq!(loaded.streak, 0);
        assert!((loaded.accuracy() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn malformed_stored_records_read_as_defaults() {
        let mut store = MemoryStore::default();
        store.set(PICK_STATS_KEY, "{not json");
        store.set(SETTINGS_KEY, "[]");
        assert_eq!(PickStats::load(&store), PickStats::default());
        assert_eq!(UserSettings::load(&store), UserSettings::default());
    }

    #[test]
    fn partial_settings_payloads_fill_with_defaults() {
        let mut store = MemoryStore::default();
        store.set(SETTINGS_KEY, r#"{"favoriteSport": "nba"}"#);
        let settings = UserSettings::load(&store);
        assert_eq!(settings.favorite_sport.as_deref(), Some("nba"));
        assert!(!settings.hide_scores);
    }

    #[test]
    fn file_store_persists_across_reopens_and_shrugs_off_corruption() {
        let path = std::env::temp_dir().join(format!("slate-store-{}.json", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let mut store = JsonFileStore::open(&path);
        store.set("prediction_nba-401", "home");
        drop(store);

        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.get("prediction_nba-401").as_deref(), Some("home"));

        std::fs::write(&path, "no longer json").expect("corrupt the file");
        let corrupted = JsonFileStore::open(&path);
        assert_eq!(corrupted.get("prediction_nba-401"), None);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn accuracy_is_zero_before_any_settles() {
        assert_eq!(PickStats::default().accuracy(), 0.0);
    }
}
