//! Top-N leaderboard kept in a flat key-value store.
//!
//! Rows are written as `LB_Count`, `LB_Name_{i}`, `LB_Time_{i}`, the same
//! shape an engine's player-prefs store uses, so any string/int/float store
//! can back it. Lower times rank higher.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{leaderboard_keys, MISSING_NAME, MISSING_TIME};
use crate::session::format_time;

/// Minimal persisted key-value store.
pub trait ScoreStore {
    fn get_int(&self, key: &str, default: i32) -> i32;
    fn set_int(&mut self, key: &str, value: i32);
    fn get_string(&self, key: &str, default: &str) -> String;
    fn set_string(&mut self, key: &str, value: &str);
    fn get_float(&self, key: &str, default: f32) -> f32;
    fn set_float(&mut self, key: &str, value: f32);
    /// Flush pending writes.
    fn save(&mut self);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
    Int(i32),
    Float(f32),
    Text(String),
}

/// In-memory store. Serializes to a flat JSON object for hosts that persist it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryStore {
    values: BTreeMap<String, StoredValue>,
    #[serde(skip)]
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// How many times `save` has been called.
    pub fn save_count(&self) -> usize {
        self.saves
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ScoreStore for MemoryStore {
    fn get_int(&self, key: &str, default: i32) -> i32 {
        match self.values.get(key) {
            Some(StoredValue::Int(v)) => *v,
            _ => default,
        }
    }

    fn set_int(&mut self, key: &str, value: i32) {
        self.values.insert(key.to_string(), StoredValue::Int(value));
    }

    fn get_string(&self, key: &str, default: &str) -> String {
        match self.values.get(key) {
            Some(StoredValue::Text(v)) => v.clone(),
            _ => default.to_string(),
        }
    }

    fn set_string(&mut self, key: &str, value: &str) {
        self.values
            .insert(key.to_string(), StoredValue::Text(value.to_string()));
    }

    fn get_float(&self, key: &str, default: f32) -> f32 {
        match self.values.get(key) {
            Some(StoredValue::Float(v)) => *v,
            // JSON round-trips whole-number floats as ints.
            Some(StoredValue::Int(v)) => *v as f32,
            _ => default,
        }
    }

    fn set_float(&mut self, key: &str, value: f32) {
        self.values
            .insert(key.to_string(), StoredValue::Float(value));
    }

    fn save(&mut self) {
        self.saves += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub time: f32,
}

impl LeaderboardEntry {
    pub fn new(name: impl Into<String>, time: f32) -> Self {
        Self {
            name: name.into(),
            time,
        }
    }
}

/// Read every stored row, in stored order.
pub fn load_scores(store: &impl ScoreStore) -> Vec<LeaderboardEntry> {
    let count = store.get_int(leaderboard_keys::COUNT, 0).max(0);
    (0..count)
        .map(|i| LeaderboardEntry {
            name: store.get_string(
                &format!("{}{}", leaderboard_keys::NAME_PREFIX, i),
                MISSING_NAME,
            ),
            time: store.get_float(
                &format!("{}{}", leaderboard_keys::TIME_PREFIX, i),
                MISSING_TIME,
            ),
        })
        .collect()
}

/// Insert a score, keep the best `max_entries` and write them back.
///
/// Equal times keep their existing order, so an older score stays ahead.
pub fn save_score(
    store: &mut impl ScoreStore,
    name: &str,
    time: f32,
    max_entries: usize,
) -> Vec<LeaderboardEntry> {
    let mut entries = load_scores(store);
    entries.push(LeaderboardEntry::new(name, time));
    entries.sort_by(|a, b| a.time.total_cmp(&b.time));
    entries.truncate(max_entries);
    write_scores(store, &entries);
    entries
}

fn write_scores(store: &mut impl ScoreStore, entries: &[LeaderboardEntry]) {
    store.set_int(leaderboard_keys::COUNT, entries.len() as i32);
    for (i, entry) in entries.iter().enumerate() {
        store.set_string(
            &format!("{}{}", leaderboard_keys::NAME_PREFIX, i),
            &entry.name,
        );
        store.set_float(
            &format!("{}{}", leaderboard_keys::TIME_PREFIX, i),
            entry.time,
        );
    }
    store.save();
}

/// Leaderboard panel text: one `rank. NAME - MM:SS.ss` line per entry.
pub fn render(entries: &[LeaderboardEntry], empty_text: &str) -> String {
    if entries.is_empty() {
        return empty_text.to_string();
    }
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| format!("{}. {} - {}\n", i + 1, e.name, format_time(e.time)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_has_no_scores() {
        assert!(load_scores(&MemoryStore::new()).is_empty());
    }

    #[test]
    fn scores_sorted_ascending() {
        let mut store = MemoryStore::new();
        save_score(&mut store, "BBB", 75.0, 10);
        save_score(&mut store, "AAA", 61.5, 10);
        save_score(&mut store, "CCC", 90.25, 10);
        let names: Vec<_> = load_scores(&store).into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["AAA", "BBB", "CCC"]);
    }

    #[test]
    fn keeps_only_top_entries() {
        let mut store = MemoryStore::new();
        for i in 0..12 {
            save_score(&mut store, &format!("P{i:02}"), 100.0 - i as f32, 10);
        }
        let scores = load_scores(&store);
        assert_eq!(scores.len(), 10);
        assert_eq!(scores[0].time, 89.0);
        assert_eq!(scores[9].time, 98.0);
        assert_eq!(store.get_int(leaderboard_keys::COUNT, 0), 10);
    }

    #[test]
    fn slow_time_rejected_when_full() {
        let mut store = MemoryStore::new();
        for i in 0..10 {
            save_score(&mut store, "FST", 10.0 + i as f32, 10);
        }
        let top = save_score(&mut store, "SLW", 500.0, 10);
        assert!(top.iter().all(|e| e.name != "SLW"));
    }

    #[test]
    fn tie_keeps_earlier_entry_first() {
        let mut store = MemoryStore::new();
        save_score(&mut store, "OLD", 30.0, 10);
        save_score(&mut store, "NEW", 30.0, 10);
        let scores = load_scores(&store);
        assert_eq!(scores[0].name, "OLD");
        assert_eq!(scores[1].name, "NEW");
    }

    #[test]
    fn missing_rows_use_placeholders() {
        let mut store = MemoryStore::new();
        store.set_int(leaderboard_keys::COUNT, 1);
        let scores = load_scores(&store);
        assert_eq!(scores, vec![LeaderboardEntry::new("---", 9999.0)]);
    }

    #[test]
    fn save_flushes_store() {
        let mut store = MemoryStore::new();
        save_score(&mut store, "ABC", 12.0, 10);
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn store_survives_json() {
        let mut store = MemoryStore::new();
        save_score(&mut store, "ABC", 12.0, 10);
        save_score(&mut store, "XYZ", 8.75, 10);
        let restored = MemoryStore::from_json(&store.to_json().unwrap()).unwrap();
        assert_eq!(load_scores(&restored), load_scores(&store));
    }

    #[test]
    fn render_lists_ranked_rows() {
        let entries = vec![
            LeaderboardEntry::new("AAA", 65.5),
            LeaderboardEntry::new("BBB", 9.0),
        ];
        assert_eq!(
            render(&entries, "No scores yet."),
            "1. AAA - 01:05.50\n2. BBB - 00:09.00\n"
        );
    }

    #[test]
    fn render_empty_board() {
        assert_eq!(render(&[], "No scores yet."), "No scores yet.");
    }
}
