//! Persisted mirror of the selection.
//!
//! Two string entries hold the last selected year and race id. The browser
//! apps back them with `localStorage`; tests and the CLI use [`MemoryStore`].

use std::cell::RefCell;
use std::collections::HashMap;

pub const YEAR_KEY: &str = "f1_selected_year";
pub const RACE_KEY: &str = "f1_selected_raceId";
/// Persisted years at or below this are treated as unset.
pub const MIN_PERSISTED_YEAR: i32 = 1900;

/// String key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
}

/// In-memory [`KeyValueStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A decoded change to one of the persisted entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredChange {
    Year(i32),
    Race(i64),
}

/// Parse a persisted number. Blank, non-finite and fractional values are
/// rejected.
pub fn parse_stored_number(value: &str) -> Option<i64> {
    let number: f64 = value.trim().parse().ok()?;
    if !number.is_finite() || number.fract() != 0.0 {
        return None;
    }
    if number < i64::MIN as f64 || number > i64::MAX as f64 {
        return None;
    }
    Some(number as i64)
}

/// Decode a storage-change notification. Unrelated keys, removals and
/// malformed values yield `None`.
pub fn decode_change(key: Option<&str>, new_value: Option<&str>) -> Option<StoredChange> {
    let number = parse_stored_number(new_value?)?;
    match key? {
        YEAR_KEY => i32::try_from(number).ok().map(StoredChange::Year),
        RACE_KEY => Some(StoredChange::Race(number)),
        _ => None,
    }
}

/// Selection restored from storage on startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PersistedSelection {
    pub year: Option<i32>,
    pub race_id: Option<i64>,
}

pub fn restore(store: &dyn KeyValueStore) -> PersistedSelection {
    let year = store
        .get(YEAR_KEY)
        .and_then(|v| parse_stored_number(&v))
        .and_then(|n| i32::try_from(n).ok())
        .filter(|y| *y > MIN_PERSISTED_YEAR);
    let race_id = store.get(RACE_KEY).and_then(|v| parse_stored_number(&v));
    PersistedSelection { year, race_id }
}

pub fn persist_year(store: &dyn KeyValueStore, year: i32) -> anyhow::Result<()> {
    store.set(YEAR_KEY, &year.to_string())
}

pub fn persist_race(store: &dyn KeyValueStore, race_id: i64) -> anyhow::Result<()> {
    store.set(RACE_KEY, &race_id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numbers() {
        assert_eq!(parse_stored_number("2021"), Some(2021));
        assert_eq!(parse_stored_number(" 1052 "), Some(1052));
        assert_eq!(parse_stored_number("2021.0"), Some(2021));
        assert_eq!(parse_stored_number("2021.5"), None);
        assert_eq!(parse_stored_number("NaN"), None);
        assert_eq!(parse_stored_number("inf"), None);
        assert_eq!(parse_stored_number(""), None);
        assert_eq!(parse_stored_number("abc"), None);
    }

    #[test]
    fn decodes_known_keys_only() {
        assert_eq!(
            decode_change(Some(YEAR_KEY), Some("2019")),
            Some(StoredChange::Year(2019))
        );
        assert_eq!(
            decode_change(Some(RACE_KEY), Some("1030")),
            Some(StoredChange::Race(1030))
        );
        assert_eq!(decode_change(Some("theme"), Some("1")), None);
        assert_eq!(decode_change(Some(RACE_KEY), None), None);
        assert_eq!(decode_change(Some(RACE_KEY), Some("oops")), None);
        assert_eq!(decode_change(None, Some("1")), None);
    }

    #[test]
    fn restore_ignores_ancient_years() {
        let store = MemoryStore::new();
        assert_eq!(restore(&store), PersistedSelection::default());

        persist_year(&store, 1900).unwrap();
        persist_race(&store, 17).unwrap();
        let restored = restore(&store);
        assert_eq!(restored.year, None);
        assert_eq!(restored.race_id, Some(17));

        persist_year(&store, 1950).unwrap();
        assert_eq!(restore(&store).year, Some(1950));
    }
}
