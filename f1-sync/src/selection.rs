use serde::Serialize;

/// A change to the shared selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SelectionEvent {
    SeasonChanged(i32),
    RaceSelected { race_id: i64, season: i32 },
    RaceCleared,
}

/// A selected race and the season it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RaceRef {
    pub race_id: i64,
    pub season: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Selection {
    pub season: Option<i32>,
    pub race: Option<RaceRef>,
}

impl Selection {
    /// The selected race id, if it belongs to the selected season.
    pub fn race_in_season(&self) -> Option<i64> {
        self.race
            .filter(|r| Some(r.season) == self.season)
            .map(|r| r.race_id)
    }
}

/// Owns the [`Selection`] and turns mutations into events.
///
/// The store never publishes; callers hand the returned events to the bus
/// once they have released their borrow of the store.
#[derive(Debug, Default)]
pub struct SelectionStore {
    selection: Selection,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Select `season`, clearing a race from another season first.
    pub fn set_season(&mut self, season: i32) -> Vec<SelectionEvent> {
        if self.selection.season == Some(season) {
            return Vec::new();
        }
        let mut events = Vec::with_capacity(2);
        if self.selection.race.is_some_and(|r| r.season != season) {
            self.selection.race = None;
            events.push(SelectionEvent::RaceCleared);
        }
        self.selection.season = Some(season);
        events.push(SelectionEvent::SeasonChanged(season));
        events
    }

    /// Select a race of the current season. Races from any other season are
    /// stale and ignored.
    pub fn select_race(&mut self, race_id: i64, season: i32) -> Vec<SelectionEvent> {
        if self.selection.season != Some(season) {
            log::warn!(
                "[F1] selection: ignoring race {} from season {} (selected {:?})",
                race_id,
                season,
                self.selection.season
            );
            return Vec::new();
        }
        let race = RaceRef { race_id, season };
        if self.selection.race == Some(race) {
            return Vec::new();
        }
        self.selection.race = Some(race);
        vec![SelectionEvent::RaceSelected { race_id, season }]
    }

    pub fn clear_race(&mut self) -> Vec<SelectionEvent> {
        match self.selection.race.take() {
            Some(_) => vec![SelectionEvent::RaceCleared],
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_change_clears_stale_race_first() {
        let mut store = SelectionStore::new();
        assert_eq!(store.set_season(2021), vec![SelectionEvent::SeasonChanged(2021)]);
        store.select_race(1052, 2021);
        assert_eq!(store.selection().race_in_season(), Some(1052));

        let events = store.set_season(2020);
        assert_eq!(
            events,
            vec![SelectionEvent::RaceCleared, SelectionEvent::SeasonChanged(2020)]
        );
        assert_eq!(store.selection().race, None);
    }

    #[test]
    fn same_season_is_a_no_op() {
        let mut store = SelectionStore::new();
        store.set_season(2021);
        store.select_race(1, 2021);
        assert!(store.set_season(2021).is_empty());
        assert_eq!(store.selection().race_in_season(), Some(1));
    }

    #[test]
    fn stale_race_is_ignored() {
        let mut store = SelectionStore::new();
        assert!(store.select_race(1, 2021).is_empty(), "no season selected yet");
        store.set_season(2020);
        assert!(store.select_race(1, 2021).is_empty());
        assert_eq!(store.selection().race, None);
    }

    #[test]
    fn reselecting_same_race_publishes_nothing() {
        let mut store = SelectionStore::new();
        store.set_season(2021);
        assert_eq!(store.select_race(3, 2021).len(), 1);
        assert!(store.select_race(3, 2021).is_empty());
        assert_eq!(
            store.select_race(4, 2021),
            vec![SelectionEvent::RaceSelected { race_id: 4, season: 2021 }]
        );
    }

    #[test]
    fn clear_only_when_selected() {
        let mut store = SelectionStore::new();
        store.set_season(2021);
        assert!(store.clear_race().is_empty());
        store.select_race(3, 2021);
        assert_eq!(store.clear_race(), vec![SelectionEvent::RaceCleared]);
        assert_eq!(store.selection().season, Some(2021));
    }

    #[test]
    fn events_serialize_with_their_payload() {
        let event = SelectionEvent::RaceSelected { race_id: 1052, season: 2021 };
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"RaceSelected":{"race_id":1052,"season":2021}}"#
        );
        assert_eq!(
            serde_json::to_string(&SelectionEvent::RaceCleared).unwrap(),
            r#""RaceCleared""#
        );
    }
}
