use crate::bus::{EventBus, Subscription};
use crate::selection::{Selection, SelectionEvent, SelectionStore};
use crate::storage::{self, KeyValueStore};
use std::cell::RefCell;
use std::rc::Rc;

/// The one shared selection, its bus and its persisted mirror.
///
/// Cheap to clone; clones share state. Mutations release the store borrow
/// before publishing, so handlers may read the selection or mutate it again.
#[derive(Clone)]
pub struct SelectionHub {
    store: Rc<RefCell<SelectionStore>>,
    bus: EventBus<SelectionEvent>,
    storage: Option<Rc<dyn KeyValueStore>>,
}

impl Default for SelectionHub {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionHub {
    pub fn new() -> Self {
        Self {
            store: Rc::new(RefCell::new(SelectionStore::new())),
            bus: EventBus::new(),
            storage: None,
        }
    }

    /// A hub that mirrors selections into `storage`.
    pub fn with_storage(storage: Rc<dyn KeyValueStore>) -> Self {
        Self {
            storage: Some(storage),
            ..Self::new()
        }
    }

    pub fn selection(&self) -> Selection {
        self.store.borrow().selection()
    }

    pub fn subscribe(&self, handler: impl Fn(&SelectionEvent) + 'static) -> Subscription {
        self.bus.subscribe(handler)
    }

    pub fn set_season(&self, season: i32) {
        let events = self.store.borrow_mut().set_season(season);
        self.dispatch(events);
    }

    pub fn select_race(&self, race_id: i64, season: i32) {
        let events = self.store.borrow_mut().select_race(race_id, season);
        self.dispatch(events);
    }

    pub fn clear_race(&self) {
        let events = self.store.borrow_mut().clear_race();
        self.dispatch(events);
    }

    fn dispatch(&self, events: Vec<SelectionEvent>) {
        for event in events {
            self.mirror(&event);
            log::debug!("[F1] selection: {:?}", event);
            self.bus.publish(event);
        }
    }

    /// Write the persisted entries. A cleared race keeps its last entry so
    /// the grid viewer goes on showing it.
    fn mirror(&self, event: &SelectionEvent) {
        let Some(store) = &self.storage else {
            return;
        };
        let result = match *event {
            SelectionEvent::SeasonChanged(season) => storage::persist_year(store.as_ref(), season),
            SelectionEvent::RaceSelected { race_id, season } => {
                storage::persist_year(store.as_ref(), season)
                    .and_then(|_| storage::persist_race(store.as_ref(), race_id))
            }
            SelectionEvent::RaceCleared => Ok(()),
        };
        if let Err(e) = result {
            log::warn!("[F1] selection: failed to persist {:?}: {}", event, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{restore, MemoryStore, RACE_KEY, YEAR_KEY};

    #[test]
    fn mirrors_into_storage() {
        let store = Rc::new(MemoryStore::new());
        let hub = SelectionHub::with_storage(store.clone());
        hub.set_season(2021);
        assert_eq!(store.get(YEAR_KEY).as_deref(), Some("2021"));
        hub.select_race(1052, 2021);
        assert_eq!(store.get(RACE_KEY).as_deref(), Some("1052"));

        hub.clear_race();
        let restored = restore(store.as_ref());
        assert_eq!(restored.year, Some(2021));
        assert_eq!(restored.race_id, Some(1052));
    }

    #[test]
    fn handlers_can_read_and_mutate_during_dispatch() {
        let hub = SelectionHub::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let reader = hub.clone();
        let sink = seen.clone();
        let _sub = hub.subscribe(move |event| {
            // The store is not borrowed while handlers run.
            sink.borrow_mut().push((*event, reader.selection()));
            if let SelectionEvent::SeasonChanged(season) = event {
                reader.select_race(1, *season);
            }
        });

        hub.set_season(2021);
        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0, SelectionEvent::SeasonChanged(2021));
        assert_eq!(seen[1].0, SelectionEvent::RaceSelected { race_id: 1, season: 2021 });
        assert_eq!(seen[1].1.race_in_season(), Some(1));
    }

    #[test]
    fn season_change_clears_selection_everywhere() {
        let hub = SelectionHub::new();
        let highlighted: Rc<RefCell<Option<i64>>> = Rc::new(RefCell::new(None));

        // A table-like subscriber that only trusts races from the current season.
        let reader = hub.clone();
        let cell = highlighted.clone();
        let _table = hub.subscribe(move |event| match *event {
            SelectionEvent::RaceSelected { race_id, season }
                if reader.selection().season == Some(season) =>
            {
                *cell.borrow_mut() = Some(race_id)
            }
            SelectionEvent::RaceCleared => *cell.borrow_mut() = None,
            _ => {}
        });

        hub.set_season(2021);
        hub.select_race(1052, 2021);
        assert_eq!(*highlighted.borrow(), Some(1052));
        hub.set_season(2020);
        assert_eq!(*highlighted.borrow(), None);
        assert_eq!(hub.selection().race, None);
    }
}
