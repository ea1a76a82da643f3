//! Selection state shared by the F1 dashboard widgets.
//!
//! One [`SelectionHub`] holds the selected season and race. Widgets mutate it
//! through the hub and learn about changes from the typed [`EventBus`]; the
//! hub also mirrors the selection into a [`KeyValueStore`] so an isolated page
//! (the standalone grid viewer) can follow along.
//!
//! Everything here is single-threaded: shared state lives behind
//! `Rc<RefCell<_>>`, matching the WASM target.
//!
//! ```rust
//! use f1_sync::{SelectionEvent, SelectionHub};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let hub = SelectionHub::new();
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = seen.clone();
//! let _sub = hub.subscribe(move |e| sink.borrow_mut().push(e.clone()));
//!
//! hub.set_season(2021);
//! hub.select_race(1052, 2021);
//! hub.set_season(2020);
//!
//! assert_eq!(
//!     *seen.borrow(),
//!     vec![
//!         SelectionEvent::SeasonChanged(2021),
//!         SelectionEvent::RaceSelected { race_id: 1052, season: 2021 },
//!         SelectionEvent::RaceCleared,
//!         SelectionEvent::SeasonChanged(2020),
//!     ]
//! );
//! ```

mod bus;
mod gate;
mod hub;
mod selection;
pub mod storage;

pub use bus::{EventBus, Subscription};
pub use gate::SeasonGate;
pub use hub::SelectionHub;
pub use selection::{RaceRef, Selection, SelectionEvent, SelectionStore};
pub use storage::{KeyValueStore, MemoryStore};
