//! Application state managed via Dioxus context.
//!
//! `AppState` bundles the reactive signals into a single struct provided via
//! `use_context_provider`. Child components retrieve it with
//! `use_context::<AppState>()`. The selection itself lives in a
//! [`SelectionHub`] provided alongside; [`use_selection_sync`] mirrors its
//! events into the signals here so components re-render on change.

use crate::js_bridge::{self, WindowListener};
use f1_db::Database;
use f1_sync::{SelectionEvent, SelectionHub, Subscription};
use dioxus::prelude::*;
use std::rc::Rc;

/// Dashboard tab showing one of the results tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultsTab {
    Races,
    Drivers,
    Teams,
}

impl ResultsTab {
    pub const ALL: [ResultsTab; 3] = [ResultsTab::Races, ResultsTab::Drivers, ResultsTab::Teams];

    pub fn label(&self) -> &'static str {
        match self {
            ResultsTab::Races => "Races",
            ResultsTab::Drivers => "Drivers",
            ResultsTab::Teams => "Teams",
        }
    }

    /// Heading above the table, e.g. "2021 Driver Standings".
    pub fn title(&self, season: Option<i32>) -> String {
        let base = match self {
            ResultsTab::Races => "Race Results",
            ResultsTab::Drivers => "Driver Standings",
            ResultsTab::Teams => "Team Standings",
        };
        match season {
            Some(year) => format!("{} {}", year, base),
            None => base.to_string(),
        }
    }
}

/// Race shown in the grid chart modal.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalRace {
    pub race_id: i64,
    pub season: i32,
    pub name: String,
}

impl ModalRace {
    pub fn title(&self) -> String {
        format!("{} {} — Starting vs Finishing Grid", self.season, self.name)
    }
}

/// Shared application state for the F1 apps.
#[derive(Clone, Copy)]
pub struct AppState {
    /// Database instance (None until loaded)
    pub db: Signal<Option<Database>>,
    pub loading: Signal<bool>,
    pub error_msg: Signal<Option<String>>,
    /// Seasons, newest first
    pub seasons: Signal<Vec<i32>>,
    pub selected_season: Signal<Option<i32>>,
    /// Race highlighted across widgets; always from `selected_season`
    pub highlighted_race: Signal<Option<i64>>,
    pub active_tab: Signal<ResultsTab>,
    pub modal_race: Signal<Option<ModalRace>>,
    /// DOM id of the panel currently expanded to fullscreen
    pub fullscreen_panel: Signal<Option<String>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            db: Signal::new(None),
            loading: Signal::new(true),
            error_msg: Signal::new(None),
            seasons: Signal::new(Vec::new()),
            selected_season: Signal::new(None),
            highlighted_race: Signal::new(None),
            active_tab: Signal::new(ResultsTab::Races),
            modal_race: Signal::new(None),
            fullscreen_panel: Signal::new(None),
        }
    }

    /// The loaded database, cloned out of its signal.
    pub fn database(&self) -> Option<Database> {
        self.db.read().clone()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Keep `AppState`'s season and highlight signals in step with the hub.
///
/// The subscription lives as long as the calling component.
pub fn use_selection_sync(state: AppState, hub: SelectionHub) -> Rc<Subscription> {
    use_hook(move || {
        let reader = hub.clone();
        Rc::new(hub.subscribe(move |event| match *event {
            SelectionEvent::SeasonChanged(season) => {
                let mut selected = state.selected_season;
                selected.set(Some(season));
            }
            SelectionEvent::RaceSelected { race_id, season } => {
                // A race from another season is stale by the time it lands.
                if reader.selection().season == Some(season) {
                    let mut highlighted = state.highlighted_race;
                    highlighted.set(Some(race_id));
                }
            }
            SelectionEvent::RaceCleared => {
                let mut highlighted = state.highlighted_race;
                highlighted.set(None);
            }
        }))
    })
}

/// Whether a fresh measurement should replace the stored container size.
///
/// Sub-pixel jitter is ignored, and a missing measurement (element detached
/// or hidden) keeps the last known size.
pub fn size_changed(current: Option<(f64, f64)>, measured: Option<(f64, f64)>) -> bool {
    match (current, measured) {
        (_, None) => false,
        (None, Some(_)) => true,
        (Some((w0, h0)), Some((w1, h1))) => (w0 - w1).abs() >= 0.5 || (h0 - h1).abs() >= 0.5,
    }
}

fn remeasure(mut size: Signal<Option<(f64, f64)>>, id: &str) {
    let measured = js_bridge::element_size(id);
    if size_changed(*size.peek(), measured) {
        size.set(measured);
    }
}

/// Size of the element with `id`, measured after mount and again on window
/// resize or when a panel enters or leaves fullscreen.
pub fn use_container_size(state: AppState, id: &str) -> Signal<Option<(f64, f64)>> {
    let size = use_signal(|| None::<(f64, f64)>);

    let resize_id = id.to_string();
    use_hook(move || -> Option<Rc<WindowListener>> {
        match js_bridge::on_resize(move || remeasure(size, &resize_id)) {
            Ok(listener) => Some(Rc::new(listener)),
            Err(e) => {
                log::warn!("[F1] layout: resize listener unavailable: {:#}", e);
                None
            }
        }
    });

    let effect_id = id.to_string();
    use_effect(move || {
        let _fullscreen = (state.fullscreen_panel)();
        remeasure(size, &effect_id);
    });

    size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_titles() {
        assert_eq!(ResultsTab::Drivers.title(Some(2021)), "2021 Driver Standings");
        assert_eq!(ResultsTab::Teams.title(None), "Team Standings");
        assert_eq!(ResultsTab::Races.title(Some(1950)), "1950 Race Results");
    }

    #[test]
    fn modal_title() {
        let race = ModalRace {
            race_id: 1,
            season: 2021,
            name: "Bahrain Grand Prix".into(),
        };
        assert_eq!(race.title(), "2021 Bahrain Grand Prix — Starting vs Finishing Grid");
    }

    #[test]
    fn container_size_updates_only_on_real_changes() {
        assert!(size_changed(None, Some((800.0, 400.0))));
        assert!(!size_changed(Some((800.0, 400.0)), Some((800.2, 400.1))));
        // Leaving fullscreen shrinks the panel.
        assert!(size_changed(Some((1600.0, 900.0)), Some((800.0, 400.0))));
        assert!(!size_changed(Some((800.0, 400.0)), None));
        assert!(!size_changed(None, None));
    }
}
