//! Standalone Grid Viewer
//!
//! Year and race dropdowns over the starting vs finishing grid chart. The
//! choice is persisted in localStorage, and changes written by another
//! page (the dashboard in a second tab) are followed live.
//!
//! Data flow:
//! 1. On mount: fetch the table CSVs and build the in-memory database.
//! 2. Restore the persisted year (or fall back to the latest season) and
//!    race (or the year's first race with results).
//! 3. Storage notifications that arrive before the data is ready are held
//!    in a `SeasonGate` and applied once it is.

use f1_chart_ui::components::{ErrorDisplay, GridChart, LoadingSpinner};
use f1_chart_ui::js_bridge::{self, LocalStorage};
use f1_chart_ui::state::AppState;
use f1_db::models::RaceOption;
use f1_db::Database;
use f1_sync::storage::{self, decode_change, StoredChange};
use f1_sync::SeasonGate;
use dioxus::prelude::*;

const DATA_PATH: &str = "data";
const CHART_ID: &str = "grid-viewer-chart";

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("grid-viewer-root"))
        .launch(App);
}

/// The persisted year when it is a known season, otherwise the latest.
fn initial_year(seasons: &[i32], persisted: Option<i32>) -> Option<i32> {
    persisted
        .filter(|y| seasons.contains(y))
        .or_else(|| seasons.first().copied())
}

/// Keep `preferred` when the year has it, otherwise take the first race.
fn pick_race(races: &[RaceOption], preferred: Option<i64>) -> Option<i64> {
    preferred
        .filter(|id| races.iter().any(|r| r.race_id == *id))
        .or_else(|| races.first().map(|r| r.race_id))
}

/// Reactive selection of the viewer.
#[derive(Clone, Copy)]
struct Viewer {
    year: Signal<Option<i32>>,
    races: Signal<Vec<RaceOption>>,
    race: Signal<Option<i64>>,
    gate: Signal<SeasonGate>,
    /// Race id received from storage before the data was ready
    pending_race: Signal<Option<i64>>,
}

impl Viewer {
    fn new() -> Self {
        Self {
            year: Signal::new(None),
            races: Signal::new(Vec::new()),
            race: Signal::new(None),
            gate: Signal::new(SeasonGate::new()),
            pending_race: Signal::new(None),
        }
    }

    /// Show `year`, keeping `preferred` if the year has that race.
    fn show_year(mut self, db: &Database, year: i32, preferred: Option<i64>) {
        let races = match db.query_grid_races(year) {
            Ok(races) => races,
            Err(e) => {
                log::error!("[F1] grid viewer: races for {} failed: {:#}", year, e);
                Vec::new()
            }
        };
        let race = pick_race(&races, preferred);
        self.year.set(Some(year));
        self.races.set(races);
        self.race.set(race);
    }

    /// Follow a change written by another page.
    fn apply_change(mut self, db: Option<Database>, change: StoredChange) {
        let ready = self.gate.peek().is_ready();
        match (change, db) {
            (StoredChange::Year(year), Some(db)) if ready => {
                let keep = *self.race.peek();
                self.show_year(&db, year, keep);
            }
            (StoredChange::Year(year), _) => {
                self.gate.write().request(year);
            }
            (StoredChange::Race(race_id), _) if ready => {
                if self.races.peek().iter().any(|r| r.race_id == race_id) {
                    self.race.set(Some(race_id));
                } else {
                    log::debug!("[F1] grid viewer: race {} not in the shown year", race_id);
                }
            }
            (StoredChange::Race(race_id), _) => self.pending_race.set(Some(race_id)),
        }
    }
}

fn persist(result: anyhow::Result<()>) {
    if let Err(e) = result {
        log::warn!("[F1] grid viewer: could not persist selection: {:#}", e);
    }
}

#[component]
fn App() -> Element {
    let mut state = use_context_provider(AppState::new);
    let viewer = use_hook(Viewer::new);

    // ─── Follow the dashboard through storage notifications ───
    use_hook(move || {
        let result = js_bridge::on_storage_change(move |key, value| {
            if let Some(change) = decode_change(key.as_deref(), value.as_deref()) {
                viewer.apply_change(state.database(), change);
            }
        });
        if let Err(e) = result {
            log::warn!("[F1] grid viewer: storage notifications unavailable: {:#}", e);
        }
    });

    // ─── Load tables once on mount ───
    use_effect(move || {
        spawn(async move {
            let loaded = async {
                let tables = js_bridge::fetch_tables(DATA_PATH).await?;
                let db = Database::from_tables(&tables)?;
                let seasons = db.query_seasons()?;
                anyhow::Ok((db, seasons))
            };
            match loaded.await {
                Ok((db, seasons)) => {
                    let persisted = storage::restore(&LocalStorage);
                    let mut viewer = viewer;
                    let queued_year = viewer.gate.write().mark_ready();
                    let queued_race = viewer.pending_race.write().take();
                    let year = queued_year.or(initial_year(&seasons, persisted.year));
                    if let Some(year) = year {
                        viewer.show_year(&db, year, queued_race.or(persisted.race_id));
                    }
                    state.seasons.set(seasons);
                    state.db.set(Some(db));
                }
                Err(e) => {
                    log::error!("[F1] grid viewer: failed to load data: {:#}", e);
                    state.error_msg.set(Some(format!("Failed to load data: {:#}", e)));
                }
            }
            state.loading.set(false);
        });
    });

    let on_year = move |evt: Event<FormData>| {
        let Ok(year) = evt.value().parse::<i32>() else {
            return;
        };
        let Some(db) = state.database() else {
            return;
        };
        let keep = *viewer.race.peek();
        viewer.show_year(&db, year, keep);
        persist(storage::persist_year(&LocalStorage, year));
        if let Some(race_id) = *viewer.race.peek() {
            persist(storage::persist_race(&LocalStorage, race_id));
        }
    };
    let on_race = move |evt: Event<FormData>| {
        let Ok(race_id) = evt.value().parse::<i64>() else {
            return;
        };
        let mut race = viewer.race;
        race.set(Some(race_id));
        persist(storage::persist_race(&LocalStorage, race_id));
    };

    let seasons = state.seasons.read().clone();
    let year = (viewer.year)();
    let races = (viewer.races)();
    let race = (viewer.race)();
    let title = match (year, race.and_then(|id| races.iter().find(|r| r.race_id == id))) {
        (Some(year), Some(option)) => format!("{} {} — Starting vs Finishing Grid", year, option.label),
        _ => String::new(),
    };
    let options: Vec<(i64, String, bool)> = races
        .iter()
        .map(|r| (r.race_id, r.label.clone(), Some(r.race_id) == race))
        .collect();
    let no_options = options.is_empty();

    rsx! {
        div {
            style: "max-width: 1100px; margin: 0 auto; padding: 12px; font-family: system-ui, -apple-system, sans-serif; background: #15151e; color: #f0f0f0; min-height: 100vh;",

            if let Some(err) = state.error_msg.read().as_ref() {
                ErrorDisplay { message: err.clone() }
            }

            if *state.loading.read() {
                LoadingSpinner {}
            } else {
                div {
                    style: "display: flex; gap: 16px; align-items: center; margin: 8px 0;",
                    label { r#for: "year-select", "Year: " }
                    select {
                        id: "year-select",
                        disabled: seasons.is_empty(),
                        onchange: on_year,
                        for y in seasons.iter() {
                            option { key: "{y}", value: "{y}", selected: Some(*y) == year, "{y}" }
                        }
                    }
                    label { r#for: "race-select", "Race: " }
                    select {
                        id: "race-select",
                        disabled: no_options,
                        onchange: on_race,
                        for (race_id, label, selected) in options.into_iter() {
                            option { key: "{race_id}", value: "{race_id}", selected: selected, "{label}" }
                        }
                    }
                }

                if race.is_some() {
                    GridChart {
                        id: CHART_ID.to_string(),
                        race_id: race,
                        title: title,
                    }
                } else if year.is_some() {
                    p { style: "color: #9a9aa5;", "No races with results for this year" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(race_id: i64, label: &str) -> RaceOption {
        RaceOption {
            race_id,
            label: label.to_string(),
        }
    }

    #[test]
    fn persisted_year_wins_when_known() {
        let seasons = [2022, 2021, 2020];
        assert_eq!(initial_year(&seasons, Some(2021)), Some(2021));
        assert_eq!(initial_year(&seasons, Some(1999)), Some(2022));
        assert_eq!(initial_year(&seasons, None), Some(2022));
        assert_eq!(initial_year(&[], Some(2021)), None);
    }

    #[test]
    fn preferred_race_kept_only_if_present() {
        let races = [option(1052, "Bahrain Grand Prix"), option(1053, "Emilia Romagna Grand Prix")];
        assert_eq!(pick_race(&races, Some(1053)), Some(1053));
        assert_eq!(pick_race(&races, Some(900)), Some(1052));
        assert_eq!(pick_race(&races, None), Some(1052));
        assert_eq!(pick_race(&[], Some(1052)), None);
    }
}
