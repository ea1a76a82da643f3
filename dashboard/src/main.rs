//! F1 Season Dashboard
//!
//! Season timeline, circuit map and results tables for one season at a
//! time, kept in step through a shared [`SelectionHub`].
//!
//! Data flow:
//! 1. On mount: fetch every `data/<table>.csv` concurrently and build the
//!    in-memory database.
//! 2. Publish the latest season; widgets held back by their `SeasonGate`
//!    render once the database is in place.
//! 3. Clicking a race anywhere selects it for every widget; clicking blank
//!    page space clears the selection. Race rows open the grid chart modal.

use f1_chart_ui::components::{
    ChartContainer, CircuitMap, ErrorDisplay, GridModal, LoadingSpinner, ResultsTables,
    SeasonSelector, SeasonTimeline,
};
use f1_chart_ui::js_bridge::{self, LocalStorage};
use f1_chart_ui::state::{use_selection_sync, AppState};
use f1_db::Database;
use f1_sync::SelectionHub;
use dioxus::prelude::*;
use std::rc::Rc;

/// Directory the table CSVs are served from, relative to the page.
const DATA_PATH: &str = "data";

const TIMELINE_PANEL_ID: &str = "timeline-panel";
const MAP_PANEL_ID: &str = "map-panel";
const RESULTS_PANEL_ID: &str = "results-panel";

const STYLE: &str = r#"
body { margin: 0; background: #15151e; color: #f0f0f0; }
.panel { background: #1b1b26; border: 1px solid #2a2a35; border-radius: 8px; padding: 12px; box-sizing: border-box; }
.panel-toggle, .modal-close, .tooltip-close, .tab { background: #2a2a35; color: #f0f0f0; border: 1px solid #444; border-radius: 4px; padding: 4px 10px; cursor: pointer; }
.tab.active { background: #e10600; border-color: #e10600; }
.results-table tr.highlighted td { background: rgba(225, 6, 0, 0.25); }
.results-table tbody tr:hover td { background: #23232f; }
.race-marker.active circle { stroke: #ffd700; }
.circuit-point.active { stroke: #ffd700; }
.popup-title { font-weight: bold; margin-bottom: 4px; }
.popup-line { margin: 2px 0; }
select { background: #1b1b26; color: #f0f0f0; border: 1px solid #444; padding: 4px 6px; }
"#;

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("f1-dashboard-root"))
        .launch(App);
}

#[component]
fn App() -> Element {
    let mut state = use_context_provider(AppState::new);
    let hub = use_context_provider(|| SelectionHub::with_storage(Rc::new(LocalStorage)));
    let _sync = use_selection_sync(state, hub.clone());

    // ─── Escape closes the modal, then any fullscreen panel ───
    use_hook(move || {
        let result = js_bridge::on_escape(move || {
            let (mut modal, mut fullscreen) = (state.modal_race, state.fullscreen_panel);
            if modal.peek().is_some() {
                modal.set(None);
            } else if fullscreen.peek().is_some() {
                fullscreen.set(None);
            }
        });
        if let Err(e) = result {
            log::warn!("[F1] dashboard: Escape shortcut unavailable: {:#}", e);
        }
    });

    // ─── Load all tables once on mount ───
    let loader_hub = hub.clone();
    use_effect(move || {
        let hub = loader_hub.clone();
        spawn(async move {
            match load_database().await {
                Ok((db, seasons)) => {
                    log::info!("[F1] dashboard: loaded {} seasons", seasons.len());
                    let latest = seasons.first().copied();
                    state.seasons.set(seasons);
                    state.db.set(Some(db));
                    state.loading.set(false);
                    if let Some(season) = latest {
                        hub.set_season(season);
                    }
                }
                Err(e) => {
                    log::error!("[F1] dashboard: failed to load data: {:#}", e);
                    state.error_msg.set(Some(format!("Failed to load data: {:#}", e)));
                    state.loading.set(false);
                }
            }
        });
    });

    let season = (state.selected_season)();
    let subtitle = season.map(|s| s.to_string()).unwrap_or_default();
    let ready = state.db.read().is_some();
    let clear_hub = hub.clone();

    rsx! {
        style { {STYLE} }
        div {
            style: "max-width: 1200px; margin: 0 auto; padding: 12px; min-height: 100vh; font-family: system-ui, -apple-system, sans-serif;",
            onclick: move |_| clear_hub.clear_race(),

            h1 { style: "margin: 8px 0;", "Formula 1 Season Explorer" }

            if let Some(err) = state.error_msg.read().as_ref() {
                ErrorDisplay { message: err.clone() }
            }

            if *state.loading.read() {
                LoadingSpinner { message: "Loading season data...".to_string() }
            } else if ready {
                SeasonSelector {}

                ChartContainer {
                    id: TIMELINE_PANEL_ID.to_string(),
                    title: "Season Timeline".to_string(),
                    subtitle: subtitle.clone(),
                    min_height: 320,
                    SeasonTimeline { id: "season-timeline".to_string(), season }
                }

                ChartContainer {
                    id: MAP_PANEL_ID.to_string(),
                    title: "Circuit Map".to_string(),
                    subtitle: subtitle.clone(),
                    min_height: 480,
                    CircuitMap { id: "circuit-map".to_string(), season }
                }

                ChartContainer {
                    id: RESULTS_PANEL_ID.to_string(),
                    title: "Results".to_string(),
                    subtitle: subtitle,
                    min_height: 360,
                    ResultsTables {}
                }

                GridModal {}
            }
        }
    }
}

async fn load_database() -> anyhow::Result<(Database, Vec<i32>)> {
    let tables = js_bridge::fetch_tables(DATA_PATH).await?;
    let db = Database::from_tables(&tables)?;
    let seasons = db.query_seasons()?;
    Ok((db, seasons))
}
