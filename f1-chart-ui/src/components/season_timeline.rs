//! Serpentine season timeline with race details popup.

use super::ErrorDisplay;
use crate::js_bridge;
use crate::state::{use_container_size, AppState};
use dioxus::prelude::*;
use f1_db::models::RaceDetails;
use f1_db::Database;
use f1_sync::{SeasonGate, SelectionHub};
use f1_viz::popup::{position_popup, race_details_lines, retain_for_highlight};
use f1_viz::timeline::{layout_timeline, TimelineScene, MARKER_RADIUS};

/// Size assumed for the popup when clamping it into the viewport.
const POPUP_SIZE: (f64, f64) = (300.0, 200.0);

#[derive(Debug, Clone, PartialEq)]
struct Popup {
    race_id: i64,
    lines: Vec<String>,
    left: f64,
    top: f64,
}

fn timeline_scene(db: &Database, season: i32, width: Option<f64>) -> anyhow::Result<TimelineScene> {
    let races = db.query_season_races(season)?;
    let constructors = db.query_constructors_in_season(season)?;
    Ok(layout_timeline(&races, &constructors, width))
}

fn popup_for(details: &RaceDetails, click: (f64, f64)) -> Popup {
    let viewport = js_bridge::viewport_width().unwrap_or(1200.0);
    let (left, top) = position_popup(click, POPUP_SIZE, viewport);
    Popup {
        race_id: details.race_id,
        lines: race_details_lines(details),
        left,
        top,
    }
}

fn popup_line_class(index: usize) -> &'static str {
    if index == 0 {
        "popup-title"
    } else {
        "popup-line"
    }
}

#[derive(Props, Clone, PartialEq)]
pub struct SeasonTimelineProps {
    /// DOM id of the timeline container
    pub id: String,
    /// Season to draw; held back until the data has loaded
    #[props(!optional)]
    pub season: Option<i32>,
}

/// One season's races on a wrapping track, colored by winning constructor.
///
/// Clicking a marker opens the details popup and publishes the race
/// selection; the popup closes when the selection is cleared.
#[component]
pub fn SeasonTimeline(props: SeasonTimelineProps) -> Element {
    let state = use_context::<AppState>();
    let hub = use_context::<SelectionHub>();
    let mut gate = use_signal(SeasonGate::new);
    let mut shown = use_signal(|| None::<i32>);
    let size = use_container_size(state, &props.id);
    let mut popup = use_signal(|| None::<Popup>);

    // Data readiness opens the gate.
    use_effect(move || {
        if state.db.read().is_some() && !gate.peek().is_ready() {
            if let Some(season) = gate.write().mark_ready() {
                shown.set(Some(season));
            }
        }
    });

    use_effect(use_reactive((&props.season,), move |(season,)| {
        if let Some(season) = season {
            if let Some(apply) = gate.write().request(season) {
                shown.set(Some(apply));
            }
        }
        popup.set(None);
    }));

    use_effect(move || {
        let highlighted = (state.highlighted_race)();
        let open = popup.peek().clone();
        if open.is_some() && retain_for_highlight(open, |p: &Popup| p.race_id, highlighted).is_none() {
            popup.set(None);
        }
    });

    let scene = use_memo(move || {
        let season = shown()?;
        let db = state.db.read().clone()?;
        let width = size().map(|(w, _)| w);
        Some(timeline_scene(&db, season, width).map_err(|e| {
            log::error!("[F1] timeline: query failed: {:#}", e);
            format!("{:#}", e)
        }))
    });

    let on_marker = use_callback(move |(race_id, season, click): (i64, i32, (f64, f64))| {
        let Some(db) = state.database() else {
            return;
        };
        match db.query_race_details(race_id) {
            Ok(Some(details)) => popup.set(Some(popup_for(&details, click))),
            Ok(None) => popup.set(None),
            Err(e) => log::error!("[F1] timeline: details for race {} failed: {:#}", race_id, e),
        }
        hub.select_race(race_id, season);
    });

    let highlighted = (state.highlighted_race)();
    let container_id = props.id.clone();

    let content = match scene() {
        None => rsx! {},
        Some(Err(message)) => rsx! { ErrorDisplay { message: message } },
        Some(Ok(scene)) => {
            let view_box = format!("0 0 {} {}", scene.width, scene.height);
            let inner = scene.inner_transform();
            let message_x = scene.inner_width / 2.0;
            let message_y = scene.height / 2.0 - 10.0;
            let tracks: Vec<(f64, f64, f64, f64)> =
                scene.rows.iter().map(|r| (r.x1, r.y, r.x2, r.y)).collect();
            let arcs: Vec<String> = scene.connectors.iter().map(|c| c.path()).collect();
            let markers: Vec<_> = scene
                .markers()
                .map(|m| {
                    let active = Some(m.race_id) == highlighted;
                    (
                        m.clone(),
                        format!("translate({},{})", m.x, m.y),
                        m.label_transform(),
                        if active { "race-marker active" } else { "race-marker" },
                        if active { 3.0 } else { 1.5 },
                    )
                })
                .collect();
            rsx! {
                div {
                    class: "timeline-legend",
                    style: "display: flex; flex-wrap: wrap; gap: 6px 14px; margin-bottom: 6px; font-size: 12px;",
                    for entry in scene.legend.iter() {
                        span {
                            key: "{entry.constructor_id}",
                            style: "display: inline-flex; align-items: center; gap: 6px;",
                            span { style: "width: 12px; height: 12px; border-radius: 50%; background: {entry.color};" }
                            "{entry.name}"
                        }
                    }
                }
                svg {
                    width: "100%",
                    view_box: "{view_box}",
                    g {
                        transform: "{inner}",
                        if let Some(message) = scene.message.clone() {
                            text {
                                x: "{message_x}",
                                y: "{message_y}",
                                text_anchor: "middle",
                                fill: "#9a9aa5",
                                "{message}"
                            }
                        }
                        for (i, (x1, y1, x2, y2)) in tracks.into_iter().enumerate() {
                            line { key: "row-{i}", x1: "{x1}", y1: "{y1}", x2: "{x2}", y2: "{y2}", stroke: "#555", stroke_width: "2" }
                        }
                        for (i, d) in arcs.into_iter().enumerate() {
                            path { key: "arc-{i}", d: "{d}", fill: "none", stroke: "#555", stroke_width: "2" }
                        }
                        for (marker, transform, label_transform, class, stroke) in markers.into_iter() {
                            g {
                                key: "{marker.race_id}",
                                class: "{class}",
                                transform: "{transform}",
                                style: "cursor: pointer;",
                                onclick: move |evt: MouseEvent| {
                                    evt.stop_propagation();
                                    let point = evt.client_coordinates();
                                    on_marker.call((marker.race_id, marker.season, (point.x, point.y)));
                                },
                                circle { r: "{MARKER_RADIUS}", fill: "{marker.color}", stroke: "#f0f0f0", stroke_width: "{stroke}" }
                                text {
                                    transform: "{label_transform}",
                                    text_anchor: "end",
                                    font_size: "10",
                                    fill: "#9a9aa5",
                                    "{marker.label}"
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    let open_popup = popup().filter(|p| Some(p.race_id) == highlighted);

    rsx! {
        div {
            id: "{container_id}",
            class: "timeline",
            {content}
            if let Some(p) = open_popup {
                div {
                    class: "race-popup",
                    style: "position: fixed; left: {p.left}px; top: {p.top}px; max-width: 300px; z-index: 950; background: #1f1f2b; color: #f0f0f0; border: 1px solid #444; border-radius: 6px; padding: 10px 12px; font-size: 12px;",
                    onclick: move |evt: MouseEvent| evt.stop_propagation(),
                    for (i, class, line) in p.lines.into_iter().enumerate().map(|(i, l)| (i, popup_line_class(i), l)) {
                        div {
                            key: "{i}",
                            class: "{class}",
                            "{line}"
                        }
                    }
                }
            }
        }
    }
}
