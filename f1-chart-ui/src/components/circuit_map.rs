//! World map of the season's circuits with wheel zoom and drag pan.

use crate::js_bridge;
use crate::state::AppState;
use dioxus::prelude::*;
use f1_sync::{SeasonGate, SelectionHub};
use f1_viz::projection::{
    build_map_scene, country_shapes, CountryClass, CountryShape, MapPoint, Mercator, ZoomTransform,
    MAP_HEIGHT, MAP_WIDTH,
};
use f1_viz::popup::retain_for_highlight;

/// Pointer travel (in map units) after which a press counts as a drag.
const DRAG_THRESHOLD: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    last: (f64, f64),
    travelled: f64,
}

#[derive(Props, Clone, PartialEq)]
pub struct CircuitMapProps {
    /// DOM id of the map container
    pub id: String,
    /// Season whose circuits are plotted; held back until the data has loaded
    #[props(!optional)]
    pub season: Option<i32>,
    /// World outline (TopoJSON or GeoJSON); without it only the points are drawn
    #[props(default = "Circuit_Map/world.json".to_string())]
    pub world_url: String,
}

/// Circuit map: countries shaded by hosting history, one point per race of
/// the selected season. Clicking a point selects the race and opens its
/// tooltip; clicking the empty map clears the selection.
#[component]
pub fn CircuitMap(props: CircuitMapProps) -> Element {
    let state = use_context::<AppState>();
    let hub = use_context::<SelectionHub>();
    let mut gate = use_signal(SeasonGate::new);
    let mut shown = use_signal(|| None::<i32>);
    let mut shapes = use_signal(Vec::<CountryShape>::new);
    let mut world_loaded = use_signal(|| false);
    let mut zoom = use_signal(ZoomTransform::default);
    let mut drag = use_signal(|| None::<Drag>);
    let mut suppress_click = use_signal(|| false);
    let mut tooltip = use_signal(|| None::<MapPoint>);

    // ─── World outline (optional) ───
    let world_url = props.world_url.clone();
    use_effect(move || {
        let url = world_url.clone();
        spawn(async move {
            match js_bridge::fetch_optional_text(&url).await {
                Ok(Some(text)) => match country_shapes(&text, &Mercator::world()) {
                    Ok(parsed) => shapes.set(parsed),
                    Err(e) => log::warn!("[F1] map: {} is not a usable outline: {:#}", url, e),
                },
                Ok(None) => log::warn!("[F1] map: {} not found, drawing points only", url),
                Err(e) => log::warn!("[F1] map: failed to fetch {}: {:#}", url, e),
            }
            world_loaded.set(true);
        });
    });

    // ─── Season gate ───
    use_effect(move || {
        let ready = state.db.read().is_some() && world_loaded();
        if ready && !gate.peek().is_ready() {
            if let Some(season) = gate.write().mark_ready() {
                shown.set(Some(season));
            }
        }
    });

    use_effect(use_reactive((&props.season,), move |(season,)| {
        if let Some(season) = season {
            // A new season drops the previous season's open point.
            tooltip.set(None);
            if let Some(apply) = gate.write().request(season) {
                shown.set(Some(apply));
            }
        }
    }));

    use_effect(move || {
        let highlighted = (state.highlighted_race)();
        let open = tooltip.peek().clone();
        if open.is_some() && retain_for_highlight(open, |p: &MapPoint| p.race_id, highlighted).is_none() {
            tooltip.set(None);
        }
    });

    let races = use_memo(move || {
        let db = state.db.read().clone()?;
        match db.query_map_races() {
            Ok(races) => Some(races),
            Err(e) => {
                log::error!("[F1] map: query failed: {:#}", e);
                None
            }
        }
    });

    let highlighted = (state.highlighted_race)();
    let scene = build_map_scene(
        &shapes.read(),
        races.read().as_deref().unwrap_or(&[]),
        shown(),
        highlighted,
        &Mercator::world(),
    );

    let svg_id = format!("{}-svg", props.id);
    let to_map = {
        let svg_id = svg_id.clone();
        move |client: (f64, f64)| -> (f64, f64) {
            match js_bridge::element_rect(&svg_id) {
                Some((left, top, width, height)) => (
                    (client.0 - left) * MAP_WIDTH / width,
                    (client.1 - top) * MAP_HEIGHT / height,
                ),
                None => client,
            }
        }
    };
    let wheel_to_map = to_map.clone();
    let down_to_map = to_map.clone();
    let move_to_map = to_map;

    let clear_hub = hub.clone();
    let close_hub = hub.clone();
    let on_point = use_callback(move |point: MapPoint| {
        hub.select_race(point.race_id, point.season);
        tooltip.set(Some(point));
    });

    let transform = zoom().to_svg();
    let radius = zoom().point_radius();
    let point_stroke = zoom().point_stroke();
    let country_stroke = 0.5 / zoom().k;
    let view_box = format!("0 0 {} {}", MAP_WIDTH, MAP_HEIGHT);

    let countries: Vec<(usize, String, &'static str, &'static str)> = scene
        .countries
        .iter()
        .enumerate()
        .map(|(i, (shape, class))| (i, shape.path.clone(), class.css_class(), class.fill()))
        .collect();
    let points: Vec<(i64, f64, f64, &'static str, &'static str, MapPoint)> = scene
        .points
        .iter()
        .map(|p| {
            let (class, fill) = if p.active {
                ("circuit-point active", "#ffd700")
            } else {
                ("circuit-point", "#e10600")
            };
            (p.race_id, p.x, p.y, class, fill, p.clone())
        })
        .collect();

    // Tooltip only while its race is still the selected one.
    let open_tooltip = tooltip().filter(|p| Some(p.race_id) == highlighted).map(|p| {
        let (x, y) = zoom().apply((p.x, p.y));
        (p, x / MAP_WIDTH * 100.0, y / MAP_HEIGHT * 100.0)
    });
    let legend: Vec<(&'static str, &'static str)> = CountryClass::ALL
        .iter()
        .map(|c| (c.label(), c.fill()))
        .collect();

    rsx! {
        div {
            id: "{props.id}",
            class: "circuit-map",
            style: "position: relative;",
            svg {
                id: "{svg_id}",
                view_box: "{view_box}",
                width: "100%",
                style: "display: block; background: #0e0e14; cursor: grab; user-select: none;",
                onwheel: move |evt: WheelEvent| {
                    evt.prevent_default();
                    let point = evt.client_coordinates();
                    let anchor = wheel_to_map((point.x, point.y));
                    let factor = ZoomTransform::wheel_factor(evt.delta().strip_units().y);
                    zoom.set(zoom().zoom_at(anchor, factor));
                },
                onmousedown: move |evt: MouseEvent| {
                    let point = evt.client_coordinates();
                    drag.set(Some(Drag { last: down_to_map((point.x, point.y)), travelled: 0.0 }));
                },
                onmousemove: move |evt: MouseEvent| {
                    let Some(current) = drag() else {
                        return;
                    };
                    let point = evt.client_coordinates();
                    let now = move_to_map((point.x, point.y));
                    let (dx, dy) = (now.0 - current.last.0, now.1 - current.last.1);
                    zoom.set(zoom().pan(dx, dy));
                    drag.set(Some(Drag { last: now, travelled: current.travelled + dx.abs() + dy.abs() }));
                },
                onmouseup: move |_| {
                    if let Some(done) = drag() {
                        suppress_click.set(done.travelled > DRAG_THRESHOLD);
                    }
                    drag.set(None);
                },
                onmouseleave: move |_| drag.set(None),
                onclick: move |evt: MouseEvent| {
                    evt.stop_propagation();
                    if suppress_click() {
                        suppress_click.set(false);
                        return;
                    }
                    tooltip.set(None);
                    clear_hub.clear_race();
                },
                g {
                    transform: "{transform}",
                    for (i, d, class, fill) in countries.into_iter() {
                        path { key: "{i}", d: "{d}", class: "{class}", fill: "{fill}", stroke: "#15151e", stroke_width: "{country_stroke}" }
                    }
                    for (race_id, cx, cy, class, fill, point) in points.into_iter() {
                        circle {
                            key: "{race_id}",
                            class: "{class}",
                            cx: "{cx}",
                            cy: "{cy}",
                            r: "{radius}",
                            fill: "{fill}",
                            stroke: "#f0f0f0",
                            stroke_width: "{point_stroke}",
                            style: "cursor: pointer;",
                            onclick: move |evt: MouseEvent| {
                                evt.stop_propagation();
                                on_point.call(point.clone());
                            },
                        }
                    }
                }
            }
            if let Some((point, left, top)) = open_tooltip {
                div {
                    class: "map-tooltip",
                    style: "position: absolute; left: {left}%; top: {top}%; transform: translate(12px, -50%); background: #1f1f2b; color: #f0f0f0; border: 1px solid #444; border-radius: 6px; padding: 8px 10px; font-size: 12px; z-index: 10;",
                    onclick: move |evt: MouseEvent| evt.stop_propagation(),
                    button {
                        class: "tooltip-close",
                        style: "float: right; margin-left: 8px;",
                        onclick: move |evt: MouseEvent| {
                            evt.stop_propagation();
                            tooltip.set(None);
                            close_hub.clear_race();
                        },
                        "×"
                    }
                    div { style: "font-weight: bold;", "{point.name}" }
                    div { "Circuit: {point.circuit_name}" }
                    div { "Country: {point.country}" }
                    div { "Number of Races: {point.round}" }
                }
            }
            div {
                class: "map-legend",
                style: "display: flex; gap: 8px; margin-top: 6px; font-size: 12px;",
                for (label, fill) in legend.into_iter() {
                    span {
                        key: "{label}",
                        class: "legend-pill",
                        style: "display: inline-flex; align-items: center; gap: 6px; padding: 2px 10px; border: 1px solid #444; border-radius: 999px;",
                        span { style: "width: 10px; height: 10px; border-radius: 2px; background: {fill};" }
                        "{label}"
                    }
                }
            }
        }
    }
}
