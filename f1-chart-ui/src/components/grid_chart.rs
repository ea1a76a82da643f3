//! Starting-vs-finishing grid slope chart for one race.

use super::ErrorDisplay;
use crate::js_bridge::CanvasMeasure;
use crate::state::{use_container_size, AppState};
use dioxus::prelude::*;
use f1_viz::grid_chart::{build_grid_chart, label_opacity, line_opacity, GridChartScene};
use f1_viz::legend::{CHIP_HEIGHT, DOT_RADIUS};
use std::rc::Rc;

#[derive(Props, Clone, PartialEq)]
pub struct GridChartProps {
    /// DOM id of the chart container
    pub id: String,
    #[props(!optional)]
    pub race_id: Option<i64>,
    /// Heading drawn above the legend
    #[props(default = String::new())]
    pub title: String,
}

/// Slope chart of one race's starting and finishing positions.
///
/// Hovering a constructor's legend chip isolates its drivers.
#[component]
pub fn GridChart(props: GridChartProps) -> Element {
    let state = use_context::<AppState>();
    let measure = use_hook(|| Rc::new(CanvasMeasure::for_chips()));
    let size = use_container_size(state, &props.id);
    let mut focus = use_signal(|| None::<String>);

    let race_id = props.race_id;
    let scene = use_memo(use_reactive((&race_id,), move |(race_id,)| {
        let race_id = race_id?;
        let db = state.db.read().clone()?;
        Some(
            db.query_grid_entries(race_id)
                .map(|entries| build_grid_chart(&entries, size(), measure.as_ref()))
                .map_err(|e| {
                    log::error!("[F1] grid: query for race {} failed: {:#}", race_id, e);
                    format!("{:#}", e)
                }),
        )
    }));

    let content = match scene() {
        None => rsx! {},
        Some(Err(message)) => rsx! { ErrorDisplay { message: message } },
        Some(Ok(scene)) => render_scene(&scene, &props.title, focus().as_deref(), focus),
    };

    rsx! {
        div {
            id: "{props.id}",
            class: "grid-chart",
            style: "width: 100%; min-height: 520px;",
            {content}
        }
    }
}

fn render_scene(
    scene: &GridChartScene,
    title: &str,
    focused: Option<&str>,
    mut focus: Signal<Option<String>>,
) -> Element {
    let view_box = format!("0 0 {} {}", scene.width, scene.height);
    let title_x = scene.width / 2.0;
    let (chips_x, chips_y) = scene.chips_origin();
    let chips_transform = format!("translate({},{})", chips_x, chips_y);
    let inner = scene.inner_transform();
    let empty_x = scene.inner_width / 2.0;
    let empty_y = scene.inner_height / 2.0;
    let title = title.to_string();

    let chips: Vec<_> = scene
        .chips
        .iter()
        .map(|c| {
            let (dot_x, dot_y) = c.chip.dot_center();
            (
                c.chip.label.clone(),
                format!("translate({},{})", c.chip.x, c.chip.y),
                c.chip.width,
                dot_x,
                dot_y,
                c.chip.text_x(),
                c.color,
            )
        })
        .collect();
    let lines: Vec<_> = scene
        .lines
        .iter()
        .map(|l| {
            (
                l.driver_id,
                l.x1,
                l.y1,
                l.x2,
                l.y2,
                l.color,
                line_opacity(&l.constructor, focused),
            )
        })
        .collect();
    let labels: Vec<_> = scene
        .start_labels
        .iter()
        .map(|l| ("s", l))
        .chain(scene.finish_labels.iter().map(|l| ("f", l)))
        .map(|(side, l)| {
            (
                format!("{}-{}", side, l.driver_id),
                l.x,
                l.y,
                l.anchor.as_str(),
                if l.dim { "#9a9aa5" } else { "#f0f0f0" },
                label_opacity(&l.constructor, focused),
                l.text.clone(),
            )
        })
        .collect();
    let headers: Vec<_> = scene
        .headers
        .iter()
        .chain(scene.footnote.iter())
        .enumerate()
        .map(|(i, t)| (i, t.x, t.y, t.anchor.as_str(), t.text.clone()))
        .collect();
    let half_chip = CHIP_HEIGHT / 2.0;

    rsx! {
        svg {
            width: "100%",
            view_box: "{view_box}",
            if !title.is_empty() {
                text {
                    x: "{title_x}",
                    y: "28",
                    text_anchor: "middle",
                    font_size: "18",
                    fill: "#f0f0f0",
                    "{title}"
                }
            }
            g {
                class: "legend",
                transform: "{chips_transform}",
                for (label, transform, width, dot_x, dot_y, text_x, color) in chips.into_iter() {
                    g {
                        key: "{label}",
                        transform: "{transform}",
                        style: "cursor: default;",
                        onmouseenter: {
                            let label = label.clone();
                            move |_| focus.set(Some(label.clone()))
                        },
                        onmouseleave: move |_| focus.set(None),
                        rect { width: "{width}", height: "{CHIP_HEIGHT}", rx: "{half_chip}", fill: "none", stroke: "#555" }
                        circle { cx: "{dot_x}", cy: "{dot_y}", r: "{DOT_RADIUS}", fill: "{color}" }
                        text { x: "{text_x}", y: "{half_chip}", dominant_baseline: "middle", font_size: "12", fill: "#f0f0f0", "{label}" }
                    }
                }
            }
            g {
                transform: "{inner}",
                if scene.is_empty() {
                    text { x: "{empty_x}", y: "{empty_y}", text_anchor: "middle", fill: "#9a9aa5", "No grid data for this race" }
                }
                for (driver_id, x1, y1, x2, y2, color, opacity) in lines.into_iter() {
                    line { key: "{driver_id}", x1: "{x1}", y1: "{y1}", x2: "{x2}", y2: "{y2}", stroke: "{color}", stroke_width: "2.5", stroke_opacity: "{opacity}" }
                }
                for (key, x, y, anchor, fill, opacity, text) in labels.into_iter() {
                    text { key: "{key}", x: "{x}", y: "{y}", text_anchor: "{anchor}", dominant_baseline: "middle", font_size: "12", fill: "{fill}", opacity: "{opacity}", "{text}" }
                }
                for (i, x, y, anchor, text) in headers.into_iter() {
                    text { key: "{i}", x: "{x}", y: "{y}", text_anchor: "{anchor}", font_size: "13", fill: "#f0f0f0", "{text}" }
                }
            }
        }
    }
}
