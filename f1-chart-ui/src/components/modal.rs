//! Grid chart modal opened from a race row.

use super::GridChart;
use crate::state::AppState;
use dioxus::prelude::*;

/// Overlay showing the starting-vs-finishing grid of `AppState::modal_race`.
///
/// The backdrop and the close button dismiss it; Escape is handled by the app.
#[component]
pub fn GridModal() -> Element {
    let mut state = use_context::<AppState>();
    let Some(race) = (state.modal_race)() else {
        return rsx! {};
    };
    let title = race.title();

    rsx! {
        div {
            class: "modal-backdrop",
            style: "position: fixed; inset: 0; z-index: 1000; background: rgba(0, 0, 0, 0.7); display: flex; align-items: center; justify-content: center;",
            onclick: move |evt: MouseEvent| {
                evt.stop_propagation();
                state.modal_race.set(None);
            },
            div {
                class: "modal",
                style: "width: min(1100px, 95vw); max-height: 92vh; overflow: auto; background: #15151e; border: 1px solid #444; border-radius: 8px; padding: 12px 16px;",
                onclick: move |evt: MouseEvent| evt.stop_propagation(),
                div {
                    style: "display: flex; justify-content: space-between; align-items: center;",
                    h3 { style: "margin: 0;", "{title}" }
                    button {
                        class: "modal-close",
                        onclick: move |evt: MouseEvent| {
                            evt.stop_propagation();
                            state.modal_race.set(None);
                        },
                        "×"
                    }
                }
                GridChart {
                    key: "{race.race_id}",
                    id: "modal-grid-chart".to_string(),
                    race_id: Some(race.race_id),
                }
            }
        }
    }
}
