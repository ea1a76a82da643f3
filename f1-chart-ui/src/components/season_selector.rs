//! Dropdown selector for choosing a season.

use crate::state::AppState;
use dioxus::prelude::*;
use f1_sync::SelectionHub;

/// Season dropdown, newest first.
/// Selecting a season goes through the hub so every widget follows.
#[component]
pub fn SeasonSelector() -> Element {
    let state = use_context::<AppState>();
    let hub = use_context::<SelectionHub>();
    let seasons = state.seasons.read().clone();
    let selected = (state.selected_season)();

    let on_change = move |evt: Event<FormData>| match evt.value().parse::<i32>() {
        Ok(year) => hub.set_season(year),
        Err(_) => log::warn!("[F1] season selector: ignoring value {:?}", evt.value()),
    };

    rsx! {
        div {
            style: "margin: 8px 0;",
            label {
                r#for: "season-select",
                style: "font-weight: bold; margin-right: 8px;",
                "Season: "
            }
            select {
                id: "season-select",
                disabled: seasons.is_empty(),
                onchange: on_change,
                for year in seasons.iter() {
                    option {
                        key: "{year}",
                        value: "{year}",
                        selected: Some(*year) == selected,
                        "{year}"
                    }
                }
            }
        }
    }
}
