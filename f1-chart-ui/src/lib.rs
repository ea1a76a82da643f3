//! Shared Dioxus components and browser bridge for the F1 apps.
//!
//! - `js_bridge`: fetch, localStorage, DOM measurement and window listeners via `web-sys`
//! - `state`: reactive [`state::AppState`] and the selection-to-signal sync
//! - `components`: the dashboard widgets (timeline, circuit map, tables, grid chart)

pub mod js_bridge;
pub mod state;
pub mod components;
