//! Visualization panel with header and fullscreen toggle.

use super::ChartHeader;
use crate::state::AppState;
use dioxus::prelude::*;

/// Props for ChartContainer
fn panel_style(expanded: bool, min_height: u32) -> (&'static str, String) {
    if expanded {
        (
            "panel fullscreen",
            "position: fixed; inset: 0; z-index: 900; overflow: auto; background: #15151e; padding: 16px;"
                .to_string(),
        )
    } else {
        (
            "panel",
            format!(
                "min-height: {}px; position: relative; width: 100%; margin: 12px 0;",
                min_height
            ),
        )
    }
}

#[derive(Props, Clone, PartialEq)]
pub struct ChartContainerProps {
    /// DOM id of the panel; also identifies it as the fullscreen panel
    pub id: String,
    pub title: String,
    #[props(default = String::new())]
    pub subtitle: String,
    /// Minimum height in pixels
    #[props(default = 400)]
    pub min_height: u32,
    pub children: Element,
}

/// A panel holding one widget, with an "Expand"/"Collapse" toggle. Escape collapses it again (handled by the app).
#[component]
pub fn ChartContainer(props: ChartContainerProps) -> Element {
    let mut state = use_context::<AppState>();
    let expanded = state.fullscreen_panel.read().as_deref() == Some(props.id.as_str());

    let (class, style) = panel_style(expanded, props.min_height);

    let panel_id = props.id.clone();
    let on_toggle = move |evt: MouseEvent| {
        evt.stop_propagation();
        if expanded {
            state.fullscreen_panel.set(None);
        } else {
            state.fullscreen_panel.set(Some(panel_id.clone()));
        }
    };

    rsx! {
        section {
            id: "{props.id}",
            class: "{class}",
            style: "{style}",
            div {
                style: "display: flex; justify-content: space-between; align-items: flex-start;",
                ChartHeader {
                    title: props.title.clone(),
                    subtitle: props.subtitle.clone(),
                }
                button {
                    class: "panel-toggle",
                    onclick: on_toggle,
                    if expanded { "Collapse" } else { "Expand" }
                }
            }
            {props.children}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapsed_panel_keeps_min_height() {
        let (class, style) = panel_style(false, 520);
        assert_eq!(class, "panel");
        assert!(style.starts_with("min-height: 520px;"));
    }

    #[test]
    fn expanded_panel_covers_viewport() {
        let (class, style) = panel_style(true, 520);
        assert_eq!(class, "panel fullscreen");
        assert!(style.contains("position: fixed; inset: 0;"));
        assert!(!style.contains("min-height"));
    }
}
