//! Error display component.

use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct ErrorDisplayProps {
    pub message: String,
}

/// Displays an error message in a styled box.
#[component]
pub fn ErrorDisplay(props: ErrorDisplayProps) -> Element {
    rsx! {
        div {
            class: "error",
            style: "padding: 12px 16px; margin: 8px 0; background: #3b1216; color: #ff8a8a; border-radius: 4px; border: 1px solid #e10600;",
            strong { "Error: " }
            "{props.message}"
        }
    }
}
