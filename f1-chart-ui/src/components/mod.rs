//! Reusable Dioxus RSX components for the F1 apps.

mod chart_container;
mod chart_header;
mod circuit_map;
mod error_display;
mod grid_chart;
mod loading_spinner;
mod modal;
mod results_tables;
mod season_selector;
mod season_timeline;

pub use chart_container::ChartContainer;
pub use chart_header::ChartHeader;
pub use circuit_map::CircuitMap;
pub use error_display::ErrorDisplay;
pub use grid_chart::GridChart;
pub use loading_spinner::LoadingSpinner;
pub use modal::GridModal;
pub use results_tables::ResultsTables;
pub use season_selector::SeasonSelector;
pub use season_timeline::SeasonTimeline;
