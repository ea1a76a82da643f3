//! Scales, layouts and renderable scenes for the F1 dashboard widgets.
//!
//! Everything in this crate is plain geometry: no DOM, no JS. Widgets build a
//! scene from query results and draw it as an SVG subtree; the CLI writes the
//! same scenes to standalone SVG files.
//!
//! - `scale`: linear and point scales, margins
//! - `palette`: constructor color palettes
//! - `timeline`: serpentine multi-row season timeline
//! - `legend`: legend chip packing
//! - `grid_chart`: starting-vs-finishing slope chart
//! - `projection`: Mercator projection, TopoJSON/GeoJSON outlines, zoom transform
//! - `popup`: viewport clamping for floating popups
//! - `table`: sortable results tables
//! - `svg`: standalone SVG documents

pub mod scale;
pub mod palette;
pub mod timeline;
pub mod legend;
pub mod grid_chart;
pub mod projection;
pub mod popup;
pub mod table;
pub mod svg;

use serde::Serialize;

/// Horizontal text anchor of an SVG `text` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}
