//! Starting-vs-finishing grid slope chart.
//!
//! Starting positions run down the left axis, finishing positions down the
//! right one, position 1 at the top. Each finisher gets a line colored by
//! constructor; drivers who did not finish keep only their starting label.

use crate::legend::{pack_chips, Chip, TextMeasure};
use crate::palette::{OrdinalColors, GRID_PALETTE};
use crate::scale::{LinearScale, Margins};
use crate::Anchor;
use f1_db::models::GridEntry;
use serde::Serialize;

pub const DEFAULT_SIZE: (f64, f64) = (1000.0, 700.0);
pub const MIN_SIZE: f64 = 520.0;
pub const PADDING: f64 = 18.0;
pub const TITLE_HEIGHT: f64 = 28.0;
pub const LEGEND_HEIGHT: f64 = 90.0;
pub const LEGEND_GAP: f64 = 60.0;
pub const LABEL_GAP: f64 = 12.0;
pub const HEADER_Y: f64 = -18.0;
pub const FOOTNOTE_OFFSET: f64 = 34.0;
pub const START_HEADER: &str = "Starting Position";
pub const FINISH_HEADER: &str = "Finishing Position";
pub const FOOTNOTE: &str = "DNF = Did Not Finish";

pub const LINE_OPACITY: f64 = 0.9;
pub const LINE_OPACITY_FOCUSED: f64 = 0.95;
pub const LINE_OPACITY_DIMMED: f64 = 0.1;
pub const LABEL_OPACITY: f64 = 1.0;
pub const LABEL_OPACITY_DIMMED: f64 = 0.22;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlopeLine {
    pub driver_id: i64,
    pub constructor: String,
    pub color: &'static str,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridLabel {
    pub driver_id: i64,
    pub constructor: String,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub anchor: Anchor,
    /// Drawn with a muted fill (did not finish).
    pub dim: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextItem {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub anchor: Anchor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendChip {
    pub color: &'static str,
    pub chip: Chip,
}

/// Everything needed to draw one race's grid chart.
///
/// Lines, labels, headers and footnote are in inner coordinates (translate by
/// `margin.left, margin.top`); chips are relative to [`GridChartScene::chips_origin`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridChartScene {
    pub width: f64,
    pub height: f64,
    pub margin: Margins,
    pub inner_width: f64,
    pub inner_height: f64,
    pub lines: Vec<SlopeLine>,
    pub start_labels: Vec<GridLabel>,
    pub finish_labels: Vec<GridLabel>,
    pub headers: Vec<TextItem>,
    pub footnote: Option<TextItem>,
    pub chips: Vec<LegendChip>,
}

impl GridChartScene {
    pub fn is_empty(&self) -> bool {
        self.start_labels.is_empty()
    }

    pub fn chips_origin(&self) -> (f64, f64) {
        (PADDING, PADDING + TITLE_HEIGHT + 6.0)
    }

    pub fn inner_transform(&self) -> String {
        format!("translate({},{})", self.margin.left, self.margin.top)
    }
}

/// Line opacity with an optional hovered constructor.
pub fn line_opacity(constructor: &str, focus: Option<&str>) -> f64 {
    match focus {
        None => LINE_OPACITY,
        Some(f) if f == constructor => LINE_OPACITY_FOCUSED,
        Some(_) => LINE_OPACITY_DIMMED,
    }
}

/// Label opacity with an optional hovered constructor.
pub fn label_opacity(constructor: &str, focus: Option<&str>) -> f64 {
    match focus {
        Some(f) if f != constructor => LABEL_OPACITY_DIMMED,
        _ => LABEL_OPACITY,
    }
}

/// Canvas size clamped to the chart minimum.
pub fn canvas_size(size: Option<(f64, f64)>) -> (f64, f64) {
    let (w, h) = size.unwrap_or(DEFAULT_SIZE);
    let w = if w.is_finite() && w > 0.0 { w } else { DEFAULT_SIZE.0 };
    let h = if h.is_finite() && h > 0.0 { h } else { DEFAULT_SIZE.1 };
    (w.max(MIN_SIZE), h.max(MIN_SIZE))
}

pub fn margins(width: f64) -> Margins {
    Margins {
        top: PADDING + TITLE_HEIGHT + LEGEND_HEIGHT + LEGEND_GAP,
        right: (width * 0.28).clamp(220.0, 320.0),
        bottom: 56.0,
        left: (width * 0.30).clamp(220.0, 340.0),
    }
}

/// Build the chart for one race's grid entries.
///
/// Entries with a grid slot of zero or less are ignored.
pub fn build_grid_chart(
    entries: &[GridEntry],
    size: Option<(f64, f64)>,
    measure: &dyn TextMeasure,
) -> GridChartScene {
    let (width, height) = canvas_size(size);
    let margin = margins(width);
    let inner_width = (width - margin.left - margin.right).max(240.0);
    let inner_height = (height - margin.top - margin.bottom).max(300.0);

    let entries: Vec<&GridEntry> = entries.iter().filter(|e| e.grid > 0).collect();
    let mut scene = GridChartScene {
        width,
        height,
        margin,
        inner_width,
        inner_height,
        lines: Vec::new(),
        start_labels: Vec::new(),
        finish_labels: Vec::new(),
        headers: Vec::new(),
        footnote: None,
        chips: Vec::new(),
    };
    if entries.is_empty() {
        return scene;
    }

    let max_position = entries
        .iter()
        .map(|e| e.grid.max(e.position.unwrap_or(0)))
        .max()
        .unwrap_or(1);
    let y = LinearScale::new((1.0, max_position as f64), (0.0, inner_height));

    let mut colors = OrdinalColors::new(&GRID_PALETTE);
    let mut constructors: Vec<String> = Vec::new();
    for entry in &entries {
        colors.color(&entry.constructor_name);
        if !constructors.contains(&entry.constructor_name) {
            constructors.push(entry.constructor_name.clone());
        }
    }

    for entry in &entries {
        let start_y = y.map(entry.grid as f64);
        let dnf = entry.position.is_none();
        scene.start_labels.push(GridLabel {
            driver_id: entry.driver_id,
            constructor: entry.constructor_name.clone(),
            text: format!(
                "{}. {}{}",
                entry.grid,
                entry.driver_name,
                if dnf { " (DNF)" } else { "" }
            ),
            x: -LABEL_GAP,
            y: start_y,
            anchor: Anchor::End,
            dim: dnf,
        });

        if let Some(position) = entry.position {
            let finish_y = y.map(position as f64);
            scene.lines.push(SlopeLine {
                driver_id: entry.driver_id,
                constructor: entry.constructor_name.clone(),
                color: colors.color(&entry.constructor_name),
                x1: 0.0,
                y1: start_y,
                x2: inner_width,
                y2: finish_y,
            });
            scene.finish_labels.push(GridLabel {
                driver_id: entry.driver_id,
                constructor: entry.constructor_name.clone(),
                text: format!("{}. {}", position, entry.driver_name),
                x: inner_width + LABEL_GAP,
                y: finish_y,
                anchor: Anchor::Start,
                dim: false,
            });
        }
    }

    scene.headers = vec![
        TextItem {
            text: START_HEADER.to_string(),
            x: -LABEL_GAP,
            y: HEADER_Y,
            anchor: Anchor::End,
        },
        TextItem {
            text: FINISH_HEADER.to_string(),
            x: inner_width + LABEL_GAP,
            y: HEADER_Y,
            anchor: Anchor::Start,
        },
    ];
    scene.footnote = Some(TextItem {
        text: FOOTNOTE.to_string(),
        x: -LABEL_GAP,
        y: inner_height + FOOTNOTE_OFFSET,
        anchor: Anchor::End,
    });

    scene.chips = pack_chips(&constructors, width - PADDING * 2.0, measure)
        .into_iter()
        .map(|chip| LegendChip {
            color: colors.color(&chip.label),
            chip,
        })
        .collect();

    log::info!(
        "[F1] grid: {} entries, {} lines, {} constructors",
        entries.len(),
        scene.lines.len(),
        scene.chips.len()
    );
    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legend::ApproxMeasure;

    fn entry(id: i64, team: &str, grid: i64, position: Option<i64>) -> GridEntry {
        GridEntry {
            driver_id: id,
            driver_name: format!("Driver {}", id),
            constructor_name: team.to_string(),
            grid,
            position,
        }
    }

    #[test]
    fn canvas_size_is_clamped() {
        assert_eq!(canvas_size(None), (1000.0, 700.0));
        assert_eq!(canvas_size(Some((300.0, 200.0))), (520.0, 520.0));
        assert_eq!(canvas_size(Some((0.0, f64::NAN))), (1000.0, 700.0));
    }

    #[test]
    fn margins_follow_width() {
        let m = margins(1000.0);
        assert_eq!(m.top, 196.0);
        assert!((m.right - 280.0).abs() < 1e-9);
        assert!((m.left - 300.0).abs() < 1e-9);
        assert_eq!(m.bottom, 56.0);
        assert_eq!(margins(520.0).left, 220.0);
        assert_eq!(margins(2000.0).right, 320.0);
    }

    #[test]
    fn dnf_has_start_label_only() {
        let entries = vec![
            entry(1, "A", 1, Some(3)),
            entry(2, "B", 2, None),
            entry(3, "A", 3, Some(1)),
        ];
        let scene = build_grid_chart(&entries, None, &ApproxMeasure::default());
        assert_eq!(scene.lines.len(), 2);
        assert_eq!(scene.start_labels.len(), 3);
        assert_eq!(scene.finish_labels.len(), 2);

        let dnf = &scene.start_labels[1];
        assert_eq!(dnf.text, "2. Driver 2 (DNF)");
        assert!(dnf.dim);
        assert_eq!(scene.finish_labels[0].text, "3. Driver 1");
    }

    #[test]
    fn scale_is_monotonic_with_pole_on_top() {
        let entries: Vec<GridEntry> = (1..=20)
            .map(|g| entry(g, "T", g, Some(21 - g)))
            .collect();
        let scene = build_grid_chart(&entries, None, &ApproxMeasure::default());
        let ys: Vec<f64> = scene.start_labels.iter().map(|l| l.y).collect();
        assert_eq!(ys[0], 0.0);
        assert!(ys.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(*ys.last().unwrap(), scene.inner_height);
        let line = &scene.lines[0];
        assert_eq!((line.x1, line.x2), (0.0, scene.inner_width));
    }

    #[test]
    fn single_entry_sits_mid_height() {
        let scene = build_grid_chart(&[entry(1, "A", 1, Some(1))], None, &ApproxMeasure::default());
        assert_eq!(scene.start_labels[0].y, scene.inner_height / 2.0);
    }

    #[test]
    fn pit_lane_starters_are_excluded() {
        let entries = vec![entry(1, "A", 0, Some(5)), entry(2, "B", 1, Some(1))];
        let scene = build_grid_chart(&entries, None, &ApproxMeasure::default());
        assert_eq!(scene.start_labels.len(), 1);
        assert_eq!(scene.chips.len(), 1);
    }

    #[test]
    fn chips_in_order_of_first_appearance() {
        let entries = vec![
            entry(1, "Ferrari", 1, Some(2)),
            entry(2, "Mercedes", 2, Some(1)),
            entry(3, "Ferrari", 3, None),
        ];
        let scene = build_grid_chart(&entries, None, &ApproxMeasure::default());
        let names: Vec<&str> = scene.chips.iter().map(|c| c.chip.label.as_str()).collect();
        assert_eq!(names, vec!["Ferrari", "Mercedes"]);
        assert_eq!(scene.chips[0].color, scene.lines[0].color);
        assert_eq!(scene.chips[0].color, GRID_PALETTE[0]);
    }

    #[test]
    fn hover_isolation_opacities() {
        assert_eq!(line_opacity("A", None), 0.9);
        assert_eq!(line_opacity("A", Some("A")), 0.95);
        assert_eq!(line_opacity("B", Some("A")), 0.1);
        assert_eq!(label_opacity("B", None), 1.0);
        assert_eq!(label_opacity("A", Some("A")), 1.0);
        assert_eq!(label_opacity("B", Some("A")), 0.22);
    }

    #[test]
    fn empty_race_gives_empty_scene() {
        let scene = build_grid_chart(&[], None, &ApproxMeasure::default());
        assert!(scene.is_empty());
        assert!(scene.footnote.is_none());
    }
}
