//! Serpentine multi-row season timeline.
//!
//! Races are split into rows no denser than [`MIN_SPACING`] pixels per race.
//! Odd rows run right to left, and consecutive rows are joined by half-circle
//! arcs so the season reads as one continuous track.

use crate::palette::SeasonColors;
use crate::scale::{Margins, PointScale};
use f1_db::models::{ConstructorInfo, TimelineRace};
use serde::Serialize;

pub const MARGIN: Margins = Margins {
    top: 10.0,
    right: 40.0,
    bottom: 40.0,
    left: 40.0,
};
pub const ROW_HEIGHT: f64 = 80.0;
pub const MIN_SPACING: f64 = 70.0;
pub const LABEL_OFFSET: f64 = 28.0;
pub const LABEL_ROTATION: f64 = -32.0;
pub const MARKER_RADIUS: f64 = 8.0;
pub const DEFAULT_WIDTH: f64 = 900.0;
pub const MIN_INNER_WIDTH: f64 = 300.0;
pub const EMPTY_SEASON_MESSAGE: &str = "No data available for this season";

/// One race marker, in inner (margin-translated) coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineMarker {
    pub race_id: i64,
    pub season: i32,
    pub round: i64,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub color: &'static str,
    pub label: String,
}

impl TimelineMarker {
    /// SVG transform of the circuit label relative to the marker.
    pub fn label_transform(&self) -> String {
        format!("translate(0,{}) rotate({})", LABEL_OFFSET, LABEL_ROTATION)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineRow {
    pub y: f64,
    pub reversed: bool,
    /// Base line from the row's first point to its last.
    pub x1: f64,
    pub x2: f64,
    pub markers: Vec<TimelineMarker>,
}

/// Arc joining the last point of one row to the first point of the next.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connector {
    pub start: (f64, f64),
    pub end: (f64, f64),
    pub radius: f64,
    pub sweep: u8,
}

impl Connector {
    pub fn between(index: usize, start: (f64, f64), end: (f64, f64)) -> Self {
        let radius = (end.0 - start.0).hypot(end.1 - start.1) / 2.0;
        Self {
            start,
            end,
            radius,
            sweep: if index % 2 == 0 { 1 } else { 0 },
        }
    }

    /// SVG path data: `M sx,sy A r,r 0 0 sweep ex,ey`.
    pub fn path(&self) -> String {
        format!(
            "M{},{} A{},{} 0 0 {} {},{}",
            self.start.0,
            self.start.1,
            self.radius,
            self.radius,
            self.sweep,
            self.end.0,
            self.end.1
        )
    }
}

/// Legend entry above the timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub constructor_id: i64,
    pub name: String,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineScene {
    pub width: f64,
    pub height: f64,
    pub inner_width: f64,
    pub rows: Vec<TimelineRow>,
    pub connectors: Vec<Connector>,
    pub legend: Vec<LegendEntry>,
    /// Set when the season has no races.
    pub message: Option<String>,
}

impl TimelineScene {
    pub fn markers(&self) -> impl Iterator<Item = &TimelineMarker> {
        self.rows.iter().flat_map(|r| r.markers.iter())
    }

    /// SVG transform placing inner coordinates inside the margins.
    pub fn inner_transform(&self) -> String {
        format!("translate({},{})", MARGIN.left, MARGIN.top)
    }
}

/// Inner drawing width for a container width.
pub fn inner_width(container_width: f64) -> f64 {
    (container_width - MARGIN.left - MARGIN.right).max(MIN_INNER_WIDTH)
}

/// Most races that fit in one row of `inner_width` pixels.
pub fn max_per_row(inner_width: f64) -> usize {
    ((inner_width / MIN_SPACING).floor() as usize).max(1)
}

/// Split `count` races into balanced rows of at most `max_per_row`.
///
/// The first `count % rows` rows take one extra race.
pub fn row_sizes(count: usize, max_per_row: usize) -> Vec<usize> {
    let max_per_row = max_per_row.max(1);
    let rows = count.div_ceil(max_per_row).max(1);
    let base = count / rows;
    let extra = count % rows;
    (0..rows).map(|r| base + usize::from(r < extra)).collect()
}

/// Lay out a season's races.
///
/// `races` must be ordered by round; `constructors` is the season's
/// constructor list sorted by id and drives marker colors.
pub fn layout_timeline(
    races: &[TimelineRace],
    constructors: &[ConstructorInfo],
    container_width: Option<f64>,
) -> TimelineScene {
    let width = container_width
        .filter(|w| w.is_finite() && *w > 0.0)
        .unwrap_or(DEFAULT_WIDTH);
    let inner = inner_width(width);

    if races.is_empty() {
        return TimelineScene {
            width,
            height: ROW_HEIGHT + MARGIN.top + MARGIN.bottom,
            inner_width: inner,
            rows: Vec::new(),
            connectors: Vec::new(),
            legend: Vec::new(),
            message: Some(EMPTY_SEASON_MESSAGE.to_string()),
        };
    }

    let colors = SeasonColors::new(constructors);
    let sizes = row_sizes(races.len(), max_per_row(inner));

    let mut rows = Vec::with_capacity(sizes.len());
    let mut cursor = 0;
    for (row_index, size) in sizes.iter().copied().enumerate() {
        let slice = &races[cursor..cursor + size];
        cursor += size;

        let y = row_index as f64 * ROW_HEIGHT + ROW_HEIGHT / 2.0;
        let reversed = row_index % 2 == 1;
        let range = if reversed { (inner, 0.0) } else { (0.0, inner) };
        let x = PointScale::new(size, range, 0.5);

        let markers: Vec<TimelineMarker> = slice
            .iter()
            .enumerate()
            .map(|(i, race)| TimelineMarker {
                race_id: race.race_id,
                season: race.season,
                round: race.round,
                name: race.name.clone(),
                x: x.position(i).unwrap_or(0.0),
                y,
                color: colors.color(race.winner_constructor_id),
                label: race.circuit_label.clone(),
            })
            .collect();

        rows.push(TimelineRow {
            y,
            reversed,
            x1: markers.first().map(|m| m.x).unwrap_or(0.0),
            x2: markers.last().map(|m| m.x).unwrap_or(0.0),
            markers,
        });
    }

    let connectors = rows
        .windows(2)
        .enumerate()
        .map(|(i, pair)| Connector::between(i, (pair[0].x2, pair[0].y), (pair[1].x1, pair[1].y)))
        .collect();

    let legend = constructors
        .iter()
        .map(|c| LegendEntry {
            constructor_id: c.constructor_id,
            name: c.name.clone(),
            color: colors.color(Some(c.constructor_id)),
        })
        .collect();

    log::info!(
        "[F1] timeline: {} races in {} rows at width {}",
        races.len(),
        rows.len(),
        width
    );

    TimelineScene {
        width,
        height: rows.len() as f64 * ROW_HEIGHT + MARGIN.top + MARGIN.bottom,
        inner_width: inner,
        rows,
        connectors,
        legend,
        message: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn races(n: usize) -> Vec<TimelineRace> {
        (0..n)
            .map(|i| TimelineRace {
                race_id: 100 + i as i64,
                season: 2021,
                round: i as i64 + 1,
                name: format!("Race {}", i + 1),
                date: String::new(),
                circuit_label: format!("City {}, Country", i + 1),
                winner_constructor_id: if i % 2 == 0 { Some(9) } else { None },
            })
            .collect()
    }

    #[test]
    fn row_sizes_balanced() {
        assert_eq!(row_sizes(23, 8), vec![8, 8, 7]);
        assert_eq!(row_sizes(8, 8), vec![8]);
        assert_eq!(row_sizes(9, 8), vec![5, 4]);
        assert_eq!(row_sizes(0, 8), vec![0]);
        assert_eq!(row_sizes(3, 0), vec![1, 1, 1]);
    }

    #[test]
    fn max_per_row_from_width() {
        assert_eq!(max_per_row(560.0), 8);
        assert_eq!(max_per_row(629.0), 8);
        assert_eq!(max_per_row(10.0), 1);
        assert_eq!(inner_width(200.0), MIN_INNER_WIDTH);
        assert_eq!(inner_width(900.0), 820.0);
    }

    #[test]
    fn twenty_three_races_wrap_into_three_rows() {
        // 640px container -> 560px inner -> 8 per row.
        let scene = layout_timeline(&races(23), &[], Some(640.0));
        let sizes: Vec<usize> = scene.rows.iter().map(|r| r.markers.len()).collect();
        assert_eq!(sizes, vec![8, 8, 7]);
        assert_eq!(scene.connectors.len(), 2);
        assert_eq!(scene.height, 3.0 * ROW_HEIGHT + 50.0);

        let ids: Vec<i64> = scene.markers().map(|m| m.race_id).collect();
        let expected: Vec<i64> = (100..123).collect();
        assert_eq!(ids, expected, "markers keep round order");
    }

    #[test]
    fn odd_rows_run_right_to_left() {
        let scene = layout_timeline(&races(16), &[], Some(640.0));
        let first = &scene.rows[0];
        let second = &scene.rows[1];
        assert!(!first.reversed && second.reversed);
        assert!(first.markers[0].x < first.markers[7].x);
        assert!(second.markers[0].x > second.markers[7].x);
        assert_eq!(second.y, ROW_HEIGHT * 1.5);
    }

    #[test]
    fn connectors_join_row_ends() {
        let scene = layout_timeline(&races(23), &[], Some(640.0));
        let c0 = &scene.connectors[0];
        assert_eq!(c0.start, (scene.rows[0].x2, scene.rows[0].y));
        assert_eq!(c0.end, (scene.rows[1].x1, scene.rows[1].y));
        assert_eq!(c0.sweep, 1);
        assert_eq!(scene.connectors[1].sweep, 0);
        // Row ends line up vertically, so the radius is half the row gap.
        assert!((c0.radius - ROW_HEIGHT / 2.0).abs() < 1e-9);
        assert!(c0.path().starts_with("M"));
        assert!(c0.path().contains(" 0 0 1 "));
    }

    #[test]
    fn single_race_is_centered() {
        let scene = layout_timeline(&races(1), &[], Some(900.0));
        let marker = scene.markers().next().unwrap();
        assert_eq!(marker.x, 410.0);
        assert!(scene.connectors.is_empty());
    }

    #[test]
    fn markers_colored_by_winner() {
        let constructors = vec![
            ConstructorInfo {
                constructor_id: 1,
                name: "Mercedes".into(),
            },
            ConstructorInfo {
                constructor_id: 9,
                name: "Red Bull".into(),
            },
        ];
        let scene = layout_timeline(&races(2), &constructors, None);
        let colors: Vec<&str> = scene.markers().map(|m| m.color).collect();
        assert_eq!(colors, vec!["#00A1FF", "#888"]);
        assert_eq!(scene.legend.len(), 2);
        assert_eq!(scene.width, DEFAULT_WIDTH);
    }

    #[test]
    fn empty_season_has_message() {
        let scene = layout_timeline(&[], &[], Some(900.0));
        assert!(scene.rows.is_empty());
        assert_eq!(scene.message.as_deref(), Some(EMPTY_SEASON_MESSAGE));
    }
}
