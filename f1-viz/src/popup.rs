//! Floating popup placement and race details text.

use f1_db::models::{RaceDetails, PLACEHOLDER_UNAVAILABLE};

/// Minimum distance kept between a popup and the viewport edges.
pub const EDGE_PADDING: f64 = 10.0;
/// Offset of the popup from the pointer.
pub const POINTER_OFFSET: f64 = 12.0;

/// Top-left corner for a popup of `size` opened by a click at `click`.
///
/// The popup sits right of the pointer and above it, pushed back inside the
/// viewport horizontally and flipped below the pointer when it would run off
/// the top.
pub fn position_popup(click: (f64, f64), size: (f64, f64), viewport_width: f64) -> (f64, f64) {
    let (cx, cy) = click;
    let (width, height) = size;

    let max_left = viewport_width - width - EDGE_PADDING;
    let left = (cx + POINTER_OFFSET).max(EDGE_PADDING).min(max_left);

    let mut top = cy - height - POINTER_OFFSET;
    if top < EDGE_PADDING {
        top = cy + POINTER_OFFSET;
    }
    (left, top)
}

/// An open popup survives only while its race stays highlighted.
///
/// Once dropped it does not come back when the race is highlighted again.
pub fn retain_for_highlight<T>(
    open: Option<T>,
    race_id: impl Fn(&T) -> i64,
    highlighted: Option<i64>,
) -> Option<T> {
    open.filter(|p| Some(race_id(p)) == highlighted)
}

/// Text lines of the race details popup, title first.
pub fn race_details_lines(details: &RaceDetails) -> Vec<String> {
    let mut lines = vec![
        format!("{} ({})", details.name, details.season),
        format!("Date: {}", or_placeholder(&details.date)),
        format!("Winner: {}", details.winner),
        format!("Team: {}", details.team),
    ];

    let fastest = match &details.fastest_lap {
        Some(lap) => {
            let mut text = format!("{} — {}", lap.driver, lap.time);
            if let Some(n) = lap.lap.value() {
                text.push_str(&format!(" · lap {}", n));
            }
            if let Some(speed) = &lap.speed {
                text.push_str(&format!(" · {}", speed));
            }
            text
        }
        None => PLACEHOLDER_UNAVAILABLE.to_string(),
    };
    lines.push(format!("Fastest lap: {}", fastest));

    lines.push("Podium:".to_string());
    if details.podium.is_empty() {
        lines.push(PLACEHOLDER_UNAVAILABLE.to_string());
    } else {
        lines.extend(
            details
                .podium
                .iter()
                .map(|p| format!("{}. {}", p.position, p.driver)),
        );
    }
    lines
}

fn or_placeholder(text: &str) -> &str {
    if text.is_empty() {
        PLACEHOLDER_UNAVAILABLE
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use f1_db::models::{FastestLap, Joined, PodiumEntry};

    #[test]
    fn popup_right_of_and_above_pointer() {
        assert_eq!(position_popup((100.0, 300.0), (200.0, 120.0), 1200.0), (112.0, 168.0));
    }

    #[test]
    fn popup_clamped_to_right_edge() {
        let (left, _) = position_popup((1150.0, 300.0), (200.0, 120.0), 1200.0);
        assert_eq!(left, 990.0);
    }

    #[test]
    fn popup_flips_below_near_top() {
        let (_, top) = position_popup((100.0, 50.0), (200.0, 120.0), 1200.0);
        assert_eq!(top, 62.0);
    }

    #[test]
    fn popup_dropped_when_highlight_moves_and_stays_closed() {
        let open = Some((7_i64, "Monaco"));
        let kept = retain_for_highlight(open, |p| p.0, Some(7));
        assert_eq!(kept, open);

        let moved = retain_for_highlight(kept, |p| p.0, Some(8));
        assert_eq!(moved, None);
        // Reselecting the first race does not revive the popup.
        assert_eq!(retain_for_highlight(moved, |p| p.0, Some(7)), None);
        assert_eq!(retain_for_highlight(open, |p| p.0, None), None);
    }

    #[test]
    fn details_lines_with_placeholders() {
        let details = RaceDetails {
            race_id: 1,
            season: 2021,
            name: "Bahrain Grand Prix".into(),
            date: "28 Mar 2021".into(),
            winner: Joined::Unavailable,
            team: Joined::Unavailable,
            fastest_lap: None,
            podium: Vec::new(),
        };
        let lines = race_details_lines(&details);
        assert_eq!(lines[0], "Bahrain Grand Prix (2021)");
        assert_eq!(lines[2], "Winner: —");
        assert_eq!(lines[4], "Fastest lap: —");
        assert_eq!(lines.last().map(String::as_str), Some("—"));
    }

    #[test]
    fn details_lines_with_results() {
        let details = RaceDetails {
            race_id: 1,
            season: 2021,
            name: "Bahrain Grand Prix".into(),
            date: String::new(),
            winner: Joined::Value("Lewis Hamilton (HAM)".into()),
            team: Joined::Value("Mercedes".into()),
            fastest_lap: Some(FastestLap {
                driver: Joined::Value("Valtteri Bottas".into()),
                time: Joined::Value("1:32.090".into()),
                lap: Joined::Value(56),
                speed: Some("211.566 km/h".into()),
            }),
            podium: vec![
                PodiumEntry {
                    position: 1,
                    driver: Joined::Value("Lewis Hamilton".into()),
                },
                PodiumEntry {
                    position: 2,
                    driver: Joined::Unknown,
                },
            ],
        };
        let lines = race_details_lines(&details);
        assert_eq!(lines[1], "Date: —");
        assert_eq!(
            lines[4],
            "Fastest lap: Valtteri Bottas — 1:32.090 · lap 56 · 211.566 km/h"
        );
        assert_eq!(lines[6], "1. Lewis Hamilton");
        assert_eq!(lines[7], "2. Unknown");
    }
}
