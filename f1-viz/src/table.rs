//! Sortable results tables.
//!
//! Column definitions for the race, driver and team tables plus a stable
//! sort that keeps placeholder cells ("—", "Unknown") at the bottom in both
//! directions.

use f1_db::models::{ConstructorStandingRow, DriverStandingRow, Joined, RaceRow};
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

/// Current sort column and direction of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct SortState {
    pub column: Option<usize>,
    pub direction: Option<SortDirection>,
}

impl SortState {
    /// Header click: the same column flips direction, a new one sorts ascending.
    pub fn toggle(self, column: usize) -> Self {
        let direction = match (self.column, self.direction) {
            (Some(c), Some(SortDirection::Asc)) if c == column => SortDirection::Desc,
            _ => SortDirection::Asc,
        };
        Self {
            column: Some(column),
            direction: Some(direction),
        }
    }

    /// Arrow shown next to `column`'s header, if it is the sort column.
    pub fn indicator(&self, column: usize) -> &'static str {
        match (self.column, self.direction) {
            (Some(c), Some(d)) if c == column => d.arrow(),
            _ => "",
        }
    }
}

/// Comparable value of one table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Number(f64),
    Text(String),
    /// Missing or unresolved data; always sorts last.
    Placeholder,
}

impl SortKey {
    fn compare(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
            (SortKey::Number(_), SortKey::Text(_)) => Ordering::Less,
            (SortKey::Text(_), SortKey::Number(_)) => Ordering::Greater,
            _ => Ordering::Equal,
        }
    }
}

impl From<&Joined<String>> for SortKey {
    fn from(value: &Joined<String>) -> Self {
        match value {
            Joined::Value(v) => SortKey::Text(v.clone()),
            _ => SortKey::Placeholder,
        }
    }
}

impl From<&Joined<i64>> for SortKey {
    fn from(value: &Joined<i64>) -> Self {
        match value {
            Joined::Value(v) => SortKey::Number(*v as f64),
            _ => SortKey::Placeholder,
        }
    }
}

impl From<&Joined<f64>> for SortKey {
    fn from(value: &Joined<f64>) -> Self {
        match value {
            Joined::Value(v) => SortKey::Number(*v),
            _ => SortKey::Placeholder,
        }
    }
}

/// A row that a table can display and sort.
pub trait TableRow {
    fn columns() -> &'static [&'static str];
    /// Display text of each column, in [`TableRow::columns`] order.
    fn cells(&self) -> Vec<String>;
    fn sort_key(&self, column: usize) -> SortKey;
}

pub const RACE_COLUMNS: [&str; 6] = ["Grand Prix", "Date", "Winner", "Team", "Laps", "Time"];
pub const DRIVER_COLUMNS: [&str; 6] = ["Pos", "Driver", "Nationality", "Team", "Points", "Wins"];
pub const TEAM_COLUMNS: [&str; 5] = ["Pos", "Team", "Nationality", "Points", "Wins"];

impl TableRow for RaceRow {
    fn columns() -> &'static [&'static str] {
        &RACE_COLUMNS
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.grand_prix.clone(),
            placeholder_if_empty(&self.date),
            self.winner.to_string(),
            self.team.to_string(),
            self.laps.to_string(),
            self.time.to_string(),
        ]
    }

    fn sort_key(&self, column: usize) -> SortKey {
        match column {
            0 => SortKey::Text(self.grand_prix.clone()),
            // Display dates don't sort lexically; rounds follow the calendar.
            1 => SortKey::Number(self.round as f64),
            2 => (&self.winner).into(),
            3 => (&self.team).into(),
            4 => (&self.laps).into(),
            5 => (&self.time).into(),
            _ => SortKey::Placeholder,
        }
    }
}

impl TableRow for DriverStandingRow {
    fn columns() -> &'static [&'static str] {
        &DRIVER_COLUMNS
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.position.to_string(),
            self.driver.to_string(),
            self.nationality.to_string(),
            self.team.to_string(),
            self.points.to_string(),
            self.wins.to_string(),
        ]
    }

    fn sort_key(&self, column: usize) -> SortKey {
        match column {
            0 => SortKey::Number(self.position as f64),
            1 => (&self.driver).into(),
            2 => (&self.nationality).into(),
            3 => (&self.team).into(),
            4 => (&self.points).into(),
            5 => (&self.wins).into(),
            _ => SortKey::Placeholder,
        }
    }
}

impl TableRow for ConstructorStandingRow {
    fn columns() -> &'static [&'static str] {
        &TEAM_COLUMNS
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.position.to_string(),
            self.team.to_string(),
            self.nationality.to_string(),
            self.points.to_string(),
            self.wins.to_string(),
        ]
    }

    fn sort_key(&self, column: usize) -> SortKey {
        match column {
            0 => SortKey::Number(self.position as f64),
            1 => (&self.team).into(),
            2 => (&self.nationality).into(),
            3 => (&self.points).into(),
            4 => (&self.wins).into(),
            _ => SortKey::Placeholder,
        }
    }
}

fn placeholder_if_empty(text: &str) -> String {
    if text.is_empty() {
        f1_db::models::PLACEHOLDER_UNAVAILABLE.to_string()
    } else {
        text.to_string()
    }
}

/// Sort rows in place by `state`; rows keep their order when unsorted.
pub fn sort_rows<R: TableRow>(rows: &mut [R], state: SortState) {
    let (Some(column), Some(direction)) = (state.column, state.direction) else {
        return;
    };
    rows.sort_by(|a, b| {
        let (ka, kb) = (a.sort_key(column), b.sort_key(column));
        match (&ka, &kb) {
            (SortKey::Placeholder, SortKey::Placeholder) => Ordering::Equal,
            (SortKey::Placeholder, _) => Ordering::Greater,
            (_, SortKey::Placeholder) => Ordering::Less,
            _ => match direction {
                SortDirection::Asc => ka.compare(&kb),
                SortDirection::Desc => kb.compare(&ka),
            },
        }
    });
}

/// Fixed-width text rendering used by the CLI.
pub fn render_text_table<R: TableRow>(rows: &[R]) -> String {
    let headers = R::columns();
    let cells: Vec<Vec<String>> = rows.iter().map(|r| r.cells()).collect();
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            cells
                .iter()
                .filter_map(|row| row.get(i))
                .map(|c| c.chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let format_line = |values: Vec<String>| -> String {
        values
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:<width$}", v, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = format_line(headers.iter().map(|h| h.to_string()).collect());
    out.push('\n');
    out.push_str(&format_line(widths.iter().map(|w| "-".repeat(*w)).collect()));
    out.push('\n');
    for row in cells {
        out.push_str(&format_line(row));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn race(id: i64, gp: &str, winner: Joined<String>, laps: Joined<i64>) -> RaceRow {
        RaceRow {
            race_id: id,
            round: id,
            grand_prix: gp.into(),
            date: format!("{} Mar 2021", id),
            winner,
            team: Joined::Unavailable,
            laps,
            time: Joined::Unavailable,
        }
    }

    fn rows() -> Vec<RaceRow> {
        vec![
            race(1, "Bahrain", Joined::Value("Hamilton".into()), Joined::Value(56)),
            race(2, "Emilia Romagna", Joined::Unavailable, Joined::Unavailable),
            race(3, "Portuguese", Joined::Value("bottas".into()), Joined::Value(66)),
            race(4, "Spanish", Joined::Unknown, Joined::Value(63)),
        ]
    }

    fn ids(rows: &[RaceRow]) -> Vec<i64> {
        rows.iter().map(|r| r.race_id).collect()
    }

    #[test]
    fn toggle_flips_same_column() {
        let s = SortState::default().toggle(4);
        assert_eq!(s.direction, Some(SortDirection::Asc));
        let s = s.toggle(4);
        assert_eq!(s.direction, Some(SortDirection::Desc));
        assert_eq!(s.indicator(4), "▼");
        assert_eq!(s.indicator(0), "");
        let s = s.toggle(2);
        assert_eq!((s.column, s.direction), (Some(2), Some(SortDirection::Asc)));
    }

    #[test]
    fn placeholders_sort_last_both_ways() {
        let mut r = rows();
        sort_rows(&mut r, SortState::default().toggle(4));
        assert_eq!(ids(&r), vec![1, 4, 3, 2]);
        sort_rows(&mut r, SortState::default().toggle(4).toggle(4));
        assert_eq!(ids(&r), vec![3, 4, 1, 2]);
    }

    #[test]
    fn text_sort_ignores_case() {
        let mut r = rows();
        sort_rows(&mut r, SortState::default().toggle(2));
        // bottas < Hamilton; Unknown and — stay at the bottom in input order.
        assert_eq!(ids(&r), vec![3, 1, 2, 4]);
    }

    #[test]
    fn date_column_sorts_by_round() {
        let mut r = rows();
        r.reverse();
        sort_rows(&mut r, SortState::default().toggle(1));
        assert_eq!(ids(&r), vec![1, 2, 3, 4]);
    }

    #[test]
    fn unsorted_keeps_order() {
        let mut r = rows();
        sort_rows(&mut r, SortState::default());
        assert_eq!(ids(&r), vec![1, 2, 3, 4]);
    }

    #[test]
    fn text_table_is_aligned() {
        let out = render_text_table(&rows()[..2]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Grand Prix      Date"));
        assert!(lines[3].starts_with("Emilia Romagna  2 Mar 2021  —"));
    }
}
