//! Races / Drivers / Teams tables for the selected season.

use super::ErrorDisplay;
use crate::state::{AppState, ModalRace, ResultsTab};
use dioxus::prelude::*;
use f1_db::Database;
use f1_sync::SelectionHub;
use f1_viz::table::{sort_rows, SortState, TableRow};

#[derive(Debug, Clone, PartialEq, Default)]
struct TableView {
    headers: Vec<String>,
    rows: Vec<ViewRow>,
}

impl TableView {
    /// Width of a row spanning the whole table.
    fn colspan(&self) -> usize {
        self.headers.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ViewRow {
    key: String,
    /// Set on race rows; clicking them opens the grid modal.
    race: Option<ModalRace>,
    cells: Vec<String>,
}

impl ViewRow {
    fn class(&self, highlighted: Option<i64>) -> &'static str {
        match (&self.race, highlighted) {
            (Some(race), Some(id)) if race.race_id == id => "highlighted",
            _ => "",
        }
    }

    fn style(&self) -> &'static str {
        if self.race.is_some() {
            "cursor: pointer;"
        } else {
            ""
        }
    }
}

fn table_view<R: TableRow>(
    mut rows: Vec<R>,
    sort: SortState,
    key: impl Fn(&R) -> String,
    race: impl Fn(&R) -> Option<ModalRace>,
) -> TableView {
    sort_rows(&mut rows, sort);
    TableView {
        headers: R::columns()
            .iter()
            .enumerate()
            .map(|(i, h)| format!("{} {}", h, sort.indicator(i)).trim_end().to_string())
            .collect(),
        rows: rows
            .iter()
            .map(|r| ViewRow {
                key: key(r),
                race: race(r),
                cells: r.cells(),
            })
            .collect(),
    }
}

fn load_view(db: &Database, season: i32, tab: ResultsTab, sort: SortState) -> anyhow::Result<TableView> {
    Ok(match tab {
        ResultsTab::Races => table_view(
            db.query_race_rows(season)?,
            sort,
            |r| r.race_id.to_string(),
            |r| {
                Some(ModalRace {
                    race_id: r.race_id,
                    season,
                    name: r.grand_prix.clone(),
                })
            },
        ),
        ResultsTab::Drivers => table_view(
            db.query_driver_standings(season)?,
            sort,
            |r| r.driver_id.to_string(),
            |_| None,
        ),
        ResultsTab::Teams => table_view(
            db.query_constructor_standings(season)?,
            sort,
            |r| r.constructor_id.to_string(),
            |_| None,
        ),
    })
}

/// Tabbed results tables. Column headers sort; race rows open the grid
/// chart modal and select the race for the other widgets.
#[component]
pub fn ResultsTables() -> Element {
    let mut state = use_context::<AppState>();
    let hub = use_context::<SelectionHub>();
    let mut sort = use_signal(SortState::default);

    let season = (state.selected_season)();
    let tab = (state.active_tab)();
    let highlighted = (state.highlighted_race)();
    let title = tab.title(season);

    let view = use_memo(move || {
        let season = (state.selected_season)()?;
        let db = state.db.read().clone()?;
        Some(load_view(&db, season, (state.active_tab)(), sort()).map_err(|e| {
            log::error!("[F1] tables: query failed: {:#}", e);
            format!("{:#}", e)
        }))
    });

    let open_race = use_callback(move |race: ModalRace| {
        hub.select_race(race.race_id, race.season);
        state.modal_race.set(Some(race));
    });

    let body = match view() {
        None => rsx! {},
        Some(Err(message)) => rsx! { ErrorDisplay { message: message } },
        Some(Ok(view)) => {
            let colspan = view.colspan();
            rsx! {
                table {
                    class: "results-table",
                    style: "width: 100%; border-collapse: collapse; font-size: 13px;",
                    thead {
                        tr {
                            for (i, header) in view.headers.into_iter().enumerate() {
                                th {
                                    key: "{i}",
                                    style: "text-align: left; cursor: pointer; padding: 6px; border-bottom: 1px solid #444;",
                                    onclick: move |_| {
                                        let next = sort().toggle(i);
                                        sort.set(next);
                                    },
                                    "{header}"
                                }
                            }
                        }
                    }
                    tbody {
                        if view.rows.is_empty() {
                            tr { td { colspan: "{colspan}", style: "padding: 12px; color: #9a9aa5;", "No data available for this season" } }
                        }
                        for (class, style, ViewRow { key, race, cells }) in view.rows.into_iter().map(|r| (r.class(highlighted), r.style(), r)) {
                            tr {
                                key: "{key}",
                                class: "{class}",
                                style: "{style}",
                                onclick: move |evt: MouseEvent| {
                                    evt.stop_propagation();
                                    if let Some(race) = race.clone() {
                                        open_race.call(race);
                                    }
                                },
                                for (i, cell) in cells.into_iter().enumerate() {
                                    td { key: "{i}", style: "padding: 6px; border-bottom: 1px solid #2a2a35;", "{cell}" }
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    rsx! {
        div {
            class: "results",
            div {
                class: "tabs",
                style: "display: flex; gap: 4px; margin-bottom: 8px;",
                for (t, label, class) in ResultsTab::ALL.map(|t| (t, t.label(), if t == tab { "tab active" } else { "tab" })) {
                    button {
                        key: "{label}",
                        class: "{class}",
                        onclick: move |evt: MouseEvent| {
                            evt.stop_propagation();
                            if t != tab {
                                sort.set(SortState::default());
                                state.active_tab.set(t);
                            }
                        },
                        "{label}"
                    }
                }
            }
            h3 { style: "margin: 4px 0 8px 0;", "{title}" }
            {body}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use f1_db::models::{ConstructorStandingRow, Joined, RaceRow};

    #[test]
    fn empty_team_table_spans_its_five_columns() {
        let view = table_view::<ConstructorStandingRow>(
            Vec::new(),
            SortState::default(),
            |r| r.constructor_id.to_string(),
            |_| None,
        );
        assert!(view.rows.is_empty());
        assert_eq!(view.colspan(), 5);
    }

    #[test]
    fn race_rows_open_the_grid_modal() {
        let row = RaceRow {
            race_id: 1052,
            round: 1,
            grand_prix: "Bahrain Grand Prix".into(),
            date: "28 Mar 2021".into(),
            winner: Joined::Value("Lewis Hamilton".into()),
            team: Joined::Value("Mercedes".into()),
            laps: Joined::Value(56),
            time: Joined::Unavailable,
        };
        let view = table_view(
            vec![row],
            SortState::default(),
            |r| r.race_id.to_string(),
            |r| {
                Some(ModalRace {
                    race_id: r.race_id,
                    season: 2021,
                    name: r.grand_prix.clone(),
                })
            },
        );
        assert_eq!(view.colspan(), 6);
        assert_eq!(view.rows[0].class(Some(1052)), "highlighted");
        assert_eq!(view.rows[0].style(), "cursor: pointer;");
    }
}
