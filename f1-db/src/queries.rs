//! Typed query methods for retrieving season data from the database.
//!
//! All queries return typed structs from [`crate::models`] that can be
//! serialized to JSON for the CLI or handed straight to the Dioxus widgets.
//!
//! # Season convention
//!
//! Standings are cumulative: the standing of a season is the row recorded at
//! the season's last race, i.e. the race with the highest round number.
//!
//! # Joins
//!
//! Foreign keys that do not resolve become [`Joined::Unknown`]; data that is
//! missing altogether (no results loaded, no winner row, null column) becomes
//! [`Joined::Unavailable`].

use crate::models::{
    driver_full_name, driver_name_with_code, normalize_country, ConstructorInfo,
    ConstructorStandingRow, DriverStandingRow, FastestLap, GridEntry, Joined, MapRace,
    PodiumEntry, RaceDetails, RaceOption, RaceRow, TimelineRace,
};
use crate::Database;
use f1_utils::dates::format_race_date;
use rusqlite::{params, OptionalExtension};

/// Resolve a looked-up name: `Unknown` when the referenced row is missing or
/// has no usable name.
fn resolved(found: bool, name: Option<String>) -> Joined<String> {
    match name {
        Some(n) if found && !n.trim().is_empty() => Joined::Value(n),
        _ => Joined::Unknown,
    }
}

impl Database {
    // ───────────────────── Seasons ─────────────────────

    /// Get every season year present in the races table, newest first.
    pub fn query_seasons(&self) -> anyhow::Result<Vec<i32>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare("SELECT DISTINCT year FROM races ORDER BY year DESC")?;
        let rows = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<i32>, _>>()?;
        log::info!("[F1] query: query_seasons returned {} records", rows.len());
        Ok(rows)
    }

    /// Race id of the season's final round, or `None` for an unknown season.
    pub fn query_last_race_id(&self, year: i32) -> anyhow::Result<Option<i64>> {
        let conn = self.conn.borrow();
        let race_id = conn
            .query_row(
                "SELECT race_id FROM races WHERE year = ?1 ORDER BY round DESC LIMIT 1",
                params![year],
                |row| row.get(0),
            )
            .optional()?;
        Ok(race_id)
    }

    /// Whether any result rows are loaded.
    pub fn has_results(&self) -> anyhow::Result<bool> {
        let conn = self.conn.borrow();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM results", [], |row| row.get(0))?;
        Ok(count > 0)
    }

    // ───────────────────── Tables ─────────────────────

    /// Get the race results table for a season, ordered by round.
    ///
    /// The winner is the result with `position_order = 1`. Without a winner
    /// row, winner/team/laps/time are all [`Joined::Unavailable`].
    pub fn query_race_rows(&self, year: i32) -> anyhow::Result<Vec<RaceRow>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT r.race_id, r.round, r.name, r.date,
                    w.driver_id, d.driver_id IS NOT NULL, d.forename, d.surname,
                    c.constructor_id IS NOT NULL, c.name, w.laps, w.time
             FROM races r
             LEFT JOIN results w ON w.rowid = (
                 SELECT rowid FROM results
                 WHERE race_id = r.race_id AND position_order = 1
                 LIMIT 1
             )
             LEFT JOIN drivers d ON d.driver_id = w.driver_id
             LEFT JOIN constructors c ON c.constructor_id = w.constructor_id
             WHERE r.year = ?1
             ORDER BY r.round",
        )?;
        let rows = stmt
            .query_map(params![year], |row| {
                let date: Option<String> = row.get(3)?;
                let winner_id: Option<i64> = row.get(4)?;
                let (winner, team, laps, time) = match winner_id {
                    None => (
                        Joined::Unavailable,
                        Joined::Unavailable,
                        Joined::Unavailable,
                        Joined::Unavailable,
                    ),
                    Some(_) => {
                        let forename: Option<String> = row.get(6)?;
                        let surname: Option<String> = row.get(7)?;
                        let name = driver_full_name(forename.as_deref(), surname.as_deref());
                        (
                            resolved(row.get(5)?, name),
                            resolved(row.get(8)?, row.get(9)?),
                            Joined::from_option(row.get(10)?),
                            Joined::from_option(row.get(11)?),
                        )
                    }
                };
                Ok(RaceRow {
                    race_id: row.get(0)?,
                    round: row.get(1)?,
                    grand_prix: row.get(2)?,
                    date: format_race_date(date.as_deref().unwrap_or("")),
                    winner,
                    team,
                    laps,
                    time,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "[F1] query: query_race_rows({}) returned {} records",
            year,
            rows.len()
        );
        Ok(rows)
    }

    /// Get the driver championship as of the season's final round.
    ///
    /// The team comes from the driver's own result in that final race; a
    /// driver without one gets [`Joined::Unavailable`].
    pub fn query_driver_standings(&self, year: i32) -> anyhow::Result<Vec<DriverStandingRow>> {
        let Some(last_race_id) = self.query_last_race_id(year)? else {
            return Ok(Vec::new());
        };
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT s.position, s.driver_id, d.driver_id IS NOT NULL, d.forename, d.surname,
                    d.nationality, res.constructor_id, c.constructor_id IS NOT NULL, c.name,
                    s.points, s.wins
             FROM driver_standings s
             LEFT JOIN drivers d ON d.driver_id = s.driver_id
             LEFT JOIN results res ON res.rowid = (
                 SELECT rowid FROM results
                 WHERE race_id = s.race_id AND driver_id = s.driver_id
                 ORDER BY position_order
                 LIMIT 1
             )
             LEFT JOIN constructors c ON c.constructor_id = res.constructor_id
             WHERE s.race_id = ?1
             ORDER BY s.position, s.driver_id",
        )?;
        let rows = stmt
            .query_map(params![last_race_id], |row| {
                let found: bool = row.get(2)?;
                let forename: Option<String> = row.get(3)?;
                let surname: Option<String> = row.get(4)?;
                let team_id: Option<i64> = row.get(6)?;
                let team = match team_id {
                    None => Joined::Unavailable,
                    Some(_) => resolved(row.get(7)?, row.get(8)?),
                };
                Ok(DriverStandingRow {
                    position: row.get(0)?,
                    driver_id: row.get(1)?,
                    driver: resolved(
                        found,
                        driver_full_name(forename.as_deref(), surname.as_deref()),
                    ),
                    nationality: resolved(found, row.get(5)?),
                    team,
                    points: Joined::from_option(row.get(9)?),
                    wins: Joined::from_option(row.get(10)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "[F1] query: query_driver_standings({}) returned {} records",
            year,
            rows.len()
        );
        Ok(rows)
    }

    /// Get the constructor championship as of the season's final round.
    pub fn query_constructor_standings(
        &self,
        year: i32,
    ) -> anyhow::Result<Vec<ConstructorStandingRow>> {
        let Some(last_race_id) = self.query_last_race_id(year)? else {
            return Ok(Vec::new());
        };
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT s.position, s.constructor_id, c.constructor_id IS NOT NULL, c.name,
                    c.nationality, s.points, s.wins
             FROM constructor_standings s
             LEFT JOIN constructors c ON c.constructor_id = s.constructor_id
             WHERE s.race_id = ?1
             ORDER BY s.position, s.constructor_id",
        )?;
        let rows = stmt
            .query_map(params![last_race_id], |row| {
                let found: bool = row.get(2)?;
                Ok(ConstructorStandingRow {
                    position: row.get(0)?,
                    constructor_id: row.get(1)?,
                    team: resolved(found, row.get(3)?),
                    nationality: resolved(found, row.get(4)?),
                    points: Joined::from_option(row.get(5)?),
                    wins: Joined::from_option(row.get(6)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "[F1] query: query_constructor_standings({}) returned {} records",
            year,
            rows.len()
        );
        Ok(rows)
    }

    // ───────────────────── Timeline ─────────────────────

    /// Get the races of a season as drawn on the timeline, ordered by round.
    pub fn query_season_races(&self, year: i32) -> anyhow::Result<Vec<TimelineRace>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT r.race_id, r.year, r.round, r.name, r.date,
                    c.circuit_id IS NOT NULL, c.location, c.country,
                    (SELECT constructor_id FROM results
                     WHERE race_id = r.race_id AND position_order = 1
                     LIMIT 1)
             FROM races r
             LEFT JOIN circuits c ON c.circuit_id = r.circuit_id
             WHERE r.year = ?1
             ORDER BY r.round",
        )?;
        let rows = stmt
            .query_map(params![year], |row| {
                let date: Option<String> = row.get(4)?;
                let found: bool = row.get(5)?;
                let location: Option<String> = row.get(6)?;
                let country: Option<String> = row.get(7)?;
                Ok(TimelineRace {
                    race_id: row.get(0)?,
                    season: row.get(1)?,
                    round: row.get(2)?,
                    name: row.get(3)?,
                    date: format_race_date(date.as_deref().unwrap_or("")),
                    circuit_label: circuit_label(found, location, country),
                    winner_constructor_id: row.get(8)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "[F1] query: query_season_races({}) returned {} records",
            year,
            rows.len()
        );
        Ok(rows)
    }

    /// Get the constructors with results in a season, ascending by id.
    ///
    /// Constructors missing from the reference table are listed under their
    /// numeric id.
    pub fn query_constructors_in_season(&self, year: i32) -> anyhow::Result<Vec<ConstructorInfo>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT DISTINCT res.constructor_id, c.name
             FROM results res
             INNER JOIN races r ON r.race_id = res.race_id
             LEFT JOIN constructors c ON c.constructor_id = res.constructor_id
             WHERE r.year = ?1
             ORDER BY res.constructor_id",
        )?;
        let rows = stmt
            .query_map(params![year], |row| {
                let constructor_id: i64 = row.get(0)?;
                let name: Option<String> = row.get(1)?;
                Ok(ConstructorInfo {
                    constructor_id,
                    name: name.unwrap_or_else(|| constructor_id.to_string()),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "[F1] query: query_constructors_in_season({}) returned {} records",
            year,
            rows.len()
        );
        Ok(rows)
    }

    /// Get everything the race details popup shows, or `None` for an unknown
    /// race id.
    pub fn query_race_details(&self, race_id: i64) -> anyhow::Result<Option<RaceDetails>> {
        let conn = self.conn.borrow();
        let header = conn
            .query_row(
                "SELECT r.year, r.name, r.date, w.driver_id,
                        d.driver_id IS NOT NULL, d.forename, d.surname, d.driver_ref,
                        c.constructor_id IS NOT NULL, c.name
                 FROM races r
                 LEFT JOIN results w ON w.rowid = (
                     SELECT rowid FROM results
                     WHERE race_id = r.race_id AND position_order = 1
                     LIMIT 1
                 )
                 LEFT JOIN drivers d ON d.driver_id = w.driver_id
                 LEFT JOIN constructors c ON c.constructor_id = w.constructor_id
                 WHERE r.race_id = ?1",
                params![race_id],
                |row| {
                    let season: i32 = row.get(0)?;
                    let name: String = row.get(1)?;
                    let date: Option<String> = row.get(2)?;
                    let winner_id: Option<i64> = row.get(3)?;
                    let (winner, team) = match winner_id {
                        None => (Joined::Unavailable, Joined::Unavailable),
                        Some(_) => {
                            let found: bool = row.get(4)?;
                            let forename: Option<String> = row.get(5)?;
                            let surname: Option<String> = row.get(6)?;
                            let driver_ref: Option<String> = row.get(7)?;
                            let winner = if found {
                                Joined::Value(driver_name_with_code(
                                    forename.as_deref(),
                                    surname.as_deref(),
                                    driver_ref.as_deref(),
                                ))
                            } else {
                                Joined::Unknown
                            };
                            (winner, resolved(row.get(8)?, row.get(9)?))
                        }
                    };
                    Ok((season, name, date, winner, team))
                },
            )
            .optional()?;
        let Some((season, name, date, winner, team)) = header else {
            return Ok(None);
        };

        let mut fastest_lap = conn
            .query_row(
                &fastest_lap_sql("res.rank = 1 ORDER BY res.position_order"),
                params![race_id],
                read_fastest_lap,
            )
            .optional()?;
        if fastest_lap.is_none() {
            fastest_lap = conn
                .query_row(
                    &fastest_lap_sql(
                        "res.fastest_lap_time IS NOT NULL ORDER BY res.fastest_lap_time",
                    ),
                    params![race_id],
                    read_fastest_lap,
                )
                .optional()?;
        }

        let mut stmt = conn.prepare(
            "SELECT res.position_order, d.driver_id IS NOT NULL, d.forename, d.surname,
                    d.driver_ref
             FROM results res
             LEFT JOIN drivers d ON d.driver_id = res.driver_id
             WHERE res.race_id = ?1 AND res.position_order <= 3
             ORDER BY res.position_order
             LIMIT 3",
        )?;
        let podium = stmt
            .query_map(params![race_id], |row| {
                let found: bool = row.get(1)?;
                let forename: Option<String> = row.get(2)?;
                let surname: Option<String> = row.get(3)?;
                let driver_ref: Option<String> = row.get(4)?;
                let driver = if found {
                    Joined::Value(driver_name_with_code(
                        forename.as_deref(),
                        surname.as_deref(),
                        driver_ref.as_deref(),
                    ))
                } else {
                    Joined::Unknown
                };
                Ok(PodiumEntry {
                    position: row.get(0)?,
                    driver,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        log::info!(
            "[F1] query: query_race_details({}) returned podium of {}",
            race_id,
            podium.len()
        );
        Ok(Some(RaceDetails {
            race_id,
            season,
            name,
            date: format_race_date(date.as_deref().unwrap_or("")),
            winner,
            team,
            fastest_lap,
            podium,
        }))
    }

    // ───────────────────── Grid chart ─────────────────────

    /// Get starting and finishing positions for a race, ordered by grid slot.
    ///
    /// Pit-lane starters (grid 0) and rows without a grid slot are excluded.
    pub fn query_grid_entries(&self, race_id: i64) -> anyhow::Result<Vec<GridEntry>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT res.driver_id, d.forename, d.surname, c.name, res.grid, res.position
             FROM results res
             LEFT JOIN drivers d ON d.driver_id = res.driver_id
             LEFT JOIN constructors c ON c.constructor_id = res.constructor_id
             WHERE res.race_id = ?1 AND res.grid > 0
             ORDER BY res.grid, res.driver_id",
        )?;
        let rows = stmt
            .query_map(params![race_id], |row| {
                let forename: Option<String> = row.get(1)?;
                let surname: Option<String> = row.get(2)?;
                let constructor: Option<String> = row.get(3)?;
                Ok(GridEntry {
                    driver_id: row.get(0)?,
                    driver_name: resolved(
                        true,
                        driver_full_name(forename.as_deref(), surname.as_deref()),
                    )
                    .to_string(),
                    constructor_name: resolved(true, constructor).to_string(),
                    grid: row.get(4)?,
                    position: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "[F1] query: query_grid_entries({}) returned {} records",
            race_id,
            rows.len()
        );
        Ok(rows)
    }

    /// Get the races of a season that have results, ascending by race id.
    pub fn query_grid_races(&self, year: i32) -> anyhow::Result<Vec<RaceOption>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT r.race_id, r.name
             FROM races r
             WHERE r.year = ?1
               AND EXISTS (SELECT 1 FROM results res WHERE res.race_id = r.race_id)
             ORDER BY r.race_id",
        )?;
        let rows = stmt
            .query_map(params![year], |row| {
                let race_id: i64 = row.get(0)?;
                let name: String = row.get(1)?;
                let label = if name.trim().is_empty() {
                    format!("Race {}", race_id)
                } else {
                    name
                };
                Ok(RaceOption { race_id, label })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "[F1] query: query_grid_races({}) returned {} records",
            year,
            rows.len()
        );
        Ok(rows)
    }

    // ───────────────────── Map ─────────────────────

    /// Get every race whose circuit has coordinates, ordered by season then
    /// round.
    pub fn query_map_races(&self) -> anyhow::Result<Vec<MapRace>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT r.race_id, r.year, r.round, r.name, c.name, c.country, c.lat, c.lng
             FROM races r
             INNER JOIN circuits c ON c.circuit_id = r.circuit_id
             WHERE c.lat IS NOT NULL AND c.lng IS NOT NULL
             ORDER BY r.year, r.round",
        )?;
        let rows = stmt
            .query_map([], |row| {
                let country: Option<String> = row.get(5)?;
                Ok(MapRace {
                    race_id: row.get(0)?,
                    season: row.get(1)?,
                    round: row.get(2)?,
                    name: row.get(3)?,
                    circuit_name: row.get(4)?,
                    country: normalize_country(country.as_deref().unwrap_or("")),
                    lat: row.get(6)?,
                    lng: row.get(7)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "[F1] query: query_map_races returned {} records",
            rows.len()
        );
        Ok(rows)
    }
}

// ───────────────────── Helper Functions ─────────────────────

/// Fastest-lap lookup for one race; `filter` picks and orders the candidate.
fn fastest_lap_sql(filter: &str) -> String {
    format!(
        "SELECT d.driver_id IS NOT NULL, d.forename, d.surname,
                res.fastest_lap_time, res.fastest_lap, res.fastest_lap_speed
         FROM results res
         LEFT JOIN drivers d ON d.driver_id = res.driver_id
         WHERE res.race_id = ?1 AND {}
         LIMIT 1",
        filter
    )
}

fn read_fastest_lap(row: &rusqlite::Row<'_>) -> rusqlite::Result<FastestLap> {
    let forename: Option<String> = row.get(1)?;
    let surname: Option<String> = row.get(2)?;
    let speed: Option<String> = row.get(5)?;
    Ok(FastestLap {
        driver: resolved(
            row.get(0)?,
            driver_full_name(forename.as_deref(), surname.as_deref()),
        ),
        time: Joined::from_option(row.get(3)?),
        lap: Joined::from_option(row.get(4)?),
        speed: speed.map(|s| format!("{} km/h", s)),
    })
}

/// "Location, Country" for a circuit, skipping blank parts.
///
/// Returns "Unknown" when the circuit is missing or has neither part.
fn circuit_label(found: bool, location: Option<String>, country: Option<String>) -> String {
    if !found {
        return "Unknown".to_string();
    }
    let parts: Vec<String> = [location, country]
        .into_iter()
        .flatten()
        .filter(|p| !p.trim().is_empty())
        .collect();
    if parts.is_empty() {
        "Unknown".to_string()
    } else {
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    // ───────────────────── circuit_label tests ─────────────────────

    #[test]
    fn circuit_label_joins_parts() {
        assert_eq!(
            circuit_label(true, Some("Sakhir".into()), Some("Bahrain".into())),
            "Sakhir, Bahrain"
        );
        assert_eq!(circuit_label(true, None, Some("Italy".into())), "Italy");
        assert_eq!(circuit_label(true, None, None), "Unknown");
        assert_eq!(circuit_label(false, Some("x".into()), None), "Unknown");
    }

    // ───────────────────── Table Query Tests ─────────────────────

    #[test]
    fn query_seasons_newest_first() {
        let db = fixtures::database();
        assert_eq!(db.query_seasons().unwrap(), vec![2022, 2021]);
    }

    #[test]
    fn query_last_race_id_uses_max_round() {
        let db = fixtures::database();
        // Race 4 is round 2 of 2022 even though race 5 has the larger id.
        assert_eq!(db.query_last_race_id(2022).unwrap(), Some(4));
        assert_eq!(db.query_last_race_id(2021).unwrap(), Some(3));
        assert_eq!(db.query_last_race_id(1999).unwrap(), None);
    }

    #[test]
    fn query_race_rows_ordered_by_round() {
        let db = fixtures::database();
        let rows = db.query_race_rows(2022).unwrap();
        let rounds: Vec<i64> = rows.iter().map(|r| r.round).collect();
        assert_eq!(rounds, vec![1, 2]);
        assert_eq!(rows[0].race_id, 5);

        let rows = db.query_race_rows(2021).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.windows(2).all(|w| w[0].round < w[1].round));
    }

    #[test]
    fn query_race_rows_resolves_winner() {
        let db = fixtures::database();
        let rows = db.query_race_rows(2021).unwrap();
        let bahrain = &rows[0];
        assert_eq!(bahrain.grand_prix, "Bahrain Grand Prix");
        assert_eq!(bahrain.date, "28 Mar 2021");
        assert_eq!(bahrain.winner, Joined::Value("Lewis Hamilton".to_string()));
        assert_eq!(bahrain.team, Joined::Value("Mercedes".to_string()));
        assert_eq!(bahrain.laps, Joined::Value(56));
        assert_eq!(bahrain.time, Joined::Value("1:32:03.897".to_string()));
    }

    #[test]
    fn query_race_rows_without_results_is_unavailable() {
        let db = fixtures::database();
        // Race 3 has no result rows at all.
        let portugal = &db.query_race_rows(2021).unwrap()[2];
        assert_eq!(portugal.winner, Joined::Unavailable);
        assert_eq!(portugal.team, Joined::Unavailable);
        assert_eq!(portugal.laps.to_string(), "—");
        assert_eq!(portugal.time.to_string(), "—");
    }

    #[test]
    fn query_race_rows_empty_season() {
        let db = fixtures::database();
        assert!(db.query_race_rows(1999).unwrap().is_empty());
    }

    #[test]
    fn query_driver_standings_from_final_round() {
        let db = fixtures::database();
        let rows = db.query_driver_standings(2022).unwrap();
        let positions: Vec<i64> = rows.iter().map(|r| r.position).collect();
        assert_eq!(positions, vec![1, 2, 3, 4]);

        assert_eq!(rows[0].driver, Joined::Value("Charles Leclerc".to_string()));
        assert_eq!(rows[0].team, Joined::Value("Ferrari".to_string()));
        assert_eq!(rows[0].points, Joined::Value(44.0));
        assert_eq!(rows[0].nationality, Joined::Value("Monegasque".to_string()));
        assert_eq!(rows[1].team, Joined::Value("Red Bull".to_string()));
    }

    #[test]
    fn query_driver_standings_placeholders() {
        let db = fixtures::database();
        let rows = db.query_driver_standings(2022).unwrap();
        // Hamilton has a standing but no result in the final race.
        assert_eq!(rows[2].driver_id, 1);
        assert_eq!(rows[2].team, Joined::Unavailable);
        // Driver 55 is not in drivers.csv.
        assert_eq!(rows[3].driver, Joined::Unknown);
        assert_eq!(rows[3].nationality, Joined::Unknown);
    }

    #[test]
    fn query_driver_standings_without_results() {
        let db = crate::Database::from_tables(&fixtures::table_set(false)).unwrap();
        let rows = db.query_driver_standings(2021).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.team == Joined::Unavailable));
        assert!(rows.iter().all(|r| r.driver.is_value()));
    }

    #[test]
    fn query_constructor_standings_from_final_round() {
        let db = fixtures::database();
        let rows = db.query_constructor_standings(2021).unwrap();
        let teams: Vec<String> = rows.iter().map(|r| r.team.to_string()).collect();
        assert_eq!(teams, vec!["Red Bull", "Mercedes", "Ferrari"]);

        let rows = db.query_constructor_standings(2022).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].team, Joined::Unknown);
        assert_eq!(rows[2].points, Joined::Value(0.0));
    }

    #[test]
    fn standings_for_unknown_season_are_empty() {
        let db = fixtures::database();
        assert!(db.query_driver_standings(1999).unwrap().is_empty());
        assert!(db.query_constructor_standings(1999).unwrap().is_empty());
    }

    // ───────────────────── Timeline Query Tests ─────────────────────

    #[test]
    fn query_season_races_labels_circuits() {
        let db = fixtures::database();
        let races = db.query_season_races(2021).unwrap();
        assert_eq!(races.len(), 3);
        assert_eq!(races[0].circuit_label, "Sakhir, Bahrain");
        assert_eq!(races[1].circuit_label, "Imola, Italy");
        assert_eq!(races[2].circuit_label, "Unknown");
        assert_eq!(races[0].winner_constructor_id, Some(1));
        assert_eq!(races[1].winner_constructor_id, Some(9));
        assert_eq!(races[2].winner_constructor_id, None);
    }

    #[test]
    fn query_constructors_in_season_sorted_by_id() {
        let db = fixtures::database();
        let ids: Vec<i64> = db
            .query_constructors_in_season(2021)
            .unwrap()
            .iter()
            .map(|c| c.constructor_id)
            .collect();
        assert_eq!(ids, vec![1, 6, 9]);
    }

    #[test]
    fn query_race_details_full() {
        let db = fixtures::database();
        let details = db.query_race_details(1).unwrap().unwrap();
        assert_eq!(details.name, "Bahrain Grand Prix");
        assert_eq!(details.season, 2021);
        assert_eq!(details.winner, Joined::Value("Lewis Hamilton (HAM)".to_string()));
        assert_eq!(details.team, Joined::Value("Mercedes".to_string()));

        let fastest = details.fastest_lap.unwrap();
        assert_eq!(fastest.driver, Joined::Value("Max Verstappen".to_string()));
        assert_eq!(fastest.time, Joined::Value("1:33.228".to_string()));
        assert_eq!(fastest.lap, Joined::Value(41));
        assert_eq!(fastest.speed.as_deref(), Some("208.984 km/h"));

        let podium: Vec<i64> = details.podium.iter().map(|p| p.position).collect();
        assert_eq!(podium, vec![1, 2, 3]);
        assert_eq!(
            details.podium[2].driver,
            Joined::Value("Charles Leclerc (LEC)".to_string())
        );
    }

    #[test]
    fn query_race_details_podium_limited_to_three() {
        let db = fixtures::database();
        let details = db.query_race_details(2).unwrap().unwrap();
        assert_eq!(details.podium.len(), 3);
        assert_eq!(details.winner, Joined::Value("Max Verstappen (MAX)".to_string()));
    }

    #[test]
    fn query_race_details_without_fastest_lap_data() {
        let db = fixtures::database();
        let details = db.query_race_details(4).unwrap().unwrap();
        assert!(details.fastest_lap.is_none());
        assert_eq!(details.podium.len(), 2);

        let empty = db.query_race_details(3).unwrap().unwrap();
        assert_eq!(empty.winner, Joined::Unavailable);
        assert!(empty.podium.is_empty());
        assert!(db.query_race_details(999).unwrap().is_none());
    }

    // ───────────────────── Grid Query Tests ─────────────────────

    #[test]
    fn query_grid_entries_ordered_by_grid() {
        let db = fixtures::database();
        let entries = db.query_grid_entries(1).unwrap();
        let grid: Vec<i64> = entries.iter().map(|e| e.grid).collect();
        assert_eq!(grid, vec![1, 2, 4]);
        assert_eq!(entries[0].driver_name, "Max Verstappen");
        assert_eq!(entries[0].constructor_name, "Red Bull");
        assert_eq!(entries[2].position, None);
    }

    #[test]
    fn query_grid_entries_unknown_driver() {
        let db = fixtures::database();
        let entries = db.query_grid_entries(2).unwrap();
        let unknown = entries.iter().find(|e| e.driver_id == 77).unwrap();
        assert_eq!(unknown.driver_name, "Unknown");
    }

    #[test]
    fn query_grid_races_only_with_results() {
        let db = fixtures::database();
        let ids: Vec<i64> = db
            .query_grid_races(2021)
            .unwrap()
            .iter()
            .map(|r| r.race_id)
            .collect();
        assert_eq!(ids, vec![1, 2]);

        let ids: Vec<i64> = db
            .query_grid_races(2022)
            .unwrap()
            .iter()
            .map(|r| r.race_id)
            .collect();
        assert_eq!(ids, vec![4, 5]);
    }

    // ───────────────────── Map Query Tests ─────────────────────

    #[test]
    fn query_map_races_skips_missing_circuits() {
        let db = fixtures::database();
        let races = db.query_map_races().unwrap();
        // Race 3 points at circuit 99 which is not in circuits.csv.
        assert_eq!(races.len(), 4);
        assert!(races.iter().all(|r| r.race_id != 3));
        assert_eq!(races[0].country, "Bahrain");
        assert!((races[0].lat - 26.0325).abs() < 1e-9);
    }

    #[test]
    fn query_map_races_normalizes_country() {
        let db = fixtures::database();
        db.load_races("raceId,year,round,circuitId,name,date\n10,2023,10,3,British Grand Prix,2023-07-09\n")
            .unwrap();
        let races = db.query_map_races().unwrap();
        let british = races.iter().find(|r| r.race_id == 10).unwrap();
        assert_eq!(british.country, "United Kingdom");
    }

    // ───────────────────── Integration Tests ─────────────────────

    #[test]
    fn full_season_workflow() {
        let db = fixtures::database();

        let seasons = db.query_seasons().unwrap();
        let latest = seasons[0];

        let races = db.query_race_rows(latest).unwrap();
        assert!(!races.is_empty());

        let timeline = db.query_season_races(latest).unwrap();
        assert_eq!(timeline.len(), races.len());

        let grid_races = db.query_grid_races(latest).unwrap();
        let entries = db.query_grid_entries(grid_races[0].race_id).unwrap();
        assert!(!entries.is_empty());

        let json = serde_json::to_string(&races).unwrap();
        assert!(json.contains("Bahrain Grand Prix"));
    }
}
