//! In-memory SQLite data join layer for historical F1 season data.
//!
//! Loads the CSV exports (races, circuits, drivers, constructors, results,
//! driver and constructor standings) into an in-memory SQLite database and
//! exposes typed query methods consumed by the Dioxus widgets and the CLI.
//!
//! # Architecture
//!
//! - `Rc<RefCell<Connection>>` wrapper for interior mutability in single-threaded WASM
//! - In-memory SQLite via `rusqlite`
//! - CSV text is fetched by the caller (browser fetch, tokio fs, reqwest) and
//!   handed over as a [`TableSet`]
//! - Typed query methods returning serializable structs from [`models`]
//!
//! # Usage
//!
//! ```rust
//! use f1_db::Database;
//!
//! let db = Database::new().unwrap();
//! db.load_races("raceId,year,round,circuitId,name,date\n1,2021,1,1,Bahrain Grand Prix,2021-03-28\n").unwrap();
//!
//! let rows = db.query_race_rows(2021).unwrap();
//! assert_eq!(rows.len(), 1);
//! assert_eq!(rows[0].date, "28 Mar 2021");
//! ```
//!
//! # Optional results
//!
//! `results.csv` is the only optional table. Without it, winner, team, laps
//! and time resolve to [`models::Joined::Unavailable`] instead of failing.

pub mod schema;
mod loader;
mod queries;
pub mod models;

use anyhow::Context;
use rusqlite::Connection;
use std::cell::RefCell;
use std::rc::Rc;

/// The CSV exports the dashboard consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Races,
    Circuits,
    Drivers,
    Constructors,
    Results,
    DriverStandings,
    ConstructorStandings,
}

impl Table {
    pub const ALL: [Table; 7] = [
        Table::Races,
        Table::Circuits,
        Table::Drivers,
        Table::Constructors,
        Table::Results,
        Table::DriverStandings,
        Table::ConstructorStandings,
    ];

    /// File name of the table's CSV export.
    pub fn file_name(&self) -> &'static str {
        match self {
            Table::Races => "races.csv",
            Table::Circuits => "circuits.csv",
            Table::Drivers => "drivers.csv",
            Table::Constructors => "constructors.csv",
            Table::Results => "results.csv",
            Table::DriverStandings => "driver_standings.csv",
            Table::ConstructorStandings => "constructor_standings.csv",
        }
    }

    /// Every table except results must load for the dashboard to start.
    pub fn is_required(&self) -> bool {
        !matches!(self, Table::Results)
    }
}

/// Raw CSV text for every table, as fetched by the caller.
#[derive(Debug, Clone, Default)]
pub struct TableSet {
    pub races: String,
    pub circuits: String,
    pub drivers: String,
    pub constructors: String,
    pub driver_standings: String,
    pub constructor_standings: String,
    /// `None` when results.csv could not be fetched.
    pub results: Option<String>,
}

impl TableSet {
    /// Store the CSV text of one table.
    pub fn set(&mut self, table: Table, csv_data: String) {
        match table {
            Table::Races => self.races = csv_data,
            Table::Circuits => self.circuits = csv_data,
            Table::Drivers => self.drivers = csv_data,
            Table::Constructors => self.constructors = csv_data,
            Table::Results => self.results = Some(csv_data),
            Table::DriverStandings => self.driver_standings = csv_data,
            Table::ConstructorStandings => self.constructor_standings = csv_data,
        }
    }
}

/// In-memory SQLite database holding one copy of the season data.
///
/// Cheaply cloneable (via `Rc`) and suitable for sharing across Dioxus
/// components in a single-threaded WASM environment.
#[derive(Clone)]
pub struct Database {
    conn: Rc<RefCell<Connection>>,
}

impl Database {
    /// Create a new in-memory database with the full schema applied.
    ///
    /// The database is empty after creation; use [`Database::from_tables`]
    /// or the `load_*` methods to populate it.
    pub fn new() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(schema::create_schema())?;
        Ok(Self {
            conn: Rc::new(RefCell::new(conn)),
        })
    }

    /// Build a database from a full [`TableSet`].
    ///
    /// Any required table failing to load fails the whole initialization.
    /// A results table that fails to parse is logged and dropped.
    pub fn from_tables(tables: &TableSet) -> anyhow::Result<Self> {
        let db = Self::new()?;
        db.load_circuits(&tables.circuits)
            .context("failed to load circuits.csv")?;
        db.load_drivers(&tables.drivers)
            .context("failed to load drivers.csv")?;
        db.load_constructors(&tables.constructors)
            .context("failed to load constructors.csv")?;
        db.load_races(&tables.races)
            .context("failed to load races.csv")?;
        db.load_driver_standings(&tables.driver_standings)
            .context("failed to load driver_standings.csv")?;
        db.load_constructor_standings(&tables.constructor_standings)
            .context("failed to load constructor_standings.csv")?;

        match &tables.results {
            Some(csv_data) => {
                if let Err(e) = db.load_results(csv_data) {
                    log::warn!(
                        "[F1] loader: results.csv unusable, winner/team/laps/time will show as placeholders: {:#}",
                        e
                    );
                    db.clear_results()?;
                }
            }
            None => log::warn!(
                "[F1] loader: results.csv not available, winner/team/laps/time will show as placeholders"
            ),
        }
        Ok(db)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_creates_successfully() {
        let db = Database::new();
        assert!(db.is_ok(), "Database should create without errors");
    }

    #[test]
    fn database_is_cloneable() {
        let db = Database::new().unwrap();
        let db2 = db.clone();
        db.load_races(fixtures::RACES).unwrap();
        let seasons = db2.query_seasons().unwrap();
        assert_eq!(seasons, vec![2022, 2021], "Clone should see same data via shared Rc");
    }

    #[test]
    fn from_tables_loads_everything() {
        let db = fixtures::database();
        assert!(db.has_results().unwrap());
        assert_eq!(db.query_seasons().unwrap(), vec![2022, 2021]);
    }

    #[test]
    fn from_tables_tolerates_missing_results() {
        let db = Database::from_tables(&fixtures::table_set(false)).unwrap();
        assert!(!db.has_results().unwrap());
        assert_eq!(db.query_race_rows(2021).unwrap().len(), 3);
    }

    #[test]
    fn from_tables_tolerates_broken_results() {
        let mut tables = fixtures::table_set(false);
        tables.results = Some("raceId,driverId\nnot-a-number,1\n".to_string());
        let db = Database::from_tables(&tables).unwrap();
        assert!(!db.has_results().unwrap());
    }

    #[test]
    fn from_tables_fails_on_broken_required_table() {
        let mut tables = fixtures::table_set(true);
        tables.races = "raceId,year\n1,2021\n".to_string();
        let err = Database::from_tables(&tables).err().expect("races without round must fail");
        assert!(format!("{:#}", err).contains("races.csv"));
    }

    #[test]
    fn table_set_routes_tables() {
        let mut tables = TableSet::default();
        for table in Table::ALL {
            tables.set(table, table.file_name().to_string());
        }
        assert_eq!(tables.races, "races.csv");
        assert_eq!(tables.results.as_deref(), Some("results.csv"));
        assert!(Table::ALL.iter().filter(|t| !t.is_required()).eq([Table::Results].iter()));
    }
}
