//! SQL schema definitions for the in-memory SQLite database.
//!
//! One table per CSV export. The schema is applied as a single batch when the
//! database is initialized.

/// Returns the full SQL schema as a single batch string.
///
/// **Reference tables:** `circuits`, `drivers`, `constructors`
///
/// **Season tables:** `races`, `results`, `driver_standings`,
/// `constructor_standings`
///
/// Foreign keys are deliberately not declared: rows that reference unknown
/// ids are kept and resolved as "Unknown" at query time.
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS circuits (
        circuit_id INTEGER PRIMARY KEY,
        circuit_ref TEXT,
        name TEXT NOT NULL,
        location TEXT,
        country TEXT,
        lat REAL,
        lng REAL
    );

    CREATE TABLE IF NOT EXISTS drivers (
        driver_id INTEGER PRIMARY KEY,
        driver_ref TEXT,
        code TEXT,
        forename TEXT,
        surname TEXT,
        nationality TEXT
    );

    CREATE TABLE IF NOT EXISTS constructors (
        constructor_id INTEGER PRIMARY KEY,
        constructor_ref TEXT,
        name TEXT,
        nationality TEXT
    );

    CREATE TABLE IF NOT EXISTS races (
        race_id INTEGER PRIMARY KEY,
        year INTEGER NOT NULL,
        round INTEGER NOT NULL,
        circuit_id INTEGER NOT NULL,
        name TEXT NOT NULL,
        date TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_races_year ON races(year, round);

    CREATE TABLE IF NOT EXISTS results (
        race_id INTEGER NOT NULL,
        driver_id INTEGER NOT NULL,
        constructor_id INTEGER NOT NULL,
        grid INTEGER,
        position INTEGER,
        position_text TEXT,
        position_order INTEGER,
        points REAL,
        laps INTEGER,
        time TEXT,
        fastest_lap INTEGER,
        rank INTEGER,
        fastest_lap_time TEXT,
        fastest_lap_speed TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_results_race ON results(race_id, position_order);

    CREATE TABLE IF NOT EXISTS driver_standings (
        race_id INTEGER NOT NULL,
        driver_id INTEGER NOT NULL,
        points REAL,
        position INTEGER NOT NULL,
        wins INTEGER,
        PRIMARY KEY (race_id, driver_id)
    );

    CREATE TABLE IF NOT EXISTS constructor_standings (
        race_id INTEGER NOT NULL,
        constructor_id INTEGER NOT NULL,
        points REAL,
        position INTEGER NOT NULL,
        wins INTEGER,
        PRIMARY KEY (race_id, constructor_id)
    );
    "#
}
