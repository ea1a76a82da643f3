//! CSV data loading functions for populating the in-memory SQLite database.
//!
//! Every export carries a header row; columns are located by header name so
//! extra or reordered columns are harmless. `\N` marks a null field.
//!
//! # CSV Formats
//!
//! - **races**: `raceId,year,round,circuitId,name,date,...`
//! - **circuits**: `circuitId,circuitRef,name,location,country,lat,lng,...`
//! - **drivers**: `driverId,driverRef,number,code,forename,surname,dob,nationality,...`
//! - **constructors**: `constructorId,constructorRef,name,nationality,...`
//! - **results**: `resultId,raceId,driverId,constructorId,number,grid,position,positionText,positionOrder,points,laps,time,milliseconds,fastestLap,rank,fastestLapTime,fastestLapSpeed,statusId`
//! - **driver_standings**: `driverStandingsId,raceId,driverId,points,position,positionText,wins`
//! - **constructor_standings**: `constructorStandingsId,raceId,constructorId,points,position,positionText,wins`

use crate::Database;
use anyhow::Context;
use csv::StringRecord;
use f1_utils::fields::{nullable_text, parse_finite, parse_nullable};
use rusqlite::params;
use std::collections::HashMap;

/// Header name -> column index for one CSV export.
struct Columns {
    table: &'static str,
    index: HashMap<String, usize>,
}

impl Columns {
    fn from_headers(table: &'static str, headers: &StringRecord) -> Self {
        let index = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim().trim_start_matches('\u{feff}').to_string(), i))
            .collect();
        Self { table, index }
    }

    fn optional(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    fn required(&self, name: &str) -> anyhow::Result<usize> {
        self.optional(name)
            .with_context(|| format!("{}: missing column '{}'", self.table, name))
    }
}

fn field<'r>(record: &'r StringRecord, column: Option<usize>) -> &'r str {
    column.and_then(|i| record.get(i)).unwrap_or("").trim()
}

fn required_int(record: &StringRecord, column: usize, name: &str, line: u64) -> anyhow::Result<i64> {
    let raw = field(record, Some(column));
    raw.parse::<i64>()
        .with_context(|| format!("line {}: column '{}' is not an integer: {:?}", line, name, raw))
}

fn read_records(
    table: &'static str,
    csv_data: &str,
) -> anyhow::Result<(Columns, Vec<(u64, StringRecord)>)> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data.as_bytes());
    let columns = Columns::from_headers(table, rdr.headers()?);
    let mut records = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        records.push((line, record));
    }
    Ok((columns, records))
}

impl Database {
    /// Load races from CSV text.
    ///
    /// `raceId`, `year`, `round`, `circuitId` and `name` are required;
    /// `date` may be null.
    pub fn load_races(&self, csv_data: &str) -> anyhow::Result<()> {
        let (cols, records) = read_records("races", csv_data)?;
        let race_id = cols.required("raceId")?;
        let year = cols.required("year")?;
        let round = cols.required("round")?;
        let circuit_id = cols.required("circuitId")?;
        let name = cols.required("name")?;
        let date = cols.optional("date");

        let mut conn = self.conn.borrow_mut();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO races (race_id, year, round, circuit_id, name, date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for (line, r) in &records {
                stmt.execute(params![
                    required_int(r, race_id, "raceId", *line)?,
                    required_int(r, year, "year", *line)?,
                    required_int(r, round, "round", *line)?,
                    required_int(r, circuit_id, "circuitId", *line)?,
                    field(r, Some(name)),
                    nullable_text(field(r, date)),
                ])?;
            }
        }
        tx.commit()?;
        log::info!("[F1] loader: Loaded {} races", records.len());
        Ok(())
    }

    /// Load circuit reference data from CSV text.
    ///
    /// Coordinates that are null or non-finite are stored as NULL, which keeps
    /// the circuit off the map.
    pub fn load_circuits(&self, csv_data: &str) -> anyhow::Result<()> {
        let (cols, records) = read_records("circuits", csv_data)?;
        let circuit_id = cols.required("circuitId")?;
        let circuit_ref = cols.optional("circuitRef");
        let name = cols.optional("name");
        let location = cols.optional("location");
        let country = cols.optional("country");
        let lat = cols.optional("lat");
        let lng = cols.optional("lng");

        let mut conn = self.conn.borrow_mut();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO circuits
                 (circuit_id, circuit_ref, name, location, country, lat, lng)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for (line, r) in &records {
                stmt.execute(params![
                    required_int(r, circuit_id, "circuitId", *line)?,
                    nullable_text(field(r, circuit_ref)),
                    field(r, name),
                    nullable_text(field(r, location)),
                    nullable_text(field(r, country)),
                    parse_finite(field(r, lat)),
                    parse_finite(field(r, lng)),
                ])?;
            }
        }
        tx.commit()?;
        log::info!("[F1] loader: Loaded {} circuits", records.len());
        Ok(())
    }

    /// Load driver reference data from CSV text.
    pub fn load_drivers(&self, csv_data: &str) -> anyhow::Result<()> {
        let (cols, records) = read_records("drivers", csv_data)?;
        let driver_id = cols.required("driverId")?;
        let driver_ref = cols.optional("driverRef");
        let code = cols.optional("code");
        let forename = cols.optional("forename");
        let surname = cols.optional("surname");
        let nationality = cols.optional("nationality");

        let mut conn = self.conn.borrow_mut();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO drivers
                 (driver_id, driver_ref, code, forename, surname, nationality)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for (line, r) in &records {
                stmt.execute(params![
                    required_int(r, driver_id, "driverId", *line)?,
                    nullable_text(field(r, driver_ref)),
                    nullable_text(field(r, code)),
                    nullable_text(field(r, forename)),
                    nullable_text(field(r, surname)),
                    nullable_text(field(r, nationality)),
                ])?;
            }
        }
        tx.commit()?;
        log::info!("[F1] loader: Loaded {} drivers", records.len());
        Ok(())
    }

    /// Load constructor reference data from CSV text.
    pub fn load_constructors(&self, csv_data: &str) -> anyhow::Result<()> {
        let (cols, records) = read_records("constructors", csv_data)?;
        let constructor_id = cols.required("constructorId")?;
        let constructor_ref = cols.optional("constructorRef");
        let name = cols.optional("name");
        let nationality = cols.optional("nationality");

        let mut conn = self.conn.borrow_mut();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO constructors
                 (constructor_id, constructor_ref, name, nationality)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (line, r) in &records {
                stmt.execute(params![
                    required_int(r, constructor_id, "constructorId", *line)?,
                    nullable_text(field(r, constructor_ref)),
                    nullable_text(field(r, name)),
                    nullable_text(field(r, nationality)),
                ])?;
            }
        }
        tx.commit()?;
        log::info!("[F1] loader: Loaded {} constructors", records.len());
        Ok(())
    }

    /// Load race results from CSV text.
    ///
    /// `positionOrder` is the canonical finishing order. Exports without that
    /// column (or rows where it is null) fall back to `position`.
    pub fn load_results(&self, csv_data: &str) -> anyhow::Result<()> {
        let (cols, records) = read_records("results", csv_data)?;
        let race_id = cols.required("raceId")?;
        let driver_id = cols.required("driverId")?;
        let constructor_id = cols.required("constructorId")?;
        let grid = cols.optional("grid");
        let position = cols.optional("position");
        let position_text = cols.optional("positionText");
        let position_order = cols.optional("positionOrder");
        let points = cols.optional("points");
        let laps = cols.optional("laps");
        let time = cols.optional("time");
        let fastest_lap = cols.optional("fastestLap");
        let rank = cols.optional("rank");
        let fastest_lap_time = cols.optional("fastestLapTime");
        let fastest_lap_speed = cols.optional("fastestLapSpeed");

        let mut conn = self.conn.borrow_mut();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO results
                 (race_id, driver_id, constructor_id, grid, position, position_text,
                  position_order, points, laps, time, fastest_lap, rank,
                  fastest_lap_time, fastest_lap_speed)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            )?;
            for (line, r) in &records {
                let finish: Option<i64> = parse_nullable(field(r, position));
                let order: Option<i64> = parse_nullable::<i64>(field(r, position_order)).or(finish);
                stmt.execute(params![
                    required_int(r, race_id, "raceId", *line)?,
                    required_int(r, driver_id, "driverId", *line)?,
                    required_int(r, constructor_id, "constructorId", *line)?,
                    parse_nullable::<i64>(field(r, grid)),
                    finish,
                    nullable_text(field(r, position_text)),
                    order,
                    parse_finite(field(r, points)),
                    parse_nullable::<i64>(field(r, laps)),
                    nullable_text(field(r, time)),
                    parse_nullable::<i64>(field(r, fastest_lap)),
                    parse_nullable::<i64>(field(r, rank)),
                    nullable_text(field(r, fastest_lap_time)),
                    nullable_text(field(r, fastest_lap_speed)),
                ])?;
            }
        }
        tx.commit()?;
        log::info!("[F1] loader: Loaded {} results", records.len());
        Ok(())
    }

    /// Load cumulative driver standings from CSV text.
    pub fn load_driver_standings(&self, csv_data: &str) -> anyhow::Result<()> {
        self.load_standings(
            "driver_standings",
            "driverId",
            "INSERT OR REPLACE INTO driver_standings (race_id, driver_id, points, position, wins)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            csv_data,
        )
    }

    /// Load cumulative constructor standings from CSV text.
    pub fn load_constructor_standings(&self, csv_data: &str) -> anyhow::Result<()> {
        self.load_standings(
            "constructor_standings",
            "constructorId",
            "INSERT OR REPLACE INTO constructor_standings (race_id, constructor_id, points, position, wins)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            csv_data,
        )
    }

    fn load_standings(
        &self,
        table: &'static str,
        entity_column: &str,
        insert_sql: &str,
        csv_data: &str,
    ) -> anyhow::Result<()> {
        let (cols, records) = read_records(table, csv_data)?;
        let race_id = cols.required("raceId")?;
        let entity_id = cols.required(entity_column)?;
        let position = cols.required("position")?;
        let points = cols.optional("points");
        let wins = cols.optional("wins");

        let mut conn = self.conn.borrow_mut();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(insert_sql)?;
            for (line, r) in &records {
                stmt.execute(params![
                    required_int(r, race_id, "raceId", *line)?,
                    required_int(r, entity_id, entity_column, *line)?,
                    parse_finite(field(r, points)),
                    required_int(r, position, "position", *line)?,
                    parse_nullable::<i64>(field(r, wins)),
                ])?;
            }
        }
        tx.commit()?;
        log::info!("[F1] loader: Loaded {} {} rows", records.len(), table);
        Ok(())
    }

    /// Drop every loaded result row.
    pub(crate) fn clear_results(&self) -> anyhow::Result<()> {
        self.conn.borrow().execute("DELETE FROM results", [])?;
        Ok(())
    }
}
