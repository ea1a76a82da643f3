//! Command implementations for the F1 season CLI.
//!
//! Loads the CSV exports from a directory or a base URL into an in-memory
//! [`Database`] and prints season tables, race details, grids and timelines.

use clap::{Args, Subcommand};
use f1_db::Database;
use std::path::PathBuf;

pub mod query;
pub mod source;

pub use query::Format;
pub use source::DataSource;

/// Where to read the tables from.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Directory holding the table CSVs
    #[arg(long, default_value = "data", global = true)]
    pub data_dir: PathBuf,

    /// Base URL to fetch the table CSVs from (overrides --data-dir)
    #[arg(long, global = true)]
    pub base_url: Option<String>,
}

impl SourceArgs {
    pub fn source(&self) -> DataSource {
        DataSource::new(self.data_dir.clone(), self.base_url.clone())
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List seasons, newest first
    Seasons,

    /// Race results of a season
    Races {
        #[arg(short, long)]
        season: i32,
    },

    /// Driver standings after a season's last race
    Drivers {
        #[arg(short, long)]
        season: i32,
    },

    /// Constructor standings after a season's last race
    Constructors {
        #[arg(short, long)]
        season: i32,
    },

    /// Winner, fastest lap and podium of one race
    Race {
        #[arg(short, long)]
        race_id: i64,
    },

    /// Starting vs finishing grid of one race
    Grid {
        #[arg(short, long)]
        race_id: i64,

        /// Also write the slope chart to this SVG file
        #[arg(long)]
        svg: Option<PathBuf>,
    },

    /// Season timeline colored by winning constructor
    Timeline {
        #[arg(short, long)]
        season: i32,

        /// Container width used for the layout
        #[arg(short, long)]
        width: Option<f64>,

        /// Also write the timeline to this SVG file
        #[arg(long)]
        svg: Option<PathBuf>,
    },
}

/// Load the tables from `source` and build the database.
pub async fn open_database(source: &DataSource) -> anyhow::Result<Database> {
    let tables = source.load_tables().await?;
    Database::from_tables(&tables)
}

/// Run one command against an open database and return its output.
pub async fn execute(db: &Database, command: &Command, format: Format) -> anyhow::Result<String> {
    match command {
        Command::Seasons => query::seasons(db, format),
        Command::Races { season } => query::races(db, *season, format),
        Command::Drivers { season } => query::drivers(db, *season, format),
        Command::Constructors { season } => query::constructors(db, *season, format),
        Command::Race { race_id } => query::race(db, *race_id, format),
        Command::Grid { race_id, svg } => query::grid(db, *race_id, svg.as_deref(), format).await,
        Command::Timeline { season, width, svg } => {
            query::timeline(db, *season, *width, svg.as_deref(), format).await
        }
    }
}

pub async fn run(source: SourceArgs, command: Command, json: bool) -> anyhow::Result<()> {
    let db = open_database(&source.source()).await?;
    let output = execute(&db, &command, Format::from_json_flag(json)).await?;
    println!("{}", output);
    Ok(())
}
