//! Read-only season queries rendered as text tables, JSON or SVG.

use f1_db::models::RaceDetails;
use f1_db::Database;
use f1_viz::grid_chart::build_grid_chart;
use f1_viz::legend::ApproxMeasure;
use f1_viz::popup::race_details_lines;
use f1_viz::svg::{grid_chart_svg, timeline_svg};
use f1_viz::table::{render_text_table, TableRow};
use f1_viz::timeline::layout_timeline;
use log::info;
use serde::Serialize;
use std::path::Path;

/// Output format for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

impl Format {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            Format::Json
        } else {
            Format::Text
        }
    }
}

fn render_rows<R: TableRow + Serialize>(rows: &[R], format: Format) -> anyhow::Result<String> {
    match format {
        Format::Text => Ok(render_text_table(rows)),
        Format::Json => Ok(serde_json::to_string_pretty(rows)?),
    }
}

/// All seasons, newest first.
pub fn seasons(db: &Database, format: Format) -> anyhow::Result<String> {
    let seasons = db.query_seasons()?;
    match format {
        Format::Text => Ok(seasons
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join("\n")),
        Format::Json => Ok(serde_json::to_string_pretty(&seasons)?),
    }
}

pub fn races(db: &Database, season: i32, format: Format) -> anyhow::Result<String> {
    render_rows(&db.query_race_rows(season)?, format)
}

pub fn drivers(db: &Database, season: i32, format: Format) -> anyhow::Result<String> {
    render_rows(&db.query_driver_standings(season)?, format)
}

pub fn constructors(db: &Database, season: i32, format: Format) -> anyhow::Result<String> {
    render_rows(&db.query_constructor_standings(season)?, format)
}

/// Popup-style summary of one race.
pub fn race(db: &Database, race_id: i64, format: Format) -> anyhow::Result<String> {
    let details: RaceDetails = db
        .query_race_details(race_id)?
        .ok_or_else(|| anyhow::anyhow!("race {} not found", race_id))?;
    match format {
        Format::Text => Ok(race_details_lines(&details).join("\n")),
        Format::Json => Ok(serde_json::to_string_pretty(&details)?),
    }
}

/// Grid entries of one race, optionally exported as an SVG chart.
pub async fn grid(
    db: &Database,
    race_id: i64,
    svg: Option<&Path>,
    format: Format,
) -> anyhow::Result<String> {
    let entries = db.query_grid_entries(race_id)?;
    if let Some(path) = svg {
        let title = match db.query_race_details(race_id)? {
            Some(details) => format!("{} {} — Starting vs Finishing Grid", details.season, details.name),
            None => format!("Race {}", race_id),
        };
        let scene = build_grid_chart(&entries, None, &ApproxMeasure::default());
        write_svg(path, grid_chart_svg(&scene, &title)?).await?;
    }
    match format {
        Format::Json => Ok(serde_json::to_string_pretty(&entries)?),
        Format::Text => Ok(entries
            .iter()
            .map(|e| {
                let finish = e.position.map_or("DNF".to_string(), |p| p.to_string());
                format!("{:>3} -> {:<4} {} ({})", e.grid, finish, e.driver_name, e.constructor_name)
            })
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

/// Season timeline layout, optionally exported as SVG.
pub async fn timeline(
    db: &Database,
    season: i32,
    width: Option<f64>,
    svg: Option<&Path>,
    format: Format,
) -> anyhow::Result<String> {
    let races = db.query_season_races(season)?;
    let constructors = db.query_constructors_in_season(season)?;
    let scene = layout_timeline(&races, &constructors, width);
    if let Some(path) = svg {
        write_svg(path, timeline_svg(&scene)?).await?;
    }
    match format {
        Format::Json => Ok(serde_json::to_string_pretty(&scene)?),
        Format::Text => Ok(scene
            .markers()
            .map(|m| format!("{:>2}  {:<32} {}", m.round, m.name, m.color))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

async fn write_svg(path: &Path, svg: String) -> anyhow::Result<()> {
    use anyhow::Context;
    tokio::fs::write(path, svg)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("[F1] cli: wrote {}", path.display());
    Ok(())
}
