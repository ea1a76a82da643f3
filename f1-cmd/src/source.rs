//! Loading the CSV exports from a local directory or over HTTP.

use anyhow::Context;
use f1_db::{Table, TableSet};
use log::{info, warn};
use std::path::PathBuf;
use std::time::Duration;

/// Attempts per file before a remote fetch gives up.
pub const MAX_ATTEMPTS: u32 = 3;
/// Delay before the first retry; doubled after each failure.
pub const INITIAL_BACKOFF: Duration = Duration::from_millis(500);

/// Where the table CSVs live.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    Dir(PathBuf),
    /// Base URL; tables are fetched as `<url>/<table>.csv`.
    Url(String),
}

impl DataSource {
    /// A base URL wins over the directory when both are given.
    pub fn new(data_dir: PathBuf, base_url: Option<String>) -> Self {
        match base_url {
            Some(url) => DataSource::Url(url.trim_end_matches('/').to_string()),
            None => DataSource::Dir(data_dir),
        }
    }

    /// Read every table concurrently.
    ///
    /// Missing results are tolerated; any other missing table is an error.
    pub async fn load_tables(&self) -> anyhow::Result<TableSet> {
        let client = match self {
            DataSource::Url(_) => Some(
                reqwest::Client::builder()
                    .timeout(Duration::from_secs(60))
                    .build()?,
            ),
            DataSource::Dir(_) => None,
        };
        let read = |table: Table| {
            let client = client.clone();
            async move { self.read_table(client.as_ref(), table).await }
        };

        let (races, circuits, drivers, constructors, results, driver_standings, constructor_standings) = tokio::try_join!(
            read(Table::Races),
            read(Table::Circuits),
            read(Table::Drivers),
            read(Table::Constructors),
            read(Table::Results),
            read(Table::DriverStandings),
            read(Table::ConstructorStandings),
        )?;

        let mut tables = TableSet::default();
        for (table, body) in [
            (Table::Races, races),
            (Table::Circuits, circuits),
            (Table::Drivers, drivers),
            (Table::Constructors, constructors),
            (Table::Results, results),
            (Table::DriverStandings, driver_standings),
            (Table::ConstructorStandings, constructor_standings),
        ] {
            match body {
                Some(text) => tables.set(table, text),
                None if table.is_required() => {
                    anyhow::bail!("{} not found in {}", table.file_name(), self)
                }
                None => warn!("[F1] cli: {} not found in {}", table.file_name(), self),
            }
        }
        info!("[F1] cli: loaded tables from {}", self);
        Ok(tables)
    }

    async fn read_table(
        &self,
        client: Option<&reqwest::Client>,
        table: Table,
    ) -> anyhow::Result<Option<String>> {
        match (self, client) {
            (DataSource::Dir(dir), _) => {
                let path = dir.join(table.file_name());
                match tokio::fs::read_to_string(&path).await {
                    Ok(text) => Ok(Some(text)),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                    Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
                }
            }
            (DataSource::Url(base), Some(client)) => {
                let url = format!("{}/{}", base, table.file_name());
                fetch_with_retry(client, &url).await
            }
            (DataSource::Url(_), None) => anyhow::bail!("no HTTP client for {}", self),
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Dir(dir) => write!(f, "{}", dir.display()),
            DataSource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Backoff before retry number `attempt` (1-based).
pub fn backoff(attempt: u32) -> Duration {
    INITIAL_BACKOFF * 2u32.pow(attempt.saturating_sub(1))
}

/// GET `url`, retrying transport errors and 5xx responses.
///
/// A 404 resolves to `None` without retrying.
async fn fetch_with_retry(client: &reqwest::Client, url: &str) -> anyhow::Result<Option<String>> {
    let mut attempt = 1;
    loop {
        let outcome = match client.get(url).send().await {
            Ok(response) if response.status() == reqwest::StatusCode::NOT_FOUND => return Ok(None),
            Ok(response) if response.status().is_success() => {
                return response
                    .text()
                    .await
                    .map(Some)
                    .with_context(|| format!("failed to read body of {}", url));
            }
            Ok(response) if response.status().is_server_error() => {
                anyhow::anyhow!("{} returned {}", url, response.status())
            }
            Ok(response) => anyhow::bail!("{} returned {}", url, response.status()),
            Err(e) => anyhow::Error::new(e).context(format!("failed to fetch {}", url)),
        };
        if attempt >= MAX_ATTEMPTS {
            return Err(outcome);
        }
        let delay = backoff(attempt);
        warn!("[F1] cli: {:#}; retrying in {:?}", outcome, delay);
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_takes_precedence() {
        let source = DataSource::new(PathBuf::from("data"), Some("https://example.org/f1/".into()));
        assert_eq!(source, DataSource::Url("https://example.org/f1".into()));
        assert_eq!(
            DataSource::new(PathBuf::from("data"), None),
            DataSource::Dir(PathBuf::from("data"))
        );
    }

    #[test]
    fn backoff_doubles() {
        assert_eq!(backoff(1), Duration::from_millis(500));
        assert_eq!(backoff(2), Duration::from_millis(1000));
        assert_eq!(backoff(3), Duration::from_millis(2000));
    }
}
