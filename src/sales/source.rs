//! Dataset sources
//!
//! Two implementations share the `SalesSource` trait:
//! - `SheetSource`: a Google spreadsheet worksheet, fetched as CSV
//! - `CsvFileSource`: a local CSV file (development and tests)
//!
//! Both hand their bytes to `SalesTable::from_csv_bytes`, which validates
//! the schema and normalizes missing values.

use super::error::{DashboardError, Result};
use super::table::SalesTable;
use reqwest::Url;
use std::future::Future;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Default endpoint prefix of the spreadsheet export API
pub const SHEETS_ENDPOINT: &str = "https://docs.google.com/spreadsheets/d";

/// Identity of a source's connection parameters (the cache key)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceKey {
    Sheet {
        spreadsheet: String,
        worksheet: String,
    },
    File(PathBuf),
}

impl std::fmt::Display for SourceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKey::Sheet {
                spreadsheet,
                worksheet,
            } => write!(f, "sheet {}/{}", spreadsheet, worksheet),
            SourceKey::File(path) => write!(f, "file {}", path.display()),
        }
    }
}

/// Something the sales table can be fetched from
pub trait SalesSource: Send + Sync {
    /// Connection parameters identifying this source
    fn key(&self) -> SourceKey;

    /// Raw CSV bytes
    fn read_csv(&self) -> impl Future<Output = Result<Vec<u8>>> + Send;

    /// Fetch, validate and normalize the table
    fn fetch(&self) -> impl Future<Output = Result<SalesTable>> + Send {
        async move {
            let started = Instant::now();
            let bytes = self.read_csv().await?;
            let table = SalesTable::from_csv_bytes(bytes)?;
            tracing::info!(
                source = %self.key(),
                rows = table.height(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Loaded sales table"
            );
            Ok(table)
        }
    }
}

/// Worksheet of a remote spreadsheet
#[derive(Debug, Clone)]
pub struct SheetSource {
    spreadsheet: String,
    worksheet: String,
    timeout: Duration,
    endpoint: String,
}

impl SheetSource {
    /// `spreadsheet` may be a bare id or a full spreadsheet URL
    pub fn new(spreadsheet: String, worksheet: String, timeout: Duration) -> Self {
        SheetSource {
            spreadsheet,
            worksheet,
            timeout,
            endpoint: SHEETS_ENDPOINT.to_string(),
        }
    }

    /// Point the source at a different export endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Spreadsheet id, extracted from a `/d/<id>/...` URL when needed
    pub fn spreadsheet_id(&self) -> &str {
        let trimmed = self.spreadsheet.trim();
        match trimmed.split_once("/d/") {
            Some((_, rest)) => rest
                .split(['/', '?', '#'])
                .next()
                .unwrap_or(rest),
            None => trimmed,
        }
    }

    /// CSV export URL of the worksheet
    pub fn export_url(&self) -> Result<Url> {
        let id = self.spreadsheet_id();
        if id.is_empty() {
            return Err(DashboardError::Config(format!(
                "Cannot extract a spreadsheet id from '{}'",
                self.spreadsheet
            )));
        }

        let base = format!("{}/{}/gviz/tq", self.endpoint.trim_end_matches('/'), id);
        Url::parse_with_params(&base, &[("tqx", "out:csv"), ("sheet", self.worksheet.as_str())])
            .map_err(|e| DashboardError::Config(format!("Invalid export URL '{}': {}", base, e)))
    }
}

impl SalesSource for SheetSource {
    fn key(&self) -> SourceKey {
        SourceKey::Sheet {
            spreadsheet: self.spreadsheet_id().to_string(),
            worksheet: self.worksheet.clone(),
        }
    }

    async fn read_csv(&self) -> Result<Vec<u8>> {
        let url = self.export_url()?;
        tracing::debug!(%url, timeout_s = self.timeout.as_secs(), "Fetching worksheet");

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| DashboardError::SourceUnavailable(format!("HTTP client: {}", e)))?;

        let request = async {
            let response = client.get(url.clone()).send().await?.error_for_status()?;
            response.bytes().await
        };

        let bytes = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| {
                DashboardError::SourceUnavailable(format!(
                    "Timed out after {}s fetching {}",
                    self.timeout.as_secs(),
                    url
                ))
            })?
            .map_err(|e| {
                DashboardError::SourceUnavailable(format!("Failed to fetch {}: {}", url, e))
            })?;

        Ok(bytes.to_vec())
    }
}

/// Local CSV file
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvFileSource { path: path.into() }
    }
}

impl SalesSource for CsvFileSource {
    fn key(&self) -> SourceKey {
        SourceKey::File(self.path.clone())
    }

    async fn read_csv(&self) -> Result<Vec<u8>> {
        tokio::fs::read(&self.path).await.map_err(|e| {
            DashboardError::SourceUnavailable(format!(
                "Cannot read '{}': {}",
                self.path.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CSV: &str = "Name,Platform,Year_of_Release,Genre,Publisher,NA_Sales,EU_Sales,JP_Sales,Other_Sales,Global_Sales\n\
                       Wii Sports,Wii,2006,Sports,Nintendo,41.36,28.96,3.77,8.45,82.53\n\
                       Tetris,GB,1989,Puzzle,Nintendo,23.2,2.26,4.22,0.58,30.26\n";

    #[test]
    fn test_spreadsheet_id_from_url() {
        let source = SheetSource::new(
            "https://docs.google.com/spreadsheets/d/1AbC-xyz_09/edit#gid=0".to_string(),
            "vgsales".to_string(),
            Duration::from_secs(5),
        );
        assert_eq!(source.spreadsheet_id(), "1AbC-xyz_09");

        let bare = SheetSource::new(
            " 1AbC ".to_string(),
            "vgsales".to_string(),
            Duration::from_secs(5),
        );
        assert_eq!(bare.spreadsheet_id(), "1AbC");
        assert_eq!(source.key(), SourceKey::Sheet {
            spreadsheet: "1AbC-xyz_09".to_string(),
            worksheet: "vgsales".to_string(),
        });
    }

    #[test]
    fn test_export_url() {
        let source = SheetSource::new(
            "1AbC".to_string(),
            "Video Games".to_string(),
            Duration::from_secs(5),
        );
        let url = source.export_url().unwrap();
        assert_eq!(url.host_str(), Some("docs.google.com"));
        assert_eq!(url.path(), "/spreadsheets/d/1AbC/gviz/tq");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("sheet".to_string(), "Video Games".to_string())));
        assert!(pairs.contains(&("tqx".to_string(), "out:csv".to_string())));
    }

    #[test]
    fn test_empty_id_is_config_error() {
        let source = SheetSource::new(String::new(), "x".to_string(), Duration::from_secs(1));
        assert!(matches!(source.export_url(), Err(DashboardError::Config(_))));
    }

    #[tokio::test]
    async fn test_unreachable_sheet_is_source_unavailable() {
        let source = SheetSource::new("abc".to_string(), "x".to_string(), Duration::from_secs(2))
            .with_endpoint("http://127.0.0.1:1/spreadsheets/d");
        let result = source.fetch().await;
        assert!(matches!(result, Err(DashboardError::SourceUnavailable(_))));
    }

    #[tokio::test]
    async fn test_csv_file_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();

        let source = CsvFileSource::new(file.path());
        let table = source.fetch().await.unwrap();
        assert_eq!(table.height(), 2);
        assert_eq!(source.key(), SourceKey::File(file.path().to_path_buf()));
    }

    #[tokio::test]
    async fn test_missing_file_is_source_unavailable() {
        let source = CsvFileSource::new("/nonexistent/vgsales.csv");
        let result = source.fetch().await;
        assert!(matches!(result, Err(DashboardError::SourceUnavailable(_))));
    }
}
