//! Command-line handling shared by the `dashboard` and `dev` binaries

use crate::pipeline::SelectionOverrides;
use crate::properties::{registry, PropertyReader};
use crate::sales::error::{DashboardError, Result};
use crate::sales::filter::YearRange;
use crate::sales::schema::Region;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Usage: dashboard [--spreadsheet ID|URL] [--worksheet NAME] [--config FILE] [--out DIR]
                 [--publisher NAME] [--genres A,B] [--years MIN-MAX] [--region NA|EU|JP|Other]
       dev --csv PATH [same options]";

/// Parsed command-line flags
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliArgs {
    /// `--help` / `-h` was given
    pub help: bool,
    pub spreadsheet: Option<String>,
    pub worksheet: Option<String>,
    /// Local CSV file (dev binary)
    pub csv: Option<PathBuf>,
    /// JSON property file
    pub config: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub publisher: Option<String>,
    pub genres: Option<Vec<String>>,
    pub years: Option<YearRange>,
    pub region: Option<Region>,
}

impl CliArgs {
    /// Parse `std::env::args()`-style arguments (program name first)
    pub fn parse(args: &[String]) -> Result<Self> {
        let mut cli = CliArgs::default();
        let mut i = 1;
        while i < args.len() {
            let flag = args[i].as_str();
            if flag == "--help" || flag == "-h" {
                cli.help = true;
                i += 1;
                continue;
            }
            let Some(value) = args.get(i + 1).filter(|_| flag.starts_with("--")) else {
                tracing::warn!(argument = flag, "Ignoring argument");
                i += 1;
                continue;
            };

            match flag {
                "--spreadsheet" => cli.spreadsheet = Some(value.clone()),
                "--worksheet" => cli.worksheet = Some(value.clone()),
                "--csv" => cli.csv = Some(PathBuf::from(value)),
                "--config" => cli.config = Some(PathBuf::from(value)),
                "--out" => cli.out = Some(PathBuf::from(value)),
                "--publisher" => cli.publisher = Some(value.clone()),
                "--genres" => cli.genres = Some(split_list(value)),
                "--years" => cli.years = Some(value.parse().map_err(DashboardError::Config)?),
                "--region" => cli.region = Some(value.parse().map_err(DashboardError::Config)?),
                _ => {
                    tracing::warn!(argument = flag, "Ignoring unknown flag");
                    i += 1;
                    continue;
                }
            }
            i += 2;
        }
        Ok(cli)
    }

    /// Properties from `--config`, then `VGSALES_*` variables, then flags
    pub fn properties(&self) -> Result<PropertyReader> {
        let mut props = match &self.config {
            Some(path) => PropertyReader::from_json_file(path)?,
            None => PropertyReader::new(),
        }
        .with_env();

        if let Some(spreadsheet) = &self.spreadsheet {
            props.set("sheet.spreadsheet", spreadsheet.as_str());
        }
        if let Some(worksheet) = &self.worksheet {
            props.set("sheet.worksheet", worksheet.as_str());
        }
        if let Some(out) = &self.out {
            props.set("output.dir", out.to_string_lossy());
        }
        Ok(props)
    }

    /// Widget values given on the command line
    pub fn selection(&self) -> SelectionOverrides {
        SelectionOverrides {
            publisher: self.publisher.clone(),
            genres: self.genres.clone(),
            years: self.years,
            region: self.region,
        }
    }

    pub fn csv_path(&self) -> Option<&Path> {
        self.csv.as_deref()
    }
}

/// Usage plus every property of dashboard.json with its default
pub fn help_text() -> String {
    let mut text = format!("{USAGE}\n\nProperties (keys of the --config JSON object):\n");
    for def in registry().properties() {
        text.push_str(&def.help_line());
        text.push('\n');
    }
    text.push_str("\nVGSALES_SPREADSHEET and VGSALES_WORKSHEET set the connection pair.\n");
    text
}

/// Comma-separated list; `--genres ""` selects no genre at all
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Install the fmt subscriber (`RUST_LOG`, default `info`)
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        std::iter::once("dashboard")
            .chain(values.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_parse_flags() {
        let cli = CliArgs::parse(&args(&[
            "--spreadsheet",
            "abc",
            "--worksheet",
            "vgsales",
            "--genres",
            "Sports, Racing",
            "--years",
            "2000-2010",
            "--region",
            "eu",
            "--out",
            "site",
        ]))
        .unwrap();

        assert_eq!(cli.spreadsheet.as_deref(), Some("abc"));
        assert_eq!(
            cli.genres,
            Some(vec!["Sports".to_string(), "Racing".to_string()])
        );
        assert_eq!(cli.years, Some(YearRange::new(2000, 2010)));
        assert_eq!(cli.region, Some(Region::Europe));
        assert_eq!(cli.out, Some(PathBuf::from("site")));
    }

    #[test]
    fn test_empty_genre_list() {
        let cli = CliArgs::parse(&args(&["--genres", ""])).unwrap();
        assert_eq!(cli.genres, Some(Vec::new()));
    }

    #[test]
    fn test_unknown_and_dangling_flags_are_skipped() {
        let cli = CliArgs::parse(&args(&["--verbose", "--csv", "data.csv", "--publisher"])).unwrap();
        assert_eq!(cli.csv_path(), Some(Path::new("data.csv")));
        assert_eq!(cli.publisher, None);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(CliArgs::parse(&args(&["--region", "Mars"])).is_err());
        assert!(CliArgs::parse(&args(&["--years", "2010-2000"])).is_err());
    }

    #[test]
    fn test_help_flag() {
        let cli = CliArgs::parse(&args(&["--out", "site", "-h"])).unwrap();
        assert!(cli.help);
        assert_eq!(cli.out, Some(PathBuf::from("site")));

        let text = help_text();
        assert!(text.starts_with("Usage: dashboard"));
        assert!(text.contains("fetch.timeout.secs"));
        assert!(text.contains("Timeout for the remote fetch, in seconds"));
    }

    #[test]
    fn test_flags_override_properties() {
        let cli = CliArgs::parse(&args(&["--worksheet", "tab2", "--out", "site"])).unwrap();
        let props = cli.properties().unwrap();
        assert_eq!(props.get_string("sheet.worksheet"), "tab2");
        assert_eq!(props.get_string("output.dir"), "site");
    }
}
