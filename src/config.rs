//! Dashboard configuration
//!
//! All default values come from dashboard.json via `PropertyReader`; this
//! module only turns property strings into typed settings.

use crate::properties::PropertyReader;
use crate::sales::error::{DashboardError, Result};
use crate::sales::filter::YearRange;
use crate::sales::schema::Region;
use crate::sales::source::SheetSource;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Spreadsheet id or URL (None until supplied out-of-band)
    pub spreadsheet: Option<String>,

    /// Worksheet (tab) name
    pub worksheet: Option<String>,

    /// Scoped timeout around the remote fetch
    pub fetch_timeout: Duration,

    /// Platforms in "Total Sales by Platform"
    pub top_platforms: usize,

    /// Genres kept per region in "Top Genres"
    pub top_genres: usize,

    /// Publishers/genres in the top-N charts
    pub top_entities: usize,

    /// Year window of the temporal analysis
    pub temporal_window: YearRange,

    /// Region shown by the genre chart unless the user picks another
    pub genre_region: Region,

    /// Chart size in pixels
    pub chart_width: u32,
    pub chart_height: u32,

    /// Rows shown in the Data Overview table
    pub overview_rows: usize,

    /// Directory the HTML pages are written to
    pub output_dir: PathBuf,
}

impl DashboardConfig {
    pub fn from_properties(props: &PropertyReader) -> Self {
        let fetch_timeout =
            Duration::from_secs(props.get_usize_in_range("fetch.timeout.secs", 1, 600) as u64);

        let mut temporal_window = YearRange::new(
            props.get_i64("temporal.min.year"),
            props.get_i64("temporal.max.year"),
        );
        if temporal_window.min > temporal_window.max {
            tracing::warn!(
                "Temporal window {} is inverted, swapping bounds",
                temporal_window
            );
            temporal_window = YearRange::new(temporal_window.max, temporal_window.min);
        }

        // get_enum only returns values listed in dashboard.json
        let genre_region = props
            .get_enum("genre.region")
            .parse::<Region>()
            .unwrap_or_default();

        Self {
            spreadsheet: props.get_optional_string("sheet.spreadsheet"),
            worksheet: props.get_optional_string("sheet.worksheet"),
            fetch_timeout,
            top_platforms: props.get_usize_in_range("top.platforms", 1, 100),
            top_genres: props.get_usize_in_range("top.genres", 1, 50),
            top_entities: props.get_usize_in_range("top.entities", 1, 50),
            temporal_window,
            genre_region,
            chart_width: props.get_usize_in_range("chart.width", 100, 4000) as u32,
            chart_height: props.get_usize_in_range("chart.height", 100, 4000) as u32,
            overview_rows: props.get_usize_in_range("overview.rows", 1, 100_000),
            output_dir: PathBuf::from(props.get_string("output.dir")),
        }
    }

    /// Remote source built from the connection pair
    pub fn sheet_source(&self) -> Result<SheetSource> {
        match (&self.spreadsheet, &self.worksheet) {
            (Some(spreadsheet), Some(worksheet)) => Ok(SheetSource::new(
                spreadsheet.clone(),
                worksheet.clone(),
                self.fetch_timeout,
            )),
            _ => Err(DashboardError::Config(
                "sheet.spreadsheet and sheet.worksheet must be set \
                 (--spreadsheet/--worksheet, VGSALES_SPREADSHEET/VGSALES_WORKSHEET or --config)"
                    .to_string(),
            )),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self::from_properties(&PropertyReader::new())
    }
}
