//! Analysis pipeline shared by the `dashboard` and `dev` entry points
//!
//! The pipeline:
//! 1. Resolves the user's widget choices against the loaded table
//! 2. Applies the filter and runs every aggregation
//! 3. Turns each aggregate into a chart, grouped by analysis tab
//!
//! Only "Sum of Sales by Region" follows the filter; every other chart is
//! computed over the full table.

use crate::charts::{records, render, ChartKind, ChartSpec, EncodingSpec, Field, SortOrder};
use crate::config::DashboardConfig;
use crate::sales::aggregate::{
    self, KeyedTotals, TrendMeasure, YearlyTrend, COUNT, REGION, SALES,
};
use crate::sales::correlation::{self, CorrelationMatrix};
use crate::sales::error::Result;
use crate::sales::filter::{SalesFilter, YearRange};
use crate::sales::schema::{CategoryColumn, Region, SalesColumn, CORRELATION_COLUMNS};
use crate::sales::table::SalesTable;
use std::time::Instant;

/// Sub-tabs of the Analysis page, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisTab {
    Sales,
    Temporal,
    GenrePublisher,
    Correlation,
}

impl AnalysisTab {
    pub const ALL: [AnalysisTab; 4] = [
        AnalysisTab::Sales,
        AnalysisTab::Temporal,
        AnalysisTab::GenrePublisher,
        AnalysisTab::Correlation,
    ];

    pub fn title(self) -> &'static str {
        match self {
            AnalysisTab::Sales => "Sales Analysis",
            AnalysisTab::Temporal => "Temporal Analysis",
            AnalysisTab::GenrePublisher => "Genre and Publisher Analysis",
            AnalysisTab::Correlation => "Correlation and Regression Analysis",
        }
    }

    /// HTML anchor of the tab section
    pub fn anchor(self) -> &'static str {
        match self {
            AnalysisTab::Sales => "sales",
            AnalysisTab::Temporal => "temporal",
            AnalysisTab::GenrePublisher => "genre-publisher",
            AnalysisTab::Correlation => "correlation",
        }
    }
}

/// Widget state driving the Analysis page
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSelection {
    pub filter: SalesFilter,
    /// Region of the "Top Genres" chart
    pub region: Region,
}

impl AnalysisSelection {
    /// Widget defaults for `table`
    pub fn defaults(table: &SalesTable, config: &DashboardConfig) -> Result<Self> {
        SelectionOverrides::default().resolve(table, config)
    }
}

/// Widget values supplied by the user; unset fields take the defaults
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionOverrides {
    pub publisher: Option<String>,
    pub genres: Option<Vec<String>>,
    pub years: Option<YearRange>,
    pub region: Option<Region>,
}

impl SelectionOverrides {
    pub fn resolve(&self, table: &SalesTable, config: &DashboardConfig) -> Result<AnalysisSelection> {
        let mut filter = SalesFilter::defaults(table)?;
        if let Some(publisher) = &self.publisher {
            filter.publisher = publisher.clone();
        }
        if let Some(genres) = &self.genres {
            filter.genres = genres.clone();
        }
        if let Some(years) = self.years {
            filter.years = years;
        }

        Ok(AnalysisSelection {
            filter,
            region: self.region.unwrap_or(config.genre_region),
        })
    }
}

/// Every chart of the Analysis page
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub selection: AnalysisSelection,
    /// Rows left after the filter
    pub filtered_rows: usize,
    pub correlation: CorrelationMatrix,
    tabs: Vec<(AnalysisTab, Vec<ChartSpec>)>,
}

impl AnalysisReport {
    /// Charts of one tab, in display order
    pub fn charts(&self, tab: AnalysisTab) -> &[ChartSpec] {
        self.tabs
            .iter()
            .find(|(t, _)| *t == tab)
            .map(|(_, charts)| charts.as_slice())
            .unwrap_or(&[])
    }

    pub fn chart_count(&self) -> usize {
        self.tabs.iter().map(|(_, charts)| charts.len()).sum()
    }
}

/// Run the filter and aggregations and build every chart
pub fn build_analysis(
    table: &SalesTable,
    selection: AnalysisSelection,
    config: &DashboardConfig,
) -> Result<AnalysisReport> {
    let started = Instant::now();
    let filtered = selection.filter.apply(table)?;

    let matrix = correlation::compute(table, &CORRELATION_COLUMNS)?;

    let charts = ChartFactory { config };
    let tabs = vec![
        (
            AnalysisTab::Sales,
            vec![
                charts.regional_sum(&filtered)?,
                charts.top_platforms(table)?,
                charts.global_sales_over_years(table)?,
            ],
        ),
        (
            AnalysisTab::Temporal,
            vec![charts.yearly_sales(table)?, charts.release_counts(table)?],
        ),
        (
            AnalysisTab::GenrePublisher,
            vec![
                charts.top_genres(table, selection.region)?,
                charts.top_publishers(table)?,
                charts.genre_popularity(table)?,
                charts.developer_performance(table)?,
            ],
        ),
        (
            AnalysisTab::Correlation,
            vec![charts.correlation_heatmap(&matrix)?],
        ),
    ];

    let report = AnalysisReport {
        filtered_rows: filtered.height(),
        selection,
        correlation: matrix,
        tabs,
    };

    tracing::info!(
        rows = table.height(),
        filtered_rows = report.filtered_rows,
        charts = report.chart_count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Built analysis"
    );

    Ok(report)
}

/// Builds each chart with the configured sizes and top-k limits
struct ChartFactory<'a> {
    config: &'a DashboardConfig,
}

impl ChartFactory<'_> {
    fn sized(&self, encoding: EncodingSpec) -> EncodingSpec {
        encoding.size(self.config.chart_width, self.config.chart_height)
    }

    fn regional_sum(&self, filtered: &SalesTable) -> Result<ChartSpec> {
        let data = records(&aggregate::regional_sum(filtered)?)?;
        let encoding = EncodingSpec::new(
            "Sum of Sales by Region",
            Field::nominal(REGION).sorted(SortOrder::by_desc(SALES)),
            Field::quantitative(SALES),
        )
        .mark_color("cyan");
        Ok(render(data, ChartKind::Bar, self.sized(encoding)))
    }

    fn top_platforms(&self, table: &SalesTable) -> Result<ChartSpec> {
        let totals = aggregate::top_platforms(table, self.config.top_platforms)?;
        Ok(self.keyed_bar("Total Sales by Platform", &totals, "gold"))
    }

    fn global_sales_over_years(&self, table: &SalesTable) -> Result<ChartSpec> {
        let trend =
            aggregate::yearly_trend(table, YearRange::unbounded(), TrendMeasure::GlobalSales)?;
        Ok(self.trend_chart("Global Sales Over the Years", &trend, ChartKind::Line, "orange"))
    }

    fn yearly_sales(&self, table: &SalesTable) -> Result<ChartSpec> {
        let trend = aggregate::yearly_trend(
            table,
            self.config.temporal_window,
            TrendMeasure::GlobalSales,
        )?;
        Ok(self.trend_chart("Yearly Global Sales Trends", &trend, ChartKind::Line, "magenta"))
    }

    fn release_counts(&self, table: &SalesTable) -> Result<ChartSpec> {
        let trend = aggregate::yearly_trend(
            table,
            self.config.temporal_window,
            TrendMeasure::ReleaseCount,
        )?;
        Ok(self.trend_chart(
            "Number of Games Released Each Year",
            &trend,
            ChartKind::Bar,
            "violet",
        ))
    }

    fn top_genres(&self, table: &SalesTable, region: Region) -> Result<ChartSpec> {
        let all = aggregate::top_genres_by_region(table, self.config.top_genres)?;
        let data = records(&aggregate::genres_in_region(&all, region))?;
        let genre = SalesColumn::Genre.name();

        let encoding = EncodingSpec::new(
            format!("Top {} Genres in {}", self.config.top_genres, region),
            Field::nominal(genre).sorted(SortOrder::by_desc(SALES)),
            Field::quantitative(SALES),
        )
        .color_by(Field::nominal(genre))
        .label_angle(0);
        Ok(render(data, ChartKind::Bar, self.sized(encoding)))
    }

    fn top_publishers(&self, table: &SalesTable) -> Result<ChartSpec> {
        let k = self.config.top_entities;
        let totals = aggregate::top_entities_by_sales(table, CategoryColumn::Publisher, k)?;
        Ok(self.keyed_bar(
            &format!("Top {} Publishers by Global Sales", k),
            &totals,
            "lightblue",
        ))
    }

    fn genre_popularity(&self, table: &SalesTable) -> Result<ChartSpec> {
        let totals = aggregate::top_entities_by_sales(
            table,
            CategoryColumn::Genre,
            self.config.top_entities,
        )?;
        Ok(self.keyed_bar("Global Sales by Genre", &totals, "steelblue"))
    }

    /// The dataset has no developer column; publishers stand in for it
    fn developer_performance(&self, table: &SalesTable) -> Result<ChartSpec> {
        let totals = aggregate::top_entities_by_sales(
            table,
            CategoryColumn::Publisher,
            self.config.top_entities,
        )?;
        Ok(self.keyed_bar("Global Sales by Developer", &totals, "teal"))
    }

    fn correlation_heatmap(&self, matrix: &CorrelationMatrix) -> Result<ChartSpec> {
        let data = records(&matrix.to_long())?;
        let value = Field::quantitative("Correlation");
        let encoding = EncodingSpec::new(
            "Correlation Matrix",
            Field::nominal("Column").titled(""),
            Field::nominal("Row").titled(""),
        )
        .color_by(value.clone())
        .tooltip(vec![Field::nominal("Row"), Field::nominal("Column"), value]);
        Ok(render(data, ChartKind::Heatmap, self.sized(encoding)))
    }

    /// Bar chart of top-k totals, largest first
    fn keyed_bar(&self, title: &str, totals: &KeyedTotals, color: &str) -> ChartSpec {
        let global = SalesColumn::GlobalSales.name();
        let encoding = EncodingSpec::new(
            title,
            Field::nominal(totals.group.name()).sorted(SortOrder::by_desc(global)),
            Field::quantitative(global),
        )
        .mark_color(color);
        render(totals.records(), ChartKind::Bar, self.sized(encoding))
    }

    fn trend_chart(
        &self,
        title: &str,
        trend: &YearlyTrend,
        kind: ChartKind,
        color: &str,
    ) -> ChartSpec {
        let y = match trend.measure {
            TrendMeasure::GlobalSales => Field::quantitative(trend.measure.field()),
            TrendMeasure::ReleaseCount => Field::quantitative(COUNT).titled("Count of Records"),
        };
        let encoding = EncodingSpec::new(
            title,
            Field::ordinal(SalesColumn::YearOfRelease.name()),
            y,
        )
        .mark_color(color);
        render(trend.records(), kind, self.sized(encoding))
    }
}
