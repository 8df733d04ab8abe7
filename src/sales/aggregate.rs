//! Grouped summaries behind every chart
//!
//! Each function is pure: the same table always yields the same rows.
//! Top-k selections sort with `maintain_order`, so groups with equal totals
//! keep the order in which they were first seen in the table.

use super::error::Result;
use super::filter::YearRange;
use super::schema::{CategoryColumn, Region, SalesColumn};
use super::table::{f64_column, i64_column, str_column, SalesTable};
use polars::prelude::*;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Long-form column holding the region label after a melt
pub const REGION: &str = "Region";
/// Long-form column holding the melted sales value
pub const SALES: &str = "Sales";
/// Release count column of the yearly trend
pub const COUNT: &str = "Count";

/// Default number of platforms in the platform chart
pub const DEFAULT_TOP_PLATFORMS: usize = 10;
/// Default number of genres kept per region
pub const DEFAULT_TOP_GENRES: usize = 5;
/// Default number of publishers/genres in the top-N charts
pub const DEFAULT_TOP_ENTITIES: usize = 5;

/// Years outside this window are treated as data errors by the temporal tab
pub const TEMPORAL_WINDOW: YearRange = YearRange {
    min: 1980,
    max: 2023,
};

/// Total sales of one region
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionTotal {
    #[serde(rename = "Region")]
    pub region: Region,
    #[serde(rename = "Sales")]
    pub sales: f64,
}

/// Summed `Global_Sales` of one group
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedTotal {
    pub key: String,
    pub total: f64,
}

/// Top-k groups of a categorical column, descending by `Global_Sales`
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedTotals {
    pub group: CategoryColumn,
    pub rows: Vec<KeyedTotal>,
}

impl KeyedTotals {
    /// Rows as `{<group column>: key, "Global_Sales": total}` objects
    pub fn records(&self) -> Vec<Value> {
        self.rows
            .iter()
            .map(|row| {
                let mut record = Map::new();
                record.insert(self.group.name().to_string(), Value::from(row.key.clone()));
                record.insert(
                    SalesColumn::GlobalSales.name().to_string(),
                    Value::from(row.total),
                );
                Value::Object(record)
            })
            .collect()
    }
}

/// What the yearly trend measures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendMeasure {
    /// Sum of `Global_Sales` per year
    GlobalSales,
    /// Number of releases per year
    ReleaseCount,
}

impl TrendMeasure {
    /// Field name of the measured value in chart records
    pub fn field(self) -> &'static str {
        match self {
            TrendMeasure::GlobalSales => SalesColumn::GlobalSales.name(),
            TrendMeasure::ReleaseCount => COUNT,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct YearPoint {
    pub year: i64,
    pub value: f64,
}

/// Per-year series, ascending by year
#[derive(Debug, Clone, PartialEq)]
pub struct YearlyTrend {
    pub measure: TrendMeasure,
    pub points: Vec<YearPoint>,
}

impl YearlyTrend {
    pub fn records(&self) -> Vec<Value> {
        self.points
            .iter()
            .map(|p| {
                let mut record = Map::new();
                record.insert(
                    SalesColumn::YearOfRelease.name().to_string(),
                    Value::from(p.year),
                );
                record.insert(self.measure.field().to_string(), Value::from(p.value));
                Value::Object(record)
            })
            .collect()
    }
}

/// Summed sales of one genre in one region
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreRegionSales {
    #[serde(rename = "Genre")]
    pub genre: String,
    #[serde(rename = "Region")]
    pub region: Region,
    #[serde(rename = "Sales")]
    pub sales: f64,
}

fn descending_stable() -> SortMultipleOptions {
    SortMultipleOptions::default()
        .with_order_descending(true)
        .with_maintain_order(true)
}

/// Melt the four regional columns into (`Region`, `Sales`) rows
///
/// `id` columns are carried along. Rows come out region-major:
/// all NA rows first, then EU, JP and Other.
pub fn melt_regions(table: &SalesTable, id: &[SalesColumn]) -> Result<LazyFrame> {
    let parts: Vec<LazyFrame> = Region::ALL
        .iter()
        .map(|region| {
            let mut exprs: Vec<Expr> = id.iter().map(|c| col(c.name())).collect();
            exprs.push(lit(region.label()).alias(REGION));
            exprs.push(col(region.column().name()).alias(SALES));
            table.lazy().select(exprs)
        })
        .collect();

    Ok(concat(parts, UnionArgs::default())?)
}

/// Sum of sales per region; always one row per region, NA first
pub fn regional_sum(table: &SalesTable) -> Result<Vec<RegionTotal>> {
    let grouped = melt_regions(table, &[])?
        .group_by_stable([col(REGION)])
        .agg([col(SALES).sum()])
        .collect()?;

    let labels = str_column(&grouped, REGION)?;
    let sales = f64_column(&grouped, SALES)?;
    let totals: HashMap<String, f64> = labels.into_iter().zip(sales).collect();

    Ok(Region::ALL
        .iter()
        .map(|region| RegionTotal {
            region: *region,
            sales: totals.get(region.label()).copied().unwrap_or(0.0),
        })
        .collect())
}

/// Top-k groups of `group` by summed `Global_Sales`
pub fn top_entities_by_sales(
    table: &SalesTable,
    group: CategoryColumn,
    k: usize,
) -> Result<KeyedTotals> {
    let global = SalesColumn::GlobalSales.name();
    let out = table
        .lazy()
        .group_by_stable([col(group.name())])
        .agg([col(global).sum()])
        .sort_by_exprs([col(global)], descending_stable())
        .limit(k as IdxSize)
        .collect()?;

    let keys = str_column(&out, group.name())?;
    let totals = f64_column(&out, global)?;

    Ok(KeyedTotals {
        group,
        rows: keys
            .into_iter()
            .zip(totals)
            .map(|(key, total)| KeyedTotal { key, total })
            .collect(),
    })
}

/// Top-k platforms by summed `Global_Sales`
pub fn top_platforms(table: &SalesTable, k: usize) -> Result<KeyedTotals> {
    top_entities_by_sales(table, CategoryColumn::Platform, k)
}

/// Per-year totals (or release counts) for rows inside `window`
pub fn yearly_trend(
    table: &SalesTable,
    window: YearRange,
    measure: TrendMeasure,
) -> Result<YearlyTrend> {
    let year = SalesColumn::YearOfRelease.name();
    let agg = match measure {
        TrendMeasure::GlobalSales => col(SalesColumn::GlobalSales.name()).sum(),
        TrendMeasure::ReleaseCount => len().alias(COUNT),
    };

    let out = table
        .lazy()
        .filter(window.predicate())
        .group_by([col(year)])
        .agg([agg.cast(DataType::Float64)])
        .sort_by_exprs([col(year)], SortMultipleOptions::default())
        .collect()?;

    let years = i64_column(&out, year)?;
    let values = f64_column(&out, measure.field())?;

    Ok(YearlyTrend {
        measure,
        points: years
            .into_iter()
            .zip(values)
            .map(|(year, value)| YearPoint { year, value })
            .collect(),
    })
}

/// Top-k genres by sales within each region
///
/// Output is grouped by region (NA, EU, JP, Other) and descending by sales
/// inside each region.
pub fn top_genres_by_region(table: &SalesTable, k: usize) -> Result<Vec<GenreRegionSales>> {
    let genre = SalesColumn::Genre.name();
    let grouped = melt_regions(table, &[SalesColumn::Genre])?
        .group_by_stable([col(genre), col(REGION)])
        .agg([col(SALES).sum()])
        .collect()?;

    let mut rows = Vec::new();
    for region in Region::ALL {
        let top = grouped
            .clone()
            .lazy()
            .filter(col(REGION).eq(lit(region.label())))
            .sort_by_exprs([col(SALES)], descending_stable())
            .limit(k as IdxSize)
            .collect()?;

        let genres = str_column(&top, genre)?;
        let sales = f64_column(&top, SALES)?;
        rows.extend(
            genres
                .into_iter()
                .zip(sales)
                .map(|(genre, sales)| GenreRegionSales {
                    genre,
                    region,
                    sales,
                }),
        );
    }

    Ok(rows)
}

/// Rows of one region from `top_genres_by_region`
pub fn genres_in_region(rows: &[GenreRegionSales], region: Region) -> Vec<GenreRegionSales> {
    rows.iter()
        .filter(|r| r.region == region)
        .cloned()
        .collect()
}
