//! Summary statistics and column profile for the Data Overview and
//! Profile Report pages

use super::error::Result;
use super::table::{f64_column, is_numeric, str_column, SalesTable, TEXT_NULL_SENTINEL};
use polars::prelude::*;
use serde::Serialize;

/// `describe()`-style statistics of one numeric column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    #[serde(rename = "25%")]
    pub q25: f64,
    #[serde(rename = "50%")]
    pub q50: f64,
    #[serde(rename = "75%")]
    pub q75: f64,
    pub max: f64,
}

/// Per-column overview used by the profile report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub column: String,
    pub dtype: String,
    pub nulls: usize,
    /// Cells holding the `0` placeholder written over missing values
    pub zeros: usize,
    pub distinct: usize,
    pub numeric: bool,
}

/// Statistics in `describe()` order, as suffixes of the select aliases
const STATS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Summary statistics of every numeric column, in source order
pub fn describe(table: &SalesTable) -> Result<Vec<ColumnSummary>> {
    describe_frame(table.frame())
}

/// One lazy select computing every statistic of every numeric column
fn describe_frame(frame: &DataFrame) -> Result<Vec<ColumnSummary>> {
    let names: Vec<String> = frame
        .get_columns()
        .iter()
        .filter(|c| is_numeric(c.dtype()))
        .map(|c| c.name().to_string())
        .collect();
    if names.is_empty() {
        return Ok(Vec::new());
    }

    let exprs: Vec<Expr> = names.iter().flat_map(|name| stat_exprs(name)).collect();
    let stats = frame.clone().lazy().select(exprs).collect()?;

    names
        .into_iter()
        .map(|name| -> Result<ColumnSummary> {
            let mut values = [f64::NAN; STATS.len()];
            for (value, stat) in values.iter_mut().zip(STATS) {
                // empty columns aggregate to null
                *value = f64_column(&stats, &stat_name(&name, stat))?
                    .first()
                    .copied()
                    .unwrap_or(f64::NAN);
            }
            let [count, mean, std, min, q25, q50, q75, max] = values;
            Ok(ColumnSummary {
                column: name,
                count: count as usize,
                mean,
                std,
                min,
                q25,
                q50,
                q75,
                max,
            })
        })
        .collect()
}

fn stat_exprs(name: &str) -> Vec<Expr> {
    let c = col(name).cast(DataType::Float64);
    let quartile = |q: f64| c.clone().quantile(lit(q), QuantileMethod::Linear);
    let exprs = [
        c.clone().count(),
        c.clone().mean(),
        c.clone().std(1),
        c.clone().min(),
        quartile(0.25),
        quartile(0.50),
        quartile(0.75),
        c.clone().max(),
    ];
    exprs
        .into_iter()
        .zip(STATS)
        .map(|(expr, stat)| expr.alias(stat_name(name, stat)))
        .collect()
}

fn stat_name(column: &str, stat: &str) -> String {
    format!("{column}:{stat}")
}

/// Profile of every column
pub fn profile(table: &SalesTable) -> Result<Vec<ColumnProfile>> {
    let frame = table.frame();
    let mut profiles = Vec::with_capacity(frame.width());

    for column in frame.get_columns() {
        let name = column.name().as_str();
        let numeric = is_numeric(column.dtype());
        let zeros = if numeric {
            f64_column(frame, name)?
                .into_iter()
                .filter(|v| *v == 0.0)
                .count()
        } else {
            str_column(frame, name)?
                .iter()
                .filter(|v| v.as_str() == TEXT_NULL_SENTINEL)
                .count()
        };

        profiles.push(ColumnProfile {
            column: name.to_string(),
            dtype: column.dtype().to_string(),
            nulls: column.null_count(),
            zeros,
            distinct: column.as_materialized_series().n_unique()?,
            numeric,
        });
    }

    Ok(profiles)
}
