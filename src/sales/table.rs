//! Validated, normalized sales table
//!
//! `SalesTable` wraps a polars `DataFrame` that is known to carry every
//! required column with the expected dtypes and no nulls. It is built once
//! per fetch and shared read-only afterwards.

use super::error::{DashboardError, Result};
use super::filter::YearRange;
use super::schema::{CategoryColumn, SalesColumn};
use polars::prelude::*;
use std::io::Cursor;

/// Rows scanned by the CSV reader to infer column types
const INFER_SCHEMA_ROWS: usize = 10_000;

/// Sentinel written into empty text cells
pub const TEXT_NULL_SENTINEL: &str = "0";

#[derive(Debug, Clone)]
pub struct SalesTable {
    frame: DataFrame,
}

impl SalesTable {
    /// Parse CSV bytes (header row required) into a validated table
    ///
    /// A blank payload has no header at all and reports every required
    /// column as missing.
    pub fn from_csv_bytes(bytes: Vec<u8>) -> Result<Self> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(DashboardError::SchemaMismatch {
                missing: SalesColumn::REQUIRED
                    .iter()
                    .map(|c| c.name().to_string())
                    .collect(),
            });
        }

        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?;

        tracing::debug!(
            rows = frame.height(),
            columns = frame.width(),
            "Parsed CSV payload"
        );

        Self::from_frame(frame)
    }

    /// Validate the schema and replace every null with 0
    ///
    /// Numeric columns are filled with `0`, text columns with the string
    /// `"0"`. `Year_of_Release` is truncated to an integer after filling.
    pub fn from_frame(frame: DataFrame) -> Result<Self> {
        let missing: Vec<String> = SalesColumn::REQUIRED
            .iter()
            .filter(|c| frame.column(c.name()).is_err())
            .map(|c| c.name().to_string())
            .collect();

        if !missing.is_empty() {
            return Err(DashboardError::SchemaMismatch { missing });
        }

        let exprs: Vec<Expr> = frame
            .get_columns()
            .iter()
            .map(|c| normalize_expr(c.name().as_str(), c.dtype()))
            .collect();

        let frame = frame.lazy().with_columns(exprs).collect()?;
        Ok(Self { frame })
    }

    /// Wrap a frame derived from an already-normalized table
    pub(crate) fn from_normalized(frame: DataFrame) -> Self {
        Self { frame }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Lazy view over the table (cheap: columns are reference counted)
    pub fn lazy(&self) -> LazyFrame {
        self.frame.clone().lazy()
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Column names in source order
    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect()
    }

    /// Distinct values of a categorical column, in first-seen order
    pub fn distinct(&self, column: CategoryColumn) -> Result<Vec<String>> {
        let unique = self
            .lazy()
            .select([col(column.name()).unique_stable()])
            .collect()?;
        str_column(&unique, column.name())
    }

    /// Publisher options for the single-select widget
    pub fn publishers(&self) -> Result<Vec<String>> {
        self.distinct(CategoryColumn::Publisher)
    }

    /// Genre options for the multi-select widget
    pub fn genres(&self) -> Result<Vec<String>> {
        self.distinct(CategoryColumn::Genre)
    }

    /// Inclusive min/max of `Year_of_Release` (None for an empty table)
    pub fn year_bounds(&self) -> Result<Option<YearRange>> {
        let years = self
            .frame
            .column(SalesColumn::YearOfRelease.name())?
            .as_materialized_series()
            .i64()?;

        Ok(match (years.min(), years.max()) {
            (Some(min), Some(max)) => Some(YearRange::new(min, max)),
            _ => None,
        })
    }

    /// First `n` rows as text cells, in source column order
    pub fn head_text(&self, n: usize) -> Result<Vec<Vec<String>>> {
        let head = self.frame.head(Some(n));
        let columns = head
            .get_columns()
            .iter()
            .map(|c| str_column(&head, c.name().as_str()))
            .collect::<Result<Vec<_>>>()?;

        Ok((0..head.height())
            .map(|row| columns.iter().map(|c| c[row].clone()).collect())
            .collect())
    }

    /// Values of a column as f64 (years are widened)
    pub fn f64_values(&self, column: SalesColumn) -> Result<Vec<f64>> {
        f64_column(&self.frame, column.name())
    }
}

/// Build the null-filling expression for one column
fn normalize_expr(name: &str, dtype: &DataType) -> Expr {
    if name == SalesColumn::YearOfRelease.name() {
        return col(name)
            .cast(DataType::Float64)
            .fill_nan(lit(0.0))
            .fill_null(lit(0.0))
            .cast(DataType::Int64);
    }

    let required = SalesColumn::REQUIRED.iter().find(|c| c.name() == name);
    match required {
        Some(c) if c.is_sales() => col(name)
            .cast(DataType::Float64)
            .fill_nan(lit(0.0))
            .fill_null(lit(0.0)),
        Some(c) if c.is_categorical() => col(name)
            .cast(DataType::String)
            .fill_null(lit(TEXT_NULL_SENTINEL)),
        _ => match dtype {
            DataType::Float32 | DataType::Float64 => {
                col(name).fill_nan(lit(0.0)).fill_null(lit(0.0))
            }
            dt if is_integer(dt) => col(name).fill_null(lit(0)),
            DataType::Boolean => col(name).fill_null(lit(false)),
            _ => col(name)
                .cast(DataType::String)
                .fill_null(lit(TEXT_NULL_SENTINEL)),
        },
    }
}

fn is_integer(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Whether a dtype is numeric (used by the summary statistics)
pub(crate) fn is_numeric(dtype: &DataType) -> bool {
    is_integer(dtype) || matches!(dtype, DataType::Float32 | DataType::Float64)
}

/// Extract a text column; nulls become empty strings
pub(crate) fn str_column(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::String)?;
    Ok(series
        .str()?
        .into_iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect())
}

/// Extract a numeric column as f64; nulls become NaN
pub(crate) fn f64_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    Ok(series
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}

/// Extract an integer column as i64; nulls become 0
pub(crate) fn i64_column(df: &DataFrame, name: &str) -> Result<Vec<i64>> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Int64)?;
    Ok(series
        .i64()?
        .into_iter()
        .map(|v| v.unwrap_or(0))
        .collect())
}
