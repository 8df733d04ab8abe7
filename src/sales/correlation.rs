//! Pearson correlation matrix over numeric sales columns

use super::error::Result;
use super::schema::SalesColumn;
use super::table::{f64_column, SalesTable};
use polars::prelude::*;
use serde::Serialize;

/// Square matrix of Pearson coefficients, rounded to 2 decimals
///
/// Entries involving a zero-variance column are NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<SalesColumn>,
    pub values: Vec<Vec<f64>>,
}

/// One cell of the matrix in long form (heatmap input)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationCell {
    #[serde(rename = "Row")]
    pub row: &'static str,
    #[serde(rename = "Column")]
    pub column: &'static str,
    #[serde(rename = "Correlation")]
    pub value: f64,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i][j]
    }

    /// Cells in row-major order
    pub fn to_long(&self) -> Vec<CorrelationCell> {
        let mut cells = Vec::with_capacity(self.len() * self.len());
        for (i, row) in self.columns.iter().enumerate() {
            for (j, column) in self.columns.iter().enumerate() {
                cells.push(CorrelationCell {
                    row: row.name(),
                    column: column.name(),
                    value: self.values[i][j],
                });
            }
        }
        cells
    }
}

/// Compute the correlation matrix of `columns`, in the given order
pub fn compute(table: &SalesTable, columns: &[SalesColumn]) -> Result<CorrelationMatrix> {
    let names: Vec<&str> = columns.iter().map(|c| c.name()).collect();
    let values = pearson_matrix(table.lazy(), &names)?;
    Ok(CorrelationMatrix {
        columns: columns.to_vec(),
        values,
    })
}

/// Pairwise `pearson_corr` over the upper triangle in a single select,
/// mirrored into a full matrix
fn pearson_matrix(frame: LazyFrame, names: &[&str]) -> Result<Vec<Vec<f64>>> {
    let n = names.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    if n == 0 {
        return Ok(values);
    }

    let pairs: Vec<(usize, usize)> = (0..n).flat_map(|i| (i..n).map(move |j| (i, j))).collect();
    let exprs: Vec<Expr> = pairs
        .iter()
        .map(|&(i, j)| pearson_corr(col(names[i]), col(names[j])).alias(cell_name(i, j)))
        .collect();
    let out = frame.select(exprs).collect()?;

    for (i, j) in pairs {
        // null for an empty frame, NaN for zero variance
        let r = f64_column(&out, &cell_name(i, j))?
            .first()
            .copied()
            .map_or(f64::NAN, round2);
        values[i][j] = r;
        values[j][i] = r;
    }
    Ok(values)
}

fn cell_name(i: usize, j: usize) -> String {
    format!("r_{i}_{j}")
}

fn round2(v: f64) -> f64 {
    ((v * 100.0).round() / 100.0).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sales::schema::CORRELATION_COLUMNS;
    use crate::sales::testing::{nintendo_single, sample_frame, sample_table};

    #[test]
    fn test_symmetric_with_unit_diagonal() {
        let m = compute(&sample_table(), &CORRELATION_COLUMNS).unwrap();
        assert_eq!(m.len(), 6);
        for i in 0..m.len() {
            assert_eq!(m.get(i, i), 1.0);
            for j in 0..m.len() {
                let (a, b) = (m.get(i, j), m.get(j, i));
                assert!(a == b || (a.is_nan() && b.is_nan()));
                assert!(a.is_nan() || (-1.0..=1.0).contains(&a));
            }
        }
    }

    #[test]
    fn test_rounded_to_two_decimals() {
        let m = compute(&sample_table(), &CORRELATION_COLUMNS).unwrap();
        for row in &m.values {
            for v in row {
                assert!(v.is_nan() || ((v * 100.0) - (v * 100.0).round()).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_zero_variance_is_nan() {
        let df = df! {
            "flat" => [1.0, 1.0, 1.0],
            "rising" => [1.0, 2.0, 3.0],
        }
        .unwrap();
        let m = pearson_matrix(df.lazy(), &["flat", "rising"]).unwrap();
        assert!(m[0][0].is_nan());
        assert!(m[0][1].is_nan() && m[1][0].is_nan());
        assert_eq!(m[1][1], 1.0);

        // A single row has no variance anywhere
        let m = compute(&nintendo_single(), &CORRELATION_COLUMNS).unwrap();
        assert!(m.values.iter().flatten().all(|v| v.is_nan()));
    }

    #[test]
    fn test_perfect_correlation() {
        let df = df! {
            "x" => [1.0, 2.0, 3.0],
            "double" => [2.0, 4.0, 6.0],
            "reversed" => [3.0, 2.0, 1.0],
        }
        .unwrap();
        let m = pearson_matrix(df.lazy(), &["x", "double", "reversed"]).unwrap();
        assert_eq!(m[0][1], 1.0);
        assert_eq!(m[0][2], -1.0);
        assert_eq!(m[2][1], -1.0);
    }

    #[test]
    fn test_empty_table_is_all_nan() {
        let table = SalesTable::from_frame(sample_frame().head(Some(0))).unwrap();
        let m = compute(&table, &CORRELATION_COLUMNS).unwrap();
        assert_eq!(m.len(), 6);
        assert!(m.values.iter().flatten().all(|v| v.is_nan()));
    }

    #[test]
    fn test_long_form() {
        let m = compute(
            &sample_table(),
            &[SalesColumn::NaSales, SalesColumn::GlobalSales],
        )
        .unwrap();
        let cells = m.to_long();
        assert_eq!(cells.len(), 4);
        assert_eq!(cells[1].row, "NA_Sales");
        assert_eq!(cells[1].column, "Global_Sales");
        assert_eq!(cells[1].value, cells[2].value);
    }
}
