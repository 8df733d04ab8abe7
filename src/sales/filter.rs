//! Widget-driven row filtering
//!
//! The Sales Analysis tab narrows the table with three widgets: a
//! single-select publisher, a multi-select genre list and an inclusive year
//! slider. The predicate is the AND of the three.

use super::error::Result;
use super::schema::SalesColumn;
use super::table::SalesTable;
use polars::prelude::*;
use std::fmt;
use std::str::FromStr;

/// Inclusive year interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub min: i64,
    pub max: i64,
}

impl YearRange {
    pub fn new(min: i64, max: i64) -> Self {
        YearRange { min, max }
    }

    /// A range that accepts every year
    pub fn unbounded() -> Self {
        YearRange {
            min: i64::MIN,
            max: i64::MAX,
        }
    }

    pub fn contains(&self, year: i64) -> bool {
        self.min <= year && year <= self.max
    }

    /// Predicate over `Year_of_Release`
    pub(crate) fn predicate(&self) -> Expr {
        let year = SalesColumn::YearOfRelease.name();
        col(year)
            .gt_eq(lit(self.min))
            .and(col(year).lt_eq(lit(self.max)))
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

impl FromStr for YearRange {
    type Err = String;

    /// Parses "MIN-MAX" (or a single year)
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parse = |v: &str| {
            v.trim()
                .parse::<i64>()
                .map_err(|_| format!("Invalid year '{}' in range '{}'", v.trim(), s))
        };

        let (min, max) = match s.split_once('-') {
            Some((lo, hi)) => (parse(lo)?, parse(hi)?),
            None => {
                let year = parse(s)?;
                (year, year)
            }
        };

        if min > max {
            return Err(format!("Year range '{}' has min > max", s));
        }
        Ok(YearRange { min, max })
    }
}

/// Current state of the three filter widgets
#[derive(Debug, Clone, PartialEq)]
pub struct SalesFilter {
    pub publisher: String,
    pub genres: Vec<String>,
    pub years: YearRange,
}

impl SalesFilter {
    pub fn new(publisher: impl Into<String>, genres: Vec<String>, years: YearRange) -> Self {
        SalesFilter {
            publisher: publisher.into(),
            genres,
            years,
        }
    }

    /// Widget defaults: first publisher, every genre, full year span
    pub fn defaults(table: &SalesTable) -> Result<Self> {
        let publisher = table.publishers()?.into_iter().next().unwrap_or_default();
        let genres = table.genres()?;
        let years = table
            .year_bounds()?
            .unwrap_or_else(|| YearRange::new(0, 0));

        Ok(SalesFilter {
            publisher,
            genres,
            years,
        })
    }

    /// Combined predicate; an empty genre list matches nothing
    fn predicate(&self) -> Expr {
        let genre = SalesColumn::Genre.name();
        let genre_match = self
            .genres
            .iter()
            .map(|g| col(genre).eq(lit(g.as_str())))
            .reduce(|acc, e| acc.or(e))
            .unwrap_or_else(|| lit(false));

        col(SalesColumn::Publisher.name())
            .eq(lit(self.publisher.as_str()))
            .and(genre_match)
            .and(self.years.predicate())
    }

    /// Apply the filter, returning the matching rows with the full schema
    pub fn apply(&self, table: &SalesTable) -> Result<SalesTable> {
        let frame = table.lazy().filter(self.predicate()).collect()?;

        tracing::debug!(
            publisher = %self.publisher,
            genres = self.genres.len(),
            years = %self.years,
            rows = frame.height(),
            "Applied sales filter"
        );

        Ok(SalesTable::from_normalized(frame))
    }
}

/// Filter `table` by publisher, genre set and inclusive year range
pub fn filter(
    table: &SalesTable,
    publisher: &str,
    genres: &[String],
    years: YearRange,
) -> Result<SalesTable> {
    SalesFilter::new(publisher, genres.to_vec(), years).apply(table)
}
