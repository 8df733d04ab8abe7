//! Typed column identifiers for the sales dataset
//!
//! Every column the analyses touch is named through one of these enums so
//! that a misspelt column is a compile error rather than a runtime
//! `ColumnNotFound` from polars.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Columns the dashboard requires to be present in the source table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SalesColumn {
    Platform,
    YearOfRelease,
    Genre,
    Publisher,
    NaSales,
    EuSales,
    JpSales,
    OtherSales,
    GlobalSales,
}

impl SalesColumn {
    /// All required columns, in source order
    pub const REQUIRED: [SalesColumn; 9] = [
        SalesColumn::Platform,
        SalesColumn::YearOfRelease,
        SalesColumn::Genre,
        SalesColumn::Publisher,
        SalesColumn::NaSales,
        SalesColumn::EuSales,
        SalesColumn::JpSales,
        SalesColumn::OtherSales,
        SalesColumn::GlobalSales,
    ];

    /// Column header as it appears in the spreadsheet
    pub fn name(self) -> &'static str {
        match self {
            SalesColumn::Platform => "Platform",
            SalesColumn::YearOfRelease => "Year_of_Release",
            SalesColumn::Genre => "Genre",
            SalesColumn::Publisher => "Publisher",
            SalesColumn::NaSales => "NA_Sales",
            SalesColumn::EuSales => "EU_Sales",
            SalesColumn::JpSales => "JP_Sales",
            SalesColumn::OtherSales => "Other_Sales",
            SalesColumn::GlobalSales => "Global_Sales",
        }
    }

    /// Whether the column holds sales figures (millions of units)
    pub fn is_sales(self) -> bool {
        matches!(
            self,
            SalesColumn::NaSales
                | SalesColumn::EuSales
                | SalesColumn::JpSales
                | SalesColumn::OtherSales
                | SalesColumn::GlobalSales
        )
    }

    /// Whether the column is categorical (text)
    pub fn is_categorical(self) -> bool {
        matches!(
            self,
            SalesColumn::Platform | SalesColumn::Genre | SalesColumn::Publisher
        )
    }
}

impl fmt::Display for SalesColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Geographic sales bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Region {
    NorthAmerica,
    #[default]
    Europe,
    Japan,
    Other,
}

impl Region {
    /// Regions in melt order
    pub const ALL: [Region; 4] = [
        Region::NorthAmerica,
        Region::Europe,
        Region::Japan,
        Region::Other,
    ];

    /// Short label used as the `Region` value in long-form tables
    pub fn label(self) -> &'static str {
        match self {
            Region::NorthAmerica => "NA",
            Region::Europe => "EU",
            Region::Japan => "JP",
            Region::Other => "Other",
        }
    }

    /// Source column holding this region's sales
    pub fn column(self) -> SalesColumn {
        match self {
            Region::NorthAmerica => SalesColumn::NaSales,
            Region::Europe => SalesColumn::EuSales,
            Region::Japan => SalesColumn::JpSales,
            Region::Other => SalesColumn::OtherSales,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Region {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl FromStr for Region {
    type Err = String;

    /// Accepts the short label or the source column name, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Region::ALL
            .into_iter()
            .find(|r| {
                r.label().eq_ignore_ascii_case(trimmed)
                    || r.column().name().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| format!("Unknown region '{}', expected NA, EU, JP or Other", s))
    }
}

/// Categorical columns that aggregations can group by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryColumn {
    Platform,
    Genre,
    Publisher,
}

impl CategoryColumn {
    pub fn column(self) -> SalesColumn {
        match self {
            CategoryColumn::Platform => SalesColumn::Platform,
            CategoryColumn::Genre => SalesColumn::Genre,
            CategoryColumn::Publisher => SalesColumn::Publisher,
        }
    }

    pub fn name(self) -> &'static str {
        self.column().name()
    }
}

/// Columns of the correlation matrix, in display order
pub const CORRELATION_COLUMNS: [SalesColumn; 6] = [
    SalesColumn::GlobalSales,
    SalesColumn::NaSales,
    SalesColumn::EuSales,
    SalesColumn::JpSales,
    SalesColumn::OtherSales,
    SalesColumn::YearOfRelease,
];
