//! Sales data layer
//!
//! Loading, normalizing, filtering and aggregating the video game sales
//! table. Every operation takes a `SalesTable` and returns new data; the
//! input is never modified.

pub mod aggregate;
pub mod cache;
pub mod correlation;
pub mod error;
pub mod filter;
pub mod schema;
pub mod source;
pub mod summary;
pub mod table;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::DatasetCache;
pub use correlation::CorrelationMatrix;
pub use error::{DashboardError, Result};
pub use filter::{SalesFilter, YearRange};
pub use schema::{CategoryColumn, Region, SalesColumn};
pub use source::{CsvFileSource, SalesSource, SheetSource, SourceKey};
pub use table::SalesTable;
