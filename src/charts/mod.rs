//! Chart rendering
//!
//! Aggregate rows plus an encoding become a `ChartSpec`, which serializes
//! to a Vega-Lite v5 document displayed in the HTML pages by vega-embed.

pub mod encoding;
pub mod spec;

pub use encoding::{EncodingSpec, Field, FieldType, SortOrder};
pub use spec::{records, render, ChartKind, ChartSpec};
