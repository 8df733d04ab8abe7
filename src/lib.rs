//! Video Game Sales Dashboard library
//!
//! Module organization:
//! - `sales`: dataset loading, caching, filtering and aggregation
//! - `charts`: Vega-Lite chart specifications
//! - `pipeline`: builds every Analysis chart from a table and a selection
//! - `pages`: static HTML site
//! - `config`, `properties`, `cli`: settings and command-line handling

pub mod charts;
pub mod cli;
pub mod config;
pub mod pages;
pub mod pipeline;
pub mod properties;
pub mod sales;
