use thiserror::Error;

/// Errors that can occur while loading or analysing the sales dataset
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Network, auth or HTTP failure while fetching the dataset
    #[error("Data source unavailable: {0}")]
    SourceUnavailable(String),

    /// One or more required columns are absent from the fetched table
    #[error("Schema mismatch: missing column(s) {}", missing.join(", "))]
    SchemaMismatch { missing: Vec<String> },

    /// Configuration error (missing connection pair, unreadable config file, ...)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Polars failure inside the transformation pipeline
    #[error("Data processing error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Page template failed to load or render
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

/// Type alias for Results using DashboardError
pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_mismatch_lists_columns() {
        let err = DashboardError::SchemaMismatch {
            missing: vec!["Genre".to_string(), "JP_Sales".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Schema mismatch: missing column(s) Genre, JP_Sales"
        );
    }
}
