//! Data source error types.

use thiserror::Error;

/// Failures while loading the CSV data source at startup.
///
/// None of these are fatal to the process: the server starts in a degraded
/// state and both feed endpoints answer 500 until it is restarted with a
/// readable file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file is missing or unreadable.
    #[error("data source unavailable: {0}")]
    Unavailable(#[from] std::io::Error),

    /// The file opened but could not be parsed as CSV.
    #[error("failed to parse data source: {0}")]
    Parse(#[from] csv::Error),

    /// The file has no data rows (empty or header-only).
    #[error("data source contains no data rows")]
    NoRows,
}
