use thiserror::Error;

/// Hard failures of the reporting core.
///
/// Each variant is a broken caller precondition (a malformed stored date,
/// an unknown export format), not user input to be shown field by field.
/// Field-level problems go through the validators instead.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid date range: {0}")]
    InvalidRange(String),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ReportResult<T> = Result<T, ReportError>;
