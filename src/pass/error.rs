use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PassError {
    #[error("{field} is not a finite number")]
    NonFinite { field: &'static str },
    #[error("pass span is {seconds}s, expected a positive duration")]
    EmptySpan { seconds: i64 },
    #[error("pass times are not monotonic (start {start}, max {max}, end {end})")]
    NonMonotonic { start: i64, max: i64, end: i64 },
    #[error("{field} {value} is outside [0, 90]")]
    ElevationOutOfRange { field: &'static str, value: f64 },
    #[error("timestamp {0} is out of range")]
    TimestampOutOfRange(i64),
    #[error("invalid observer: {0}")]
    InvalidObserver(String),
    #[error("path step must be positive")]
    InvalidStep,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("pass file read error: {0}")]
    Io(#[from] std::io::Error),
    #[error("pass file parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("prediction service error: {0}")]
    Service(String),
    #[error("pass index {index} out of range ({len} passes)")]
    IndexOutOfRange { index: usize, len: usize },
}
