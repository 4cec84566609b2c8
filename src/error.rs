//! Error types for sentiscope.

/// Top-level error type for scoring, analysis and conversation I/O.
#[derive(Debug, thiserror::Error)]
pub enum SentiscopeError {
    /// Analysis was asked to summarise an empty observation sequence.
    #[error("insufficient data: at least one observation is required")]
    InsufficientData,

    /// A sentiment score was non-finite or outside `[-1, 1]`.
    #[error("invalid score {score} at observation {index}: must lie within [-1, 1]")]
    InvalidScore {
        /// Sequence index of the offending observation.
        index: usize,
        /// The rejected value.
        score: f64,
    },

    /// Configuration error (thresholds, log level, unparsable TOML).
    #[error("config error: {0}")]
    Config(String),

    /// User input rejected by validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Unknown or expired chat session.
    #[error("session error: {0}")]
    Session(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode/decode error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV export error.
    #[error("CSV error: {0}")]
    Csv(String),
}

impl From<csv::Error> for SentiscopeError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e.to_string())
    }
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, SentiscopeError>;
