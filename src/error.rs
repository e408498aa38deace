use thiserror::Error;

pub type Result<T> = std::result::Result<T, AuditError>;

/// A single record that could not be audited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFailure {
    pub url: String,
    pub message: String,
}

/// Errors that abort an audit run
#[derive(Debug, Error)]
pub enum AuditError {
    /// The baseline header row lacks required columns
    #[error("baseline is missing required columns: {}", .missing.join(", "))]
    Validation { missing: Vec<String> },

    /// The baseline table could not be decoded
    #[error("failed to read baseline table: {0}")]
    Baseline(String),

    /// Fetching or parsing one page failed
    #[error("error fetching or parsing {url}: {message}")]
    Fetch { url: String, message: String },

    /// One or more records failed under the fail-fast policy
    #[error("{} of the audited pages failed: {}", .failures.len(), summarize(.failures))]
    Batch { failures: Vec<RecordFailure> },

    /// The run was cancelled or hit its deadline before every page finished
    #[error("audit run cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl AuditError {
    pub fn fetch(url: &str, message: impl std::fmt::Display) -> Self {
        AuditError::Fetch {
            url: url.to_string(),
            message: message.to_string(),
        }
    }
}

impl From<csv::Error> for AuditError {
    fn from(err: csv::Error) -> Self {
        AuditError::Baseline(err.to_string())
    }
}

impl From<serde_json::Error> for AuditError {
    fn from(err: serde_json::Error) -> Self {
        AuditError::Config(err.to_string())
    }
}

fn summarize(failures: &[RecordFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{} ({})", f.url, f.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failure to deliver a notification. Never escapes the engine.
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("network error: {0}")]
    Network(String),

    #[error("webhook rejected message (status {status}): {message}")]
    Rejected { status: u16, message: String },
}

impl From<reqwest::Error> for NotificationError {
    fn from(err: reqwest::Error) -> Self {
        NotificationError::Network(err.to_string())
    }
}
