//! Error types for the fixture harness.
//!
//! Scenario failures are recorded in the suite, not raised. These errors
//! cover the harness's own plumbing: configuration, report export and
//! terminal I/O.

/// Errors that can occur while configuring or reporting a run.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// An environment variable holds a value that cannot be parsed.
    #[error("config error: {0}")]
    Config(String),

    /// Writing the report or reading the terminal failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The report could not be serialized.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}
