use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Error type returned by ingestors and the selector.
///
/// Every failure is returned to the caller of `ingest`/`select_ingestor` as-is; nothing is
/// retried and no partial table is produced.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The path does not carry the suffix the invoked ingestor expects.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// No ingestor is registered for the extension token.
    #[error("no ingestor available for file extension: '{extension}'")]
    Unsupported { extension: String },

    /// The archive did not contain any file with the tabular suffix.
    #[error("not found: {message}")]
    NotFound { message: String },

    /// The archive contained more than one candidate file; the caller must pick one.
    #[error("multiple CSV files found, please specify which one to use: {candidates:?}")]
    AmbiguousInput { candidates: Vec<String> },

    /// A format reader rejected the file content. The reader's message is preserved.
    #[error("parse error: {message}")]
    ParseError { message: String },
}

impl IngestionError {
    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
        }
    }
}
