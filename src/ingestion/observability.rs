//! Reporting hooks for [`super::ingest_from_path`].
//!
//! Ingestors stay silent. The unified entrypoint describes each attempt with an
//! [`IngestionContext`] (input path, selected format, extraction directory for archives) and
//! hands the outcome to the configured [`IngestionObserver`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::IngestionError;

use super::unified::IngestionFormat;

/// How bad a failed ingestion is; failures at or above
/// [`super::IngestionOptions::alert_at_or_above`] also raise an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IngestionSeverity {
    /// The input was rejected: wrong suffix, no or several CSVs in the archive, unreadable content.
    Error,
    /// The file system failed underneath the ingestor (missing input, unwritable extraction dir).
    Critical,
}

impl IngestionSeverity {
    /// Classify a failure returned by an ingestor.
    pub fn of(error: &IngestionError) -> Self {
        match error {
            IngestionError::Io(_) => Self::Critical,
            IngestionError::InvalidInput { .. }
            | IngestionError::Unsupported { .. }
            | IngestionError::NotFound { .. }
            | IngestionError::AmbiguousInput { .. }
            | IngestionError::ParseError { .. } => Self::Error,
        }
    }
}

impl fmt::Display for IngestionSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Error => "error",
            Self::Critical => "critical",
        })
    }
}

/// One ingestion attempt, as seen by observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionContext {
    /// Path handed to the ingestor.
    pub path: PathBuf,
    /// Format of the selected ingestor.
    pub format: IngestionFormat,
    /// Where a `.zip` archive is extracted; `None` for workbooks.
    pub extraction_dir: Option<PathBuf>,
}

impl IngestionContext {
    fn describe(&self) -> String {
        let mut out = format!("{} {}", self.format.extension(), self.path.display());
        if let Some(dir) = &self.extraction_dir {
            out.push_str(&format!(" (extracted into {})", dir.display()));
        }
        out
    }
}

/// Shape of the table a successful ingestion produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionStats {
    pub rows: usize,
    pub columns: usize,
}

/// Receives the outcome of each [`super::ingest_from_path`] call.
///
/// Selection failures (unknown extension token) happen before a context exists and are not
/// reported. All methods default to doing nothing, except `on_alert`, which forwards to
/// `on_failure`.
pub trait IngestionObserver: Send + Sync {
    fn on_success(&self, _ctx: &IngestionContext, _stats: IngestionStats) {}

    fn on_failure(&self, _ctx: &IngestionContext, _severity: IngestionSeverity, _error: &IngestionError) {}

    /// Called after `on_failure` when `severity` meets the configured threshold.
    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Forwards every event to each attached observer, in attach order.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn IngestionObserver>>,
}

impl CompositeObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach another observer.
    pub fn with(mut self, observer: Arc<dyn IngestionObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver").field("len", &self.observers.len()).finish()
    }
}

impl IngestionObserver for CompositeObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        self.observers.iter().for_each(|o| o.on_success(ctx, stats));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.observers.iter().for_each(|o| o.on_failure(ctx, severity, error));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.observers.iter().for_each(|o| o.on_alert(ctx, severity, error));
    }
}

/// Writes one line per ingestion to stderr, e.g.
/// `tabular-ingest: .zip data/houses.zip (extracted into extracted_data): 3 rows x 4 columns`.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl StdErrObserver {
    fn success_line(ctx: &IngestionContext, stats: IngestionStats) -> String {
        format!(
            "tabular-ingest: {}: {} rows x {} columns",
            ctx.describe(),
            stats.rows,
            stats.columns
        )
    }

    fn failure_line(ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError, alert: bool) -> String {
        let tag = if alert { "ALERT " } else { "" };
        format!("tabular-ingest: {tag}{severity}: {}: {error}", ctx.describe())
    }
}

impl IngestionObserver for StdErrObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        eprintln!("{}", Self::success_line(ctx, stats));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        eprintln!("{}", Self::failure_line(ctx, severity, error, false));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        eprintln!("{}", Self::failure_line(ctx, severity, error, true));
    }
}

/// Context for an attempt on `path` with the given format; archives carry their extraction dir.
pub(crate) fn context_for(path: &Path, format: IngestionFormat, extraction_dir: Option<&Path>) -> IngestionContext {
    IngestionContext {
        path: path.to_path_buf(),
        format,
        extraction_dir: extraction_dir.map(Path::to_path_buf),
    }
}
