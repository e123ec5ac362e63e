//! Ingestor selection and the unified ingestion entrypoint.
//!
//! - [`select_ingestor`] maps an extension token (`".zip"`, `".xlsx"`) to an [`Ingestor`].
//! - [`ingest_from_path`] derives the token from the path, selects, ingests, and reports the
//!   outcome to the [`super::observability::IngestionObserver`] configured in
//!   [`IngestionOptions`], if any.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{IngestionError, IngestionResult};
use crate::types::Table;

#[cfg(feature = "excel")]
use super::excel::ExcelDataIngestor;
use super::observability::{IngestionObserver, IngestionSeverity, IngestionStats, context_for};
use super::zip::{DEFAULT_EXTRACTION_DIR, ZipDataIngestor};
use super::DataIngestor;

/// Supported ingestion formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionFormat {
    /// Zip archive wrapping a single CSV file.
    Zip,
    /// Excel `.xlsx` workbook (feature-gated behind `excel`).
    Excel,
}

impl IngestionFormat {
    /// Look up the format for an extension token such as `".zip"`.
    ///
    /// Matching is exact: `".ZIP"` and `"zip"` are not recognized.
    pub fn from_extension(token: &str) -> Option<Self> {
        match token {
            ".zip" => Some(Self::Zip),
            ".xlsx" => Some(Self::Excel),
            _ => None,
        }
    }

    /// The extension token this format is selected by.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Zip => ".zip",
            Self::Excel => ".xlsx",
        }
    }
}

/// Which sheet to read from an Excel workbook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExcelSheetSelection {
    /// Read the first sheet (default).
    #[default]
    First,
    /// Read a single named sheet.
    Sheet(String),
}

/// Options controlling selection and unified ingestion.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestionOptions {
    /// If `None`, the format is selected from the path's extension.
    pub format: Option<IngestionFormat>,
    /// Directory zip archives are extracted into.
    pub extraction_dir: PathBuf,
    /// Undo each zip extraction before returning (see [`ZipDataIngestor::with_cleanup`]).
    pub cleanup_extracted: bool,
    /// Excel-specific options.
    pub excel_sheet: ExcelSheetSelection,
    /// Receives the outcome of [`ingest_from_path`].
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("format", &self.format)
            .field("extraction_dir", &self.extraction_dir)
            .field("cleanup_extracted", &self.cleanup_extracted)
            .field("excel_sheet", &self.excel_sheet)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            format: None,
            extraction_dir: PathBuf::from(DEFAULT_EXTRACTION_DIR),
            cleanup_extracted: false,
            excel_sheet: ExcelSheetSelection::default(),
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

/// An ingestor chosen by [`select_ingestor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ingestor {
    /// Handles `.zip` archives.
    Zip(ZipDataIngestor),
    /// Handles `.xlsx` workbooks.
    #[cfg(feature = "excel")]
    Excel(ExcelDataIngestor),
}

impl Ingestor {
    /// The format this ingestor handles.
    pub fn format(&self) -> IngestionFormat {
        match self {
            Self::Zip(_) => IngestionFormat::Zip,
            #[cfg(feature = "excel")]
            Self::Excel(_) => IngestionFormat::Excel,
        }
    }

    /// Directory a `.zip` ingestor extracts into; `None` for workbooks.
    pub fn extraction_dir(&self) -> Option<&Path> {
        match self {
            Self::Zip(i) => Some(i.extraction_dir()),
            #[cfg(feature = "excel")]
            Self::Excel(_) => None,
        }
    }
}

impl DataIngestor for Ingestor {
    fn ingest(&self, path: &Path) -> IngestionResult<Table> {
        match self {
            Self::Zip(i) => i.ingest(path),
            #[cfg(feature = "excel")]
            Self::Excel(i) => i.ingest(path),
        }
    }
}

/// Return the ingestor for an extension token, with default settings.
///
/// `".zip"` selects [`Ingestor::Zip`], `".xlsx"` selects `Ingestor::Excel`; any other token
/// fails with [`IngestionError::Unsupported`]. Each call builds a fresh, stateless ingestor.
///
/// ```no_run
/// use std::path::Path;
///
/// use tabular_ingest::ingestion::{select_ingestor, DataIngestor};
///
/// # fn main() -> Result<(), tabular_ingest::IngestionError> {
/// let ingestor = select_ingestor(".zip")?;
/// let table = ingestor.ingest(Path::new("data/archive.zip"))?;
/// println!("rows={}", table.row_count());
/// # Ok(())
/// # }
/// ```
pub fn select_ingestor(extension: &str) -> IngestionResult<Ingestor> {
    select_ingestor_with_options(extension, &IngestionOptions::default())
}

/// Like [`select_ingestor`], applying the extraction and sheet settings from `options`.
pub fn select_ingestor_with_options(extension: &str, options: &IngestionOptions) -> IngestionResult<Ingestor> {
    let format = IngestionFormat::from_extension(extension).ok_or_else(|| IngestionError::Unsupported {
        extension: extension.to_string(),
    })?;
    build_ingestor(format, options)
}

fn build_ingestor(format: IngestionFormat, options: &IngestionOptions) -> IngestionResult<Ingestor> {
    match format {
        IngestionFormat::Zip => Ok(Ingestor::Zip(
            ZipDataIngestor::new()
                .with_extraction_dir(&options.extraction_dir)
                .with_cleanup(options.cleanup_extracted),
        )),
        IngestionFormat::Excel => build_excel_ingestor(&options.excel_sheet),
    }
}

fn build_excel_ingestor(sel: &ExcelSheetSelection) -> IngestionResult<Ingestor> {
    #[cfg(feature = "excel")]
    {
        let ingestor = match sel {
            ExcelSheetSelection::First => ExcelDataIngestor::new(),
            ExcelSheetSelection::Sheet(name) => ExcelDataIngestor::new().with_sheet(name.as_str()),
        };
        Ok(Ingestor::Excel(ingestor))
    }

    #[cfg(not(feature = "excel"))]
    {
        let _ = sel;
        Err(IngestionError::Unsupported {
            extension: format!(
                "{} (excel ingestion not enabled, enable cargo feature 'excel')",
                IngestionFormat::Excel.extension()
            ),
        })
    }
}

/// Unified ingestion entry point for path-based sources.
///
/// - If `options.format` is `None`, the extension token is taken from the path (`a/b.zip` →
///   `".zip"`); a path without extension yields [`IngestionError::Unsupported`] with an empty
///   token.
/// - The selected ingestor still applies its own suffix check, so a forced format only helps
///   when the path already carries the matching suffix.
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with row/column counts
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// ```no_run
/// use std::sync::Arc;
///
/// use tabular_ingest::ingestion::{ingest_from_path, IngestionOptions, StdErrObserver};
///
/// # fn main() -> Result<(), tabular_ingest::IngestionError> {
/// let opts = IngestionOptions {
///     cleanup_extracted: true,
///     observer: Some(Arc::new(StdErrObserver::default())),
///     ..Default::default()
/// };
/// let table = ingest_from_path("data/archive.zip", &opts)?;
/// println!("columns={:?}", table.column_names());
/// # Ok(())
/// # }
/// ```
pub fn ingest_from_path(path: impl AsRef<Path>, options: &IngestionOptions) -> IngestionResult<Table> {
    let path = path.as_ref();
    let ingestor = match options.format {
        Some(format) => build_ingestor(format, options)?,
        None => select_ingestor_with_options(&extension_token(path), options)?,
    };

    let ctx = context_for(path, ingestor.format(), ingestor.extraction_dir());
    let result = ingestor.ingest(path);

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(table) => obs.on_success(
                &ctx,
                IngestionStats {
                    rows: table.row_count(),
                    columns: table.column_count(),
                },
            ),
            Err(e) => {
                let sev = IngestionSeverity::of(e);
                obs.on_failure(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result
}

/// `".ext"` for a path with an extension, `""` otherwise.
fn extension_token(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

/// Convenience helper for callers that want an owned request object.
///
/// This can be useful if you want to enqueue ingestion work in a job system.
#[derive(Clone)]
pub struct IngestionRequest {
    /// Path to the input file.
    pub path: PathBuf,
    /// Options controlling ingestion.
    pub options: IngestionOptions,
}

impl fmt::Debug for IngestionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionRequest")
            .field("path", &self.path)
            .field("options", &self.options)
            .finish()
    }
}

impl IngestionRequest {
    /// Execute the request by calling [`ingest_from_path`].
    pub fn run(&self) -> IngestionResult<Table> {
        ingest_from_path(&self.path, &self.options)
    }
}
