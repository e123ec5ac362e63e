//! Ingestion entrypoints and implementations.
//!
//! Every format is handled by a [`DataIngestor`]: something that turns a file path into an
//! in-memory [`crate::types::Table`]. Most callers should either:
//!
//! - pick an ingestor with [`select_ingestor`] from an extension token such as `".zip"`, or
//! - call [`ingest_from_path`], which derives the token from the path and optionally reports
//!   the outcome to an [`IngestionObserver`].
//!
//! Format-specific readers are also available under:
//! - [`csv`](self::csv)
//! - [`zip`](self::zip)
//! - `excel` (Cargo feature `excel`, on by default)

use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::Table;

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod infer;
pub mod observability;
pub mod unified;
pub mod zip;

#[cfg(feature = "excel")]
pub use self::excel::ExcelDataIngestor;
pub use observability::{
    CompositeObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats,
    StdErrObserver,
};
pub use unified::{
    ExcelSheetSelection, IngestionFormat, IngestionOptions, IngestionRequest, Ingestor, ingest_from_path,
    select_ingestor, select_ingestor_with_options,
};
pub use self::zip::ZipDataIngestor;

/// Produces a [`Table`] from a file path.
///
/// Implementations check the path suffix before any I/O and never modify the input file.
pub trait DataIngestor {
    /// Read the file at `path` into a new table.
    fn ingest(&self, path: &Path) -> IngestionResult<Table>;
}

/// Literal, case-sensitive suffix check shared by the ingestors.
pub(crate) fn require_suffix(path: &Path, suffix: &str) -> IngestionResult<()> {
    if path.to_string_lossy().ends_with(suffix) {
        Ok(())
    } else {
        Err(IngestionError::InvalidInput {
            message: format!("the provided file is not a {suffix} file: {}", path.display()),
        })
    }
}
