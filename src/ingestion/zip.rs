//! Zip archive ingestion: extract, locate the single CSV, parse it.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{Read, Seek};
use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};
use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::{IngestionError, IngestionResult};
use crate::types::Table;

use super::csv::ingest_csv_from_path;
use super::{DataIngestor, require_suffix};

/// Suffix a path must carry to be accepted by [`ZipDataIngestor`].
pub const ARCHIVE_SUFFIX: &str = ".zip";

/// Suffix of the tabular file looked up inside the extraction directory.
pub const TABULAR_SUFFIX: &str = ".csv";

/// Extraction directory used when none is configured, relative to the working directory.
pub const DEFAULT_EXTRACTION_DIR: &str = "extracted_data";

/// Ingests a `.zip` archive holding exactly one `.csv` file.
///
/// The archive is extracted into [`Self::extraction_dir`] and the directory is then searched
/// (top level only) for `*.csv` entries. Extracted files are left behind unless
/// [`Self::with_cleanup`] is enabled.
///
/// Two ingestions must not run concurrently against the same extraction directory: files from
/// one archive are visible to the other, and cleanup removes them from under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZipDataIngestor {
    extraction_dir: PathBuf,
    cleanup: bool,
}

impl Default for ZipDataIngestor {
    fn default() -> Self {
        Self {
            extraction_dir: PathBuf::from(DEFAULT_EXTRACTION_DIR),
            cleanup: false,
        }
    }
}

impl ZipDataIngestor {
    /// Create an ingestor extracting into [`DEFAULT_EXTRACTION_DIR`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract into `dir` instead of [`DEFAULT_EXTRACTION_DIR`].
    pub fn with_extraction_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.extraction_dir = dir.into();
        self
    }

    /// Undo the extraction once `ingest` returns, whether it succeeded or not.
    ///
    /// Only what the call created is removed: the whole directory if it did not exist before,
    /// otherwise just the top-level entries the archive added to it.
    pub fn with_cleanup(mut self, cleanup: bool) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// Directory the archive is extracted into and read back from.
    pub fn extraction_dir(&self) -> &Path {
        &self.extraction_dir
    }

    /// Whether each call undoes its extraction before returning.
    pub fn cleanup(&self) -> bool {
        self.cleanup
    }
}

impl DataIngestor for ZipDataIngestor {
    fn ingest(&self, path: &Path) -> IngestionResult<Table> {
        require_suffix(path, ARCHIVE_SUFFIX)?;

        let dir = self.extraction_dir.as_path();
        let mut archive = ZipArchive::new(File::open(path)?).map_err(zip_error)?;

        // Armed before anything is written, so a failed extraction is rolled back too.
        let _guard = if self.cleanup {
            Some(ExtractionGuard::plan(&mut archive, dir)?)
        } else {
            None
        };

        fs::create_dir_all(dir)?;
        archive.extract(dir).map_err(zip_error)?;

        let mut candidates = find_tabular_files(dir)?;
        match candidates.len() {
            0 => Err(IngestionError::NotFound {
                message: format!("no CSV file found in the extracted data ({})", dir.display()),
            }),
            1 => {
                let csv_path = candidates.remove(0);
                ingest_csv_from_path(csv_path)
            }
            _ => Err(IngestionError::AmbiguousInput {
                candidates: candidates
                    .iter()
                    .map(|p| p.file_name().unwrap_or_default().to_string_lossy().into_owned())
                    .collect(),
            }),
        }
    }
}

/// Regular files directly inside `dir` whose name ends with [`TABULAR_SUFFIX`], sorted by path.
fn find_tabular_files(dir: &Path) -> IngestionResult<Vec<PathBuf>> {
    let pattern = format!(
        "{}/*{TABULAR_SUFFIX}",
        Pattern::escape(&dir.to_string_lossy())
    );
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };

    let paths = glob::glob_with(&pattern, options).map_err(|e| IngestionError::InvalidInput {
        message: format!("extraction directory '{}' cannot be searched: {e}", dir.display()),
    })?;

    let mut out = Vec::new();
    for entry in paths {
        let p = entry.map_err(|e| IngestionError::Io(e.into()))?;
        if p.is_file() {
            out.push(p);
        }
    }
    Ok(out)
}

fn zip_error(e: ZipError) -> IngestionError {
    match e {
        ZipError::Io(io) => IngestionError::Io(io),
        other => IngestionError::parse(format!("error reading zip archive: {other}")),
    }
}

/// Undoes one extraction on drop.
///
/// If the extraction directory did not exist beforehand it is removed whole. Otherwise only the
/// top-level entries the archive introduced are removed; anything already present in the
/// directory, including files the archive overwrote, stays.
struct ExtractionGuard {
    dir: PathBuf,
    dir_created: bool,
    introduced: BTreeSet<PathBuf>,
}

impl ExtractionGuard {
    fn plan<R: Read + Seek>(archive: &mut ZipArchive<R>, dir: &Path) -> IngestionResult<Self> {
        let dir_created = !dir.exists();
        let mut introduced = BTreeSet::new();

        if !dir_created {
            for idx in 0..archive.len() {
                let entry = archive.by_index_raw(idx).map_err(zip_error)?;
                let Some(name) = entry.enclosed_name() else {
                    continue;
                };
                if let Some(Component::Normal(top)) = name.components().next() {
                    let target = dir.join(top);
                    if !target.exists() {
                        introduced.insert(target);
                    }
                }
            }
        }

        Ok(Self {
            dir: dir.to_path_buf(),
            dir_created,
            introduced,
        })
    }
}

impl Drop for ExtractionGuard {
    fn drop(&mut self) {
        if self.dir_created {
            let _ = fs::remove_dir_all(&self.dir);
            return;
        }
        for target in &self.introduced {
            let _ = if target.is_dir() {
                fs::remove_dir_all(target)
            } else {
                fs::remove_file(target)
            };
        }
    }
}
