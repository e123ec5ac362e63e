//! `tabular-ingest` loads tabular files into an in-memory [`types::Table`], choosing the loader
//! ("ingestor") from the file extension.
//!
//! ## What you can ingest
//!
//! - **Zip archives**: `.zip` holding exactly one `.csv` file. The archive is extracted into a
//!   directory (`extracted_data` by default) and the single CSV is parsed.
//! - **Excel workbooks** (Cargo feature `excel`, on by default): `.xlsx`, first sheet unless a
//!   sheet name is given.
//!
//! Column types are inferred per column ([`types::DataType::Int64`],
//! [`types::DataType::Float64`], [`types::DataType::Bool`], [`types::DataType::Utf8`]); empty
//! cells map to [`types::Value::Null`].
//!
//! ## Quick example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use tabular_ingest::ingestion::{select_ingestor, DataIngestor};
//!
//! # fn main() -> Result<(), tabular_ingest::IngestionError> {
//! let path = Path::new("data/houses.zip");
//! let extension = format!(".{}", path.extension().unwrap().to_string_lossy());
//!
//! let ingestor = select_ingestor(&extension)?;
//! let table = ingestor.ingest(path)?;
//! println!("rows={} columns={:?}", table.row_count(), table.column_names());
//! # Ok(())
//! # }
//! ```
//!
//! [`ingestion::ingest_from_path`] does the extension lookup for you and accepts
//! [`ingestion::IngestionOptions`] (extraction directory, cleanup, sheet, observer).
//!
//! ## Errors
//!
//! All failures are [`IngestionError`]s: a wrong suffix is `InvalidInput`, an unknown extension
//! token is `Unsupported`, an archive without a CSV is `NotFound`, an archive with several CSVs
//! is `AmbiguousInput`, and content a reader rejects is `ParseError`.
//!
//! ## Testing
//!
//! The spreadsheet tests build their workbooks with `rust_xlsxwriter`, which is only pulled in by
//! the `excel_test_writer` feature. A plain `cargo test` skips them; run
//!
//! ```text
//! cargo test --features excel_test_writer
//! ```
//!
//! to cover `.xlsx` ingestion end to end.
//!
//! ## Modules
//!
//! - [`ingestion`]: the ingestor trait, selector, and format-specific implementations
//! - [`types`]: schema + in-memory table types
//! - [`error`]: error types used across ingestion

pub mod error;
pub mod ingestion;
pub mod types;

pub use error::{IngestionError, IngestionResult};
