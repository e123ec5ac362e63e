#![cfg(feature = "excel")]

use std::fs;
use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};

use crate::error::{IngestionError, IngestionResult};
use crate::types::{Field, Schema, Table, Value};

use super::infer::{coerce_value, normalize_headers, unify_value_type};
use super::{DataIngestor, require_suffix};

/// Suffix a path must carry to be accepted by [`ExcelDataIngestor`].
pub const SPREADSHEET_SUFFIX: &str = ".xlsx";

/// Ingests an `.xlsx` workbook.
///
/// Reads the first sheet unless a sheet name is configured via [`Self::with_sheet`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExcelDataIngestor {
    sheet: Option<String>,
}

impl ExcelDataIngestor {
    /// Create an ingestor reading the first sheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the named sheet instead of the first one.
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    /// The configured sheet name, if any.
    pub fn sheet(&self) -> Option<&str> {
        self.sheet.as_deref()
    }
}

impl DataIngestor for ExcelDataIngestor {
    fn ingest(&self, path: &Path) -> IngestionResult<Table> {
        require_suffix(path, SPREADSHEET_SUFFIX)?;
        ingest_excel_from_path(path, self.sheet.as_deref())
    }
}

/// Ingest one sheet of a workbook (`.xlsx`, `.xls`, `.ods`, etc.) into an in-memory `Table`.
///
/// Behavior:
/// - Picks `sheet_name` if provided; otherwise uses the first sheet in the workbook
/// - Detects the first non-empty row as the header row
/// - Infers one type per column from the cells below the header
///
/// The workbook format is detected from the content. Failing to open the file is an
/// [`IngestionError::Io`]; reader failures are reported as [`IngestionError::ParseError`]
/// carrying the reader's message.
pub fn ingest_excel_from_path(path: impl AsRef<Path>, sheet_name: Option<&str>) -> IngestionResult<Table> {
    // Format detection clones the reader once per candidate format, so hand it an in-memory cursor.
    let bytes = fs::read(path)?;
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(excel_error)?;

    let sheet = match sheet_name {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| IngestionError::parse("error reading Excel file: workbook has no sheets"))?,
    };

    let range = workbook.worksheet_range(&sheet).map_err(excel_error)?;
    Ok(table_from_range(&range))
}

fn table_from_range(range: &Range<Data>) -> Table {
    let mut rows_iter = range
        .rows()
        .skip_while(|row| row.iter().all(|c| matches!(c, Data::Empty)));

    let Some(header_row) = rows_iter.next() else {
        return Table::new(Schema::new(Vec::new()), Vec::new());
    };
    let names = normalize_headers(&header_row.iter().map(cell_to_header_string).collect::<Vec<_>>());
    let width = names.len();

    let mut rows: Vec<Vec<Value>> = rows_iter
        .map(|row| {
            (0..width)
                .map(|idx| cell_to_value(row.get(idx).unwrap_or(&Data::Empty)))
                .collect()
        })
        .collect();

    let mut fields = Vec::with_capacity(width);
    for (idx, name) in names.into_iter().enumerate() {
        let data_type = unify_value_type(rows.iter().map(|r| &r[idx]));
        for row in rows.iter_mut() {
            let v = std::mem::replace(&mut row[idx], Value::Null);
            row[idx] = coerce_value(v, data_type);
        }
        fields.push(Field::new(name, data_type));
    }

    Table::new(Schema::new(fields), rows)
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 => (*f as i64).to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Typed cell conversion. Integral floats become integers, matching how workbook readers
/// surface whole numbers.
fn cell_to_value(c: &Data) -> Value {
    match c {
        Data::Empty => Value::Null,
        Data::Int(i) => Value::Int64(*i),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                Value::Int64(*f as i64)
            } else {
                Value::Float64(*f)
            }
        }
        Data::Bool(b) => Value::Bool(*b),
        Data::String(s) if s.trim().is_empty() => Value::Null,
        Data::String(s) => Value::Utf8(s.clone()),
        other => Value::Utf8(other.to_string()),
    }
}

fn excel_error(e: calamine::Error) -> IngestionError {
    match e {
        calamine::Error::Io(io) => IngestionError::Io(io),
        other => IngestionError::parse(format!("error reading Excel file: {other}")),
    }
}
