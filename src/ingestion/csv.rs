//! CSV ingestion implementation.

use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataType, Field, Schema, Table, Value};

use super::infer::{infer_text_type, normalize_headers, parse_bool};

/// Ingest a CSV file into an in-memory [`Table`].
///
/// Rules:
///
/// - The first record is the header row; blank and duplicate names are normalized.
/// - Records shorter than the header are padded with [`Value::Null`]; longer records are an error.
/// - Column types are inferred from the data.
pub fn ingest_csv_from_path(path: impl AsRef<Path>) -> IngestionResult<Table> {
    let path = path.as_ref();
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| with_path(path, reader_error(e)))?;
    ingest_csv_from_reader(&mut rdr).map_err(|e| with_path(path, e))
}

/// Ingest CSV data from an existing CSV reader.
///
/// The reader should be built with `has_headers(true)` and `flexible(true)`; a non-flexible reader
/// rejects short records before they can be padded.
pub fn ingest_csv_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> IngestionResult<Table> {
    let headers = rdr.headers().map_err(reader_error)?.clone();
    if headers.is_empty() {
        return Err(IngestionError::parse("no columns to parse from file"));
    }
    let names = normalize_headers(&headers.iter().collect::<Vec<_>>());
    let width = names.len();

    let mut raw_rows: Vec<csv::StringRecord> = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(reader_error)?;
        if record.len() > width {
            // Report 1-based line numbers for users.
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(IngestionError::parse(format!(
                "expected {width} fields in line {line}, saw {}",
                record.len()
            )));
        }
        raw_rows.push(record);
    }

    let types: Vec<DataType> = (0..width)
        .map(|idx| infer_text_type(raw_rows.iter().map(|r| r.get(idx).unwrap_or(""))))
        .collect();

    let mut rows: Vec<Vec<Value>> = Vec::with_capacity(raw_rows.len());
    for record in &raw_rows {
        let row = types
            .iter()
            .enumerate()
            .map(|(idx, data_type)| parse_typed_value(data_type, record.get(idx).unwrap_or("")))
            .collect();
        rows.push(row);
    }

    let fields = names
        .into_iter()
        .zip(types)
        .map(|(name, data_type)| Field::new(name, data_type))
        .collect();
    Ok(Table::new(Schema::new(fields), rows))
}

/// Parse a cell into a type previously chosen by [`infer_text_type`] for its column.
///
/// Whitespace is ignored for null detection and typed parsing; text cells keep it.
fn parse_typed_value(data_type: &DataType, raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }

    // Inference guarantees every non-empty cell parses; fall back to text regardless.
    match data_type {
        DataType::Utf8 => Value::Utf8(raw.to_owned()),
        DataType::Int64 => trimmed
            .parse::<i64>()
            .map(Value::Int64)
            .unwrap_or_else(|_| Value::Utf8(raw.to_owned())),
        DataType::Float64 => trimmed
            .parse::<f64>()
            .map(Value::Float64)
            .unwrap_or_else(|_| Value::Utf8(raw.to_owned())),
        DataType::Bool => parse_bool(trimmed)
            .map(Value::Bool)
            .unwrap_or_else(|| Value::Utf8(raw.to_owned())),
    }
}

fn reader_error(e: csv::Error) -> IngestionError {
    if e.is_io_error() {
        match e.into_kind() {
            csv::ErrorKind::Io(io) => IngestionError::Io(io),
            other => IngestionError::parse(format!("{other:?}")),
        }
    } else {
        IngestionError::parse(format!("error reading CSV: {e}"))
    }
}

fn with_path(path: &Path, e: IngestionError) -> IngestionError {
    match e {
        IngestionError::ParseError { message } => IngestionError::ParseError {
            message: format!("{}: {message}", path.display()),
        },
        other => other,
    }
}
