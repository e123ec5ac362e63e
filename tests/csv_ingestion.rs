use tabular_ingest::IngestionError;
use tabular_ingest::ingestion::csv::{ingest_csv_from_path, ingest_csv_from_reader};
use tabular_ingest::types::{DataType, Value};

fn reader(input: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input.as_bytes())
}

#[test]
fn ingest_csv_from_path_happy_path() {
    let table = ingest_csv_from_path("tests/fixtures/people.csv").unwrap();

    assert_eq!(table.row_count(), 2);
    assert_eq!(table.column_names(), vec!["id", "name", "score", "active"]);
    assert_eq!(
        table.rows[0],
        vec![
            Value::Int64(1),
            Value::Utf8("Ada".to_string()),
            Value::Float64(98.5),
            Value::Bool(true),
        ]
    );
}

#[test]
fn ingest_csv_empty_cells_are_null() {
    let table = ingest_csv_from_reader(&mut reader("id,name\n1,\n,Grace\n")).unwrap();

    assert_eq!(table.column("id").unwrap(), vec![&Value::Int64(1), &Value::Null]);
    assert_eq!(table.value(0, "name"), Some(&Value::Null));
    assert_eq!(table.schema.fields[1].data_type, DataType::Utf8);
}

#[test]
fn ingest_csv_normalizes_headers() {
    let table = ingest_csv_from_reader(&mut reader("x,,x\n1,2,3\n")).unwrap();
    assert_eq!(table.column_names(), vec!["x", "Unnamed: 1", "x.1"]);
}

#[test]
fn ingest_csv_quoted_fields_keep_delimiters() {
    let table = ingest_csv_from_reader(&mut reader("name,city\n\"Lovelace, Ada\",London\n")).unwrap();
    assert_eq!(table.value(0, "name"), Some(&Value::Utf8("Lovelace, Ada".to_string())));
}

#[test]
fn ingest_csv_missing_file_is_io_error() {
    let err = ingest_csv_from_path("tests/fixtures/does_not_exist.csv").unwrap_err();
    assert!(matches!(err, IngestionError::Io(_)), "{err}");
}

#[test]
fn ingest_csv_parse_error_names_the_file() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("ragged.csv");
    std::fs::write(&path, "a,b\n1,2,3\n").unwrap();

    let err = ingest_csv_from_path(&path).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("ragged.csv"), "{msg}");
    assert!(msg.contains("expected 2 fields"), "{msg}");
}
