use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tabular_ingest::IngestionError;
use tabular_ingest::ingestion::csv::ingest_csv_from_path;
use tabular_ingest::ingestion::{DataIngestor, ZipDataIngestor};
use tabular_ingest::types::Value;
use zip::write::SimpleFileOptions;

const PEOPLE_CSV: &str = "id,name,score,active\n1,Ada,98.5,true\n2,Grace,87.25,false\n3,Linus,77,true\n";

fn write_zip(path: &Path, entries: &[(&str, &str)]) {
    let file = File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (name, contents) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(contents.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

fn setup(entries: &[(&str, &str)]) -> (tempfile::TempDir, PathBuf, ZipDataIngestor) {
    let tmp = tempfile::tempdir().unwrap();
    let archive = tmp.path().join("input.zip");
    write_zip(&archive, entries);
    let ingestor = ZipDataIngestor::new().with_extraction_dir(tmp.path().join("extracted_data"));
    (tmp, archive, ingestor)
}

#[test]
fn ingest_zip_single_csv_matches_direct_parse() {
    let (tmp, archive, ingestor) = setup(&[("people.csv", PEOPLE_CSV)]);

    let table = ingestor.ingest(&archive).unwrap();
    assert_eq!(table.row_count(), 3);
    assert_eq!(table.column_count(), 4);
    assert_eq!(table.column_names(), vec!["id", "name", "score", "active"]);
    assert_eq!(table.value(2, "name"), Some(&Value::Utf8("Linus".to_string())));

    let direct_path = tmp.path().join("direct.csv");
    std::fs::write(&direct_path, PEOPLE_CSV).unwrap();
    let direct = ingest_csv_from_path(&direct_path).unwrap();
    assert_eq!(table, direct);
}

#[test]
fn ingest_zip_ignores_non_csv_entries() {
    let (_tmp, archive, ingestor) = setup(&[("README.txt", "notes"), ("people.csv", PEOPLE_CSV)]);

    let table = ingestor.ingest(&archive).unwrap();
    assert_eq!(table.row_count(), 3);
}

#[test]
fn ingest_zip_without_csv_is_not_found() {
    let (_tmp, archive, ingestor) = setup(&[("README.txt", "notes")]);

    let err = ingestor.ingest(&archive).unwrap_err();
    assert!(matches!(err, IngestionError::NotFound { .. }), "{err}");
    assert!(err.to_string().contains("no CSV file found"));
}

#[test]
fn ingest_zip_suffix_match_is_case_sensitive() {
    let (_tmp, archive, ingestor) = setup(&[("PEOPLE.CSV", PEOPLE_CSV)]);

    let err = ingestor.ingest(&archive).unwrap_err();
    assert!(matches!(err, IngestionError::NotFound { .. }), "{err}");
}

#[test]
fn ingest_zip_only_searches_top_level() {
    let (_tmp, archive, ingestor) = setup(&[("nested/people.csv", PEOPLE_CSV)]);

    let err = ingestor.ingest(&archive).unwrap_err();
    assert!(matches!(err, IngestionError::NotFound { .. }), "{err}");
}

#[test]
fn ingest_zip_with_multiple_csv_is_ambiguous() {
    let (_tmp, archive, ingestor) = setup(&[("b.csv", PEOPLE_CSV), ("a.csv", PEOPLE_CSV)]);

    match ingestor.ingest(&archive).unwrap_err() {
        IngestionError::AmbiguousInput { candidates } => {
            assert_eq!(candidates, vec!["a.csv".to_string(), "b.csv".to_string()]);
        }
        other => panic!("expected AmbiguousInput, got {other}"),
    }
}

#[test]
fn ingest_zip_rejects_other_suffixes() {
    let (tmp, _archive, ingestor) = setup(&[("people.csv", PEOPLE_CSV)]);
    let renamed = tmp.path().join("input.csv");
    std::fs::write(&renamed, PEOPLE_CSV).unwrap();

    let err = ingestor.ingest(&renamed).unwrap_err();
    assert!(matches!(err, IngestionError::InvalidInput { .. }));
    assert!(err.to_string().contains("not a .zip file"));
    assert!(!ingestor.extraction_dir().exists());
}

#[test]
fn ingest_zip_malformed_archive_is_parse_error() {
    let tmp = tempfile::tempdir().unwrap();
    let archive = tmp.path().join("broken.zip");
    std::fs::write(&archive, b"this is not a zip archive").unwrap();
    let ingestor = ZipDataIngestor::new().with_extraction_dir(tmp.path().join("out"));

    let err = ingestor.ingest(&archive).unwrap_err();
    assert!(matches!(err, IngestionError::ParseError { .. }), "{err}");
}

#[test]
fn ingest_zip_leaves_extracted_files_by_default() {
    let (_tmp, archive, ingestor) = setup(&[("people.csv", PEOPLE_CSV)]);

    ingestor.ingest(&archive).unwrap();
    assert!(ingestor.extraction_dir().join("people.csv").is_file());
}

#[test]
fn ingest_zip_cleanup_removes_extraction_dir_on_success_and_failure() {
    let (tmp, archive, ingestor) = setup(&[("people.csv", PEOPLE_CSV)]);
    let ingestor = ingestor.with_cleanup(true);

    ingestor.ingest(&archive).unwrap();
    assert!(!ingestor.extraction_dir().exists());

    let ambiguous = tmp.path().join("two.zip");
    write_zip(&ambiguous, &[("a.csv", PEOPLE_CSV), ("b.csv", PEOPLE_CSV)]);
    ingestor.ingest(&ambiguous).unwrap_err();
    assert!(!ingestor.extraction_dir().exists());
}

#[test]
fn ingest_zip_sees_files_left_by_a_previous_call() {
    let (tmp, first, ingestor) = setup(&[("first.csv", PEOPLE_CSV)]);
    ingestor.ingest(&first).unwrap();

    let second = tmp.path().join("second.zip");
    write_zip(&second, &[("second.csv", PEOPLE_CSV)]);

    let err = ingestor.ingest(&second).unwrap_err();
    assert!(matches!(err, IngestionError::AmbiguousInput { .. }), "{err}");
}

#[test]
fn ingest_zip_cleanup_keeps_files_already_in_extraction_dir() {
    let (tmp, archive, ingestor) = setup(&[("people.csv", PEOPLE_CSV), ("docs/readme.txt", "notes")]);
    let dir = ingestor.extraction_dir().to_path_buf();
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("keep.txt"), "user data").unwrap();
    let ingestor = ingestor.with_cleanup(true);

    ingestor.ingest(&archive).unwrap();
    assert!(dir.join("keep.txt").is_file());
    assert!(!dir.join("people.csv").exists());
    assert!(!dir.join("docs").exists());

    let ambiguous = tmp.path().join("two.zip");
    write_zip(&ambiguous, &[("a.csv", PEOPLE_CSV), ("b.csv", PEOPLE_CSV)]);
    ingestor.ingest(&ambiguous).unwrap_err();
    assert!(dir.join("keep.txt").is_file());
    assert!(!dir.join("a.csv").exists());
    assert!(!dir.join("b.csv").exists());
}

#[test]
fn ingest_zip_cleanup_leaves_extraction_dir_alone_when_archive_cannot_be_opened() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("my_data");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("keep.txt"), "user data").unwrap();
    let ingestor = ZipDataIngestor::new().with_extraction_dir(&dir).with_cleanup(true);

    let err = ingestor.ingest(&tmp.path().join("missing.zip")).unwrap_err();
    assert!(matches!(err, IngestionError::Io(_)), "{err}");
    assert!(dir.join("keep.txt").is_file());

    let broken = tmp.path().join("broken.zip");
    std::fs::write(&broken, b"not a zip").unwrap();
    ingestor.ingest(&broken).unwrap_err();
    assert!(dir.join("keep.txt").is_file());
}

#[test]
fn ingest_zip_cleanup_does_not_create_dir_for_unopenable_archive() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("never");
    let ingestor = ZipDataIngestor::new().with_extraction_dir(&dir).with_cleanup(true);

    ingestor.ingest(&tmp.path().join("missing.zip")).unwrap_err();
    assert!(!dir.exists());
}
