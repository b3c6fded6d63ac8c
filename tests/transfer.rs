// End-to-end transfers through the facade against the local filesystem and in-memory fakes.

use anyhow::Result;
use table_transfer::io::cloud::{FakeCredentials, FakeObjectIO, FakeTableIO, ObjectIO, TableIO};
use table_transfer::testing::*;
use table_transfer::{
    CodecOptions, ErrorKind, Format, Location, Storage, TableTransfer, TransferState, WriteMode,
};
use std::fs;
use std::sync::Arc;

// ============================================================================
// Local filesystem
// ============================================================================

#[test]
fn csv_to_json_exact_bytes() -> Result<()> {
    let dir = TempDirPath::new()?;
    write_fixture(dir.path(), "people.csv", "id,name\n1,alice\n2,bob\n")?;

    let mut transfer = TableTransfer::local().with_root(dir.path());
    transfer.ingest(&Location::parse("people.csv")?, Format::Csv)?;
    transfer.emit(&Location::parse("out/people.json")?, Format::Json)?;

    assert_eq!(
        fs::read_to_string(dir.file_path("out/people.json"))?,
        r#"[{"id":1,"name":"alice"},{"id":2,"name":"bob"}]"#
    );
    Ok(())
}

#[test]
fn emit_before_ingest_is_nothing_loaded() -> Result<()> {
    let dir = TempDirPath::new()?;
    let transfer = TableTransfer::local().with_root(dir.path());

    let err = transfer
        .emit(&Location::parse("out.csv")?, Format::Csv)
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NothingLoaded);
    assert_eq!(transfer.state(), TransferState::Empty);
    assert!(!dir.file_path("out.csv").exists());
    Ok(())
}

#[test]
fn missing_source_keeps_prior_state() -> Result<()> {
    let dir = TempDirPath::new()?;
    write_fixture(dir.path(), "people.csv", people_csv())?;
    let mut transfer = TableTransfer::local().with_root(dir.path());

    let err = transfer
        .ingest(&Location::parse("nope.csv")?, Format::Csv)
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(transfer.state(), TransferState::Empty);

    transfer.ingest(&Location::parse("people.csv")?, Format::Csv)?;
    let err = transfer
        .ingest(&Location::parse("nope.csv")?, Format::Csv)
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(transfer.state(), TransferState::Loaded);
    assert_datasets_equal(transfer.dataset().unwrap(), &people_dataset());
    Ok(())
}

#[test]
fn one_ingest_many_emits() -> Result<()> {
    let dir = TempDirPath::new()?;
    write_fixture(dir.path(), "people.csv", people_csv())?;
    let mut transfer = TableTransfer::local().with_root(dir.path());
    transfer.ingest(&Location::parse("people.csv")?, Format::Csv)?;

    transfer.emit(&Location::parse("copy.csv")?, Format::Csv)?;
    transfer.emit(&Location::parse("copy.json")?, Format::Json)?;
    transfer.emit(&Location::parse("copy.jsonl")?, Format::JsonLines)?;

    assert_eq!(fs::read_to_string(dir.file_path("copy.csv"))?, people_csv());
    for (name, format) in [("copy.json", Format::Json), ("copy.jsonl", Format::JsonLines)] {
        let back = read_dataset(&dir.file_path(name), format)?;
        assert_datasets_equal(&back, &people_dataset());
    }
    Ok(())
}

#[test]
fn cross_format_equivalence() -> Result<()> {
    let dir = TempDirPath::new()?;
    write_fixture(dir.path(), "people.csv", people_csv())?;
    let mut transfer = TableTransfer::local().with_root(dir.path());

    transfer.ingest(&Location::parse("people.csv")?, Format::Csv)?;
    let from_csv = transfer.dataset().cloned().unwrap();
    transfer.emit(&Location::parse("people.json")?, Format::Json)?;

    transfer.ingest(&Location::parse("people.json")?, Format::Json)?;
    assert_datasets_equal(transfer.dataset().unwrap(), &from_csv);
    assert_columns(transfer.dataset().unwrap(), &["id", "name", "score"]);
    Ok(())
}

#[test]
fn pretty_json_and_custom_delimiter() -> Result<()> {
    let dir = TempDirPath::new()?;
    write_fixture(dir.path(), "people.tsv", "id\tname\n1\talice\n")?;
    let options = CodecOptions {
        delimiter: b'\t',
        pretty_json: true,
    };
    let mut transfer = TableTransfer::local()
        .with_root(dir.path())
        .with_options(options);

    transfer.ingest(&Location::parse("people.tsv")?, Format::Csv)?;
    transfer.emit(&Location::parse("people.json")?, Format::Json)?;
    assert_eq!(
        fs::read_to_string(dir.file_path("people.json"))?,
        "[\n  {\n    \"id\": 1,\n    \"name\": \"alice\"\n  }\n]"
    );
    Ok(())
}

#[test]
fn malformed_csv_fails_ingest() -> Result<()> {
    let dir = TempDirPath::new()?;
    write_fixture(dir.path(), "bad.csv", "id,name\n1\n")?;
    let mut transfer = TableTransfer::local().with_root(dir.path());

    let err = transfer
        .ingest(&Location::parse("bad.csv")?, Format::Csv)
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::MalformedInput);
    assert!(transfer.dataset().is_none());
    Ok(())
}

// ============================================================================
// Object storage
// ============================================================================

#[test]
fn object_storage_round_trip() -> Result<()> {
    let dir = TempDirPath::new()?;
    write_fixture(dir.path(), "people.csv", people_csv())?;
    let client = FakeObjectIO::new();
    let storage = Storage::local()
        .with_root(dir.path())
        .with_object_store(Arc::new(client.clone()));
    let mut transfer = TableTransfer::new(storage);

    transfer.ingest(&Location::parse("people.csv")?, Format::Csv)?;
    transfer.emit(&Location::parse("s3://reports/daily/people.json")?, Format::Json)?;
    assert!(client.object_exists("reports", "daily/people.json")?);

    transfer.clear();
    transfer.ingest(&Location::parse("s3://reports/daily/people.json")?, Format::Json)?;
    assert_datasets_equal(transfer.dataset().unwrap(), &people_dataset());
    Ok(())
}

#[test]
fn missing_object_is_not_found() -> Result<()> {
    let storage = Storage::local().with_object_store(Arc::new(FakeObjectIO::new()));
    let mut transfer = TableTransfer::new(storage);
    let err = transfer
        .ingest(&Location::parse("s3://reports/absent.csv")?, Format::Csv)
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    Ok(())
}

#[test]
fn bad_credentials_are_access_denied() -> Result<()> {
    let dir = TempDirPath::new()?;
    write_fixture(dir.path(), "people.csv", people_csv())?;
    let client = FakeObjectIO::new().with_credentials(Arc::new(FakeCredentials::new("")));
    let storage = Storage::local()
        .with_root(dir.path())
        .with_object_store(Arc::new(client));
    let mut transfer = TableTransfer::new(storage);

    let err = transfer
        .ingest(&Location::parse("s3://reports/people.csv")?, Format::Csv)
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::AccessDenied);

    transfer.ingest(&Location::parse("people.csv")?, Format::Csv)?;
    let err = transfer
        .emit(&Location::parse("s3://reports/people.csv")?, Format::Csv)
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::AccessDenied);
    Ok(())
}

#[test]
fn object_location_without_client_is_not_implemented() -> Result<()> {
    let mut transfer = TableTransfer::local();
    let err = transfer
        .ingest(&Location::parse("s3://reports/people.csv")?, Format::Csv)
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotImplemented);
    Ok(())
}

// ============================================================================
// Tables
// ============================================================================

fn table_transfer(tables: &FakeTableIO, dir: &TempDirPath, mode: WriteMode) -> TableTransfer {
    let storage = Storage::local()
        .with_root(dir.path())
        .with_table_store(Arc::new(tables.clone()), mode);
    TableTransfer::new(storage)
}

#[test]
fn csv_into_table_insert_and_truncate() -> Result<()> {
    let dir = TempDirPath::new()?;
    write_fixture(dir.path(), "people.csv", people_csv())?;
    let tables = FakeTableIO::new();
    tables.add_table("public", "people", &["id", "name", "score"]);
    let table = Location::parse("pg://public.people")?;

    let mut insert = table_transfer(&tables, &dir, WriteMode::Insert);
    insert.ingest(&Location::parse("people.csv")?, Format::Csv)?;
    insert.emit(&table, Format::Csv)?;
    insert.emit(&table, Format::Csv)?;
    assert_eq!(tables.rows("public", "people").map(|r| r.len()), Some(6));

    let mut replace = table_transfer(&tables, &dir, WriteMode::TruncateInsert);
    replace.ingest(&Location::parse("people.csv")?, Format::Csv)?;
    replace.emit(&table, Format::Csv)?;
    assert_eq!(tables.rows("public", "people").map(|r| r.len()), Some(3));

    replace.ingest(&table, Format::Csv)?;
    assert_datasets_equal(replace.dataset().unwrap(), &people_dataset());
    Ok(())
}

#[test]
fn upsert_and_json_tables_are_not_implemented() -> Result<()> {
    let dir = TempDirPath::new()?;
    write_fixture(dir.path(), "people.csv", people_csv())?;
    let tables = FakeTableIO::new();
    tables.add_table("public", "people", &["id", "name", "score"]);
    let table = Location::parse("pg://public.people")?;

    let mut upsert = table_transfer(&tables, &dir, WriteMode::Upsert);
    upsert.ingest(&Location::parse("people.csv")?, Format::Csv)?;
    assert_eq!(
        upsert.emit(&table, Format::Csv).unwrap_err().kind,
        ErrorKind::NotImplemented
    );
    assert_eq!(
        upsert.emit(&table, Format::Json).unwrap_err().kind,
        ErrorKind::NotImplemented
    );
    assert_eq!(
        upsert.ingest(&table, Format::JsonLines).unwrap_err().kind,
        ErrorKind::NotImplemented
    );
    assert_eq!(tables.rows("public", "people"), Some(vec![]));
    Ok(())
}

#[test]
fn table_exchange_ignores_custom_delimiter() -> Result<()> {
    let dir = TempDirPath::new()?;
    write_fixture(dir.path(), "people.csv", "id;name\n2;bob\n")?;
    let tables = FakeTableIO::new();
    tables.add_table("public", "people", &["id", "name"]);
    tables.copy_in("public", "people", b"id,name\n1,alice\n")?;
    let table = Location::parse("pg://public.people")?;
    let options = CodecOptions {
        delimiter: b';',
        ..CodecOptions::default()
    };

    let mut transfer = table_transfer(&tables, &dir, WriteMode::Insert).with_options(options);
    transfer.ingest(&table, Format::Csv)?;
    assert_columns(transfer.dataset().unwrap(), &["id", "name"]);
    assert_eq!(transfer.dataset().unwrap().len(), 1);

    transfer.ingest(&Location::parse("people.csv")?, Format::Csv)?;
    transfer.emit(&table, Format::Csv)?;
    assert_eq!(
        tables.rows("public", "people"),
        Some(vec![
            vec!["1".to_string(), "alice".to_string()],
            vec!["2".to_string(), "bob".to_string()],
        ])
    );
    Ok(())
}

#[test]
fn rejected_truncate_insert_keeps_existing_rows() -> Result<()> {
    let dir = TempDirPath::new()?;
    write_fixture(dir.path(), "other.csv", "id,title\n1,boss\n")?;
    let tables = FakeTableIO::new();
    tables.add_table("public", "people", &["id", "name"]);
    tables.copy_in("public", "people", b"id,name\n9,zed\n")?;
    let table = Location::parse("pg://public.people")?;

    let mut replace = table_transfer(&tables, &dir, WriteMode::TruncateInsert);
    replace.ingest(&Location::parse("other.csv")?, Format::Csv)?;
    let err = replace.emit(&table, Format::Csv).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);
    assert_eq!(
        tables.rows("public", "people"),
        Some(vec![vec!["9".to_string(), "zed".to_string()]])
    );
    Ok(())
}

#[test]
fn unknown_table_is_not_found() -> Result<()> {
    let dir = TempDirPath::new()?;
    let mut transfer = table_transfer(&FakeTableIO::new(), &dir, WriteMode::Insert);
    let err = transfer
        .ingest(&Location::parse("pg://public.ghost")?, Format::Csv)
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    Ok(())
}
