//! Copy one table from a source location to a target location.
//!
//! ```bash
//! # Local CSV to JSON in an S3-compatible bucket (credentials from the environment or .env)
//! table-transfer people.csv s3://reports/people.json --pretty
//!
//! # Explicit formats and a semicolon-separated source
//! table-transfer export.txt out/people.jsonl --from csv --to jsonl --delimiter ';'
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Parser;
use table_transfer::io::Storage;
use table_transfer::{CodecOptions, Format, Location, Medium, TableTransfer};

#[derive(Parser, Debug)]
#[command(name = "table-transfer", version, about = "Move a table between storage media and formats")]
struct Args {
    /// Source: a path, file://path, s3://bucket/key or pg://schema.table
    source: String,

    /// Target, in the same forms as the source
    target: String,

    /// Source format (csv, json, jsonl); inferred from the source extension when omitted
    #[arg(long = "from", value_name = "FMT")]
    from: Option<Format>,

    /// Target format; inferred from the target extension when omitted
    #[arg(long = "to", value_name = "FMT")]
    to: Option<Format>,

    /// CSV field delimiter
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// Indent JSON output
    #[arg(long)]
    pretty: bool,

    /// Directory that relative local paths resolve against
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,
}

fn resolve_format(explicit: Option<Format>, location: &Location, role: &str) -> Result<Format> {
    if let Some(format) = explicit {
        return Ok(format);
    }
    if location.medium() == Medium::Table {
        return Ok(Format::Csv);
    }
    match Format::from_path(&location.path()) {
        Some(format) => Ok(format),
        None => bail!("cannot infer the {role} format from {location}; pass --{role}"),
    }
}

fn build_storage(args: &Args, locations: [&Location; 2]) -> Result<Storage> {
    let mut storage = Storage::local();
    if let Some(root) = &args.root {
        storage = storage.with_root(root);
    }
    if locations
        .iter()
        .any(|l| l.medium() == Medium::ObjectStorage)
    {
        storage = with_object_store(storage)?;
    }
    Ok(storage)
}

#[cfg(feature = "s3")]
fn with_object_store(storage: Storage) -> Result<Storage> {
    use std::sync::Arc;
    use table_transfer::io::cloud::s3::S3ObjectIO;

    let client = S3ObjectIO::from_env().context("configure object storage")?;
    Ok(storage.with_object_store(Arc::new(client)))
}

#[cfg(not(feature = "s3"))]
fn with_object_store(storage: Storage) -> Result<Storage> {
    log::warn!("Built without the `s3` feature; object storage locations will fail");
    Ok(storage)
}

fn run(args: &Args) -> Result<()> {
    let source = Location::parse(&args.source).context("parse source location")?;
    let target = Location::parse(&args.target).context("parse target location")?;
    let from = resolve_format(args.from, &source, "from")?;
    let to = resolve_format(args.to, &target, "to")?;

    if !args.delimiter.is_ascii() {
        bail!("delimiter must be a single ASCII character, got {:?}", args.delimiter);
    }
    let options = CodecOptions {
        delimiter: args.delimiter as u8,
        pretty_json: args.pretty,
    };

    let storage = build_storage(args, [&source, &target])?;
    let mut transfer = TableTransfer::new(storage).with_options(options);
    transfer
        .ingest(&source, from)
        .with_context(|| format!("ingest {source} as {from}"))?;
    transfer
        .emit(&target, to)
        .with_context(|| format!("emit {target} as {to}"))?;
    Ok(())
}

/// A missing `.env` is fine; variables may come from the real environment.
fn dotenv_warning(err: &dotenvy::Error) -> Option<String> {
    (!err.not_found()).then(|| format!("Ignoring unreadable .env file: {err}"))
}

fn main() -> ExitCode {
    // Read before the logger so RUST_LOG can come from .env; reported once logging is up.
    let dotenv = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match &dotenv {
        Ok(path) => log::debug!("Loaded environment from {}", path.display()),
        Err(err) => {
            if let Some(warning) = dotenv_warning(err) {
                log::warn!("{warning}");
            }
        }
    }

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("table-transfer").chain(argv.iter().copied()))
            .unwrap()
    }

    #[test]
    fn formats_come_from_flags_then_medium_then_extension() {
        let people = Location::parse("people.json").unwrap();
        assert_eq!(
            resolve_format(Some(Format::JsonLines), &people, "from").unwrap(),
            Format::JsonLines
        );
        assert_eq!(resolve_format(None, &people, "from").unwrap(), Format::Json);

        let table = Location::parse("pg://public.people").unwrap();
        assert_eq!(resolve_format(None, &table, "to").unwrap(), Format::Csv);

        let err = resolve_format(None, &Location::parse("people.parquet").unwrap(), "to")
            .unwrap_err();
        assert!(err.to_string().contains("--to"), "{err}");
    }

    #[cfg(feature = "compression-gzip")]
    #[test]
    fn compressed_paths_infer_the_inner_format() {
        let loc = Location::parse("s3://reports/people.csv.gz").unwrap();
        assert_eq!(resolve_format(None, &loc, "from").unwrap(), Format::Csv);
    }

    #[test]
    fn non_ascii_delimiter_is_rejected() {
        let err = run(&args(&["in.csv", "out.json", "--delimiter", "é"])).unwrap_err();
        assert!(err.to_string().contains("delimiter"), "{err}");
    }

    #[test]
    fn local_transfers_need_no_object_client() {
        let a = args(&["in.csv", "out.json"]);
        let source = Location::parse(&a.source).unwrap();
        let target = Location::parse(&a.target).unwrap();
        let storage = build_storage(&a, [&source, &target]).unwrap();
        assert!(storage.supports_medium(Medium::Local));
        assert!(!storage.supports_medium(Medium::ObjectStorage));
    }

    #[test]
    fn only_missing_env_files_are_silent() {
        let missing = dotenvy::Error::Io(std::io::ErrorKind::NotFound.into());
        assert_eq!(dotenv_warning(&missing), None);

        let broken = dotenvy::Error::LineParse("KEY=\"open".to_string(), 4);
        let warning = dotenv_warning(&broken).unwrap();
        assert!(warning.contains("unreadable .env"), "{warning}");
    }

    #[test]
    fn run_copies_csv_to_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("in.txt"), "id;name\n1;alice\n").unwrap();
        let root = dir.path().to_str().unwrap();

        run(&args(&[
            "in.txt", "out.json", "--from", "csv", "--delimiter", ";", "--root", root,
        ]))
        .unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join("out.json")).unwrap(),
            r#"[{"id":1,"name":"alice"}]"#
        );
    }
}
