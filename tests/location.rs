use anyhow::Result;
use table_transfer::{ErrorKind, Format, Location, Medium};

#[test]
fn uri_forms() -> Result<()> {
    let cases = [
        ("people.csv", Medium::Local, None, "people.csv"),
        ("file:///srv/people.csv", Medium::Local, None, "/srv/people.csv"),
        ("s3://bucket/a/b.json", Medium::ObjectStorage, Some("bucket"), "a/b.json"),
        ("object://bucket/b.json", Medium::ObjectStorage, Some("bucket"), "b.json"),
        ("pg://public.people", Medium::Table, None, "public.people"),
    ];
    for (uri, medium, bucket, path) in cases {
        let loc: Location = uri.parse()?;
        assert_eq!(loc.medium(), medium, "{uri}");
        assert_eq!(loc.bucket(), bucket, "{uri}");
        assert_eq!(loc.path(), path, "{uri}");
    }
    Ok(())
}

#[test]
fn display_parses_back() -> Result<()> {
    for uri in ["s3://bucket/a/b.json", "pg://sales.orders", "data/people.csv"] {
        let loc = Location::parse(uri)?;
        assert_eq!(Location::parse(&loc.to_string())?, loc);
    }
    Ok(())
}

#[test]
fn invalid_parts_are_rejected() {
    assert_eq!(Location::local("").unwrap_err().kind, ErrorKind::InvalidInput);
    assert_eq!(
        Location::object("bucket", "").unwrap_err().kind,
        ErrorKind::InvalidInput
    );
    assert_eq!(
        Location::table("public", "drop table").unwrap_err().kind,
        ErrorKind::InvalidInput
    );
}

#[test]
fn format_inference_from_location_paths() -> Result<()> {
    assert_eq!(
        Format::from_path(&Location::parse("s3://b/x/people.jsonl")?.path()),
        Some(Format::JsonLines)
    );
    assert_eq!(Format::from_path("people"), None);
    Ok(())
}
