#[cfg(any(
    feature = "compression-gzip",
    feature = "compression-zstd",
    feature = "compression-bzip2",
    feature = "compression-xz"
))]
mod compression_tests {
    use anyhow::Result;
    use std::fs;
    use std::sync::Arc;
    use table_transfer::io::cloud::{FakeObjectIO, ObjectIO};
    use table_transfer::io::compression::{
        CompressionCodec, compress, decompress, register_codec, strip_compression_extension,
    };
    use table_transfer::testing::*;
    use table_transfer::{Format, Location, Storage, TableTransfer};

    #[cfg(feature = "compression-gzip")]
    #[test]
    fn gzip_csv_round_trip() -> Result<()> {
        let dir = TempDirPath::new()?;
        write_fixture(dir.path(), "people.csv", people_csv())?;
        let mut transfer = TableTransfer::local().with_root(dir.path());

        transfer.ingest(&Location::parse("people.csv")?, Format::Csv)?;
        transfer.emit(&Location::parse("people.csv.gz")?, Format::Csv)?;

        let raw = fs::read(dir.file_path("people.csv.gz"))?;
        assert_eq!(&raw[..2], &[0x1f, 0x8b]);

        transfer.clear();
        transfer.ingest(&Location::parse("people.csv.gz")?, Format::Csv)?;
        assert_datasets_equal(transfer.dataset().unwrap(), &people_dataset());
        Ok(())
    }

    #[cfg(feature = "compression-zstd")]
    #[test]
    fn zstd_json_in_object_storage() -> Result<()> {
        let client = FakeObjectIO::new();
        let storage = Storage::local().with_object_store(Arc::new(client.clone()));
        client.put_object("bucket", "people.csv", people_csv().as_bytes())?;
        let mut transfer = TableTransfer::new(storage);

        transfer.ingest(&Location::parse("s3://bucket/people.csv")?, Format::Csv)?;
        transfer.emit(&Location::parse("s3://bucket/people.json.zst")?, Format::Json)?;

        let raw = client.get_object("bucket", "people.json.zst")?;
        assert_eq!(&raw[..4], &[0x28, 0xb5, 0x2f, 0xfd]);

        transfer.ingest(&Location::parse("s3://bucket/people.json.zst")?, Format::Json)?;
        assert_datasets_equal(transfer.dataset().unwrap(), &people_dataset());
        Ok(())
    }

    struct Reverse;

    impl CompressionCodec for Reverse {
        fn name(&self) -> &str {
            "reverse"
        }

        fn extensions(&self) -> &[&str] {
            &[".rev"]
        }

        fn magic_bytes(&self) -> Option<&[u8]> {
            None
        }

        fn compress(&self, data: &[u8]) -> std::io::Result<Vec<u8>> {
            Ok(data.iter().rev().copied().collect())
        }

        fn decompress(&self, data: &[u8]) -> std::io::Result<Vec<u8>> {
            self.compress(data)
        }
    }

    #[test]
    fn custom_codec_registration() -> Result<()> {
        register_codec(Arc::new(Reverse));
        assert_eq!(compress(b"abc".to_vec(), "t.csv.rev")?, b"cba");
        assert_eq!(decompress(b"cba".to_vec(), "t.csv.rev")?, b"abc");
        assert_eq!(strip_compression_extension("t.csv.rev"), "t.csv");
        assert_eq!(Format::from_path("t.csv.rev"), Some(Format::Csv));
        Ok(())
    }
}
