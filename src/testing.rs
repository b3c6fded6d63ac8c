//! Testing utilities for transfers.
//!
//! - **Fixtures**: Small datasets with known CSV and JSON renderings
//! - **Assertions**: Compare datasets with readable failure messages
//! - **Mock I/O**: Temporary directories and fixture files
//!
//! # Quick Start
//!
//! ```
//! use table_transfer::testing::*;
//! use table_transfer::{Format, Location, TableTransfer};
//!
//! # fn main() -> anyhow::Result<()> {
//! let dir = TempDirPath::new()?;
//! write_fixture(dir.path(), "people.csv", people_csv())?;
//!
//! let mut transfer = TableTransfer::local().with_root(dir.path());
//! transfer.ingest(&Location::parse("people.csv")?, Format::Csv)?;
//! assert_datasets_equal(transfer.dataset().unwrap(), &people_dataset());
//! # Ok(())
//! # }
//! ```

pub mod assertions;
pub mod fixtures;
pub mod mock_io;

pub use assertions::*;
pub use fixtures::*;
pub use mock_io::*;
