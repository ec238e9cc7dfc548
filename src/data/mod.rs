//! Transaction data model, CSV loading, and export.

pub mod loader;
pub mod schema;

pub use loader::{DATE_FORMAT, from_reader, load, normalize, to_csv};
pub use schema::{COLUMNS, Channel, RawRecord, SalesTable, Transaction, WEEKDAYS, weekday_name};
