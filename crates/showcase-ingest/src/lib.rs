//! Input ingestion: lenient delimited-text parsing and submission extraction.

pub mod csv;
pub mod extract;

pub use csv::parse;
pub use extract::{extract_records, extract_rows, SourceFields};
