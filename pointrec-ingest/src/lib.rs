//! pointrec-ingest: point-history export parsing (CSV) into core records.

pub mod parsers;

pub use parsers::points_csv::parse_points_csv;
