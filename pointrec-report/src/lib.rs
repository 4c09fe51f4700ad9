//! pointrec-report: flat export rows with the source deployment's column
//! labels, plus a CSV writer for any computed view.

pub mod rows;
pub mod export;

pub use rows::{EarnCategoryRow, MerchantRow, ProductRow, UserRow};
pub use export::{default_export_filename, write_csv, ReportView};
