//! Spreadsheet export of the filtered test-case view.
//!
//! - `layout`: the fixed import-template layout
//! - `exporter`: empty guard, filename, file output

mod exporter;
mod layout;

pub use exporter::{ExportOutcome, ExportedFile, SpreadsheetExporter, export_filename};
pub use layout::{COLUMN_WIDTHS, HEADERS, LEADING_ROWS, SHEET_NAME, build_worksheet};
