//! Minimal OOXML (XLSX) workbook writer.
//!
//! Produces a single-sheet workbook with inline strings, fixed column
//! widths and optional per-row heights. Enough for import templates;
//! no formulas, shared strings or number formats.

mod escape;
mod workbook;

pub use escape::{column_name, escape_cell_text};
pub use workbook::{SheetRow, Worksheet, write_workbook};
