//! Spreadsheet exports

pub mod xlsx;

pub use xlsx::XlsxSpreadsheetWriter;
