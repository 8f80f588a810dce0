//! Tax office submission workbook

use std::path::Path;

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, XlsxError};
use smartcon_core::SpreadsheetWriter;
use smartcon_domain::constants::TAX_OFFICE_HEADERS;
use smartcon_domain::{Result, SmartconError, TaxOfficeReport};
use tracing::debug;

use crate::errors::InfraError;

const SHEET_NAME: &str = "세무서제출";
const HEADER_ROW: u32 = 3;
const COLUMN_WIDTHS: [f64; 4] = [8.0, 14.0, 20.0, 16.0];

/// Writes [`TaxOfficeReport`]s as a single-sheet `.xlsx`:
/// title, period line, header row, one row per worker and a 합계 row.
#[derive(Debug, Default, Clone, Copy)]
pub struct XlsxSpreadsheetWriter;

impl XlsxSpreadsheetWriter {
    pub fn new() -> Self {
        Self
    }
}

impl SpreadsheetWriter for XlsxSpreadsheetWriter {
    fn write_tax_office_report(&self, report: &TaxOfficeReport, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                SmartconError::Export(format!("cannot create {}: {e}", parent.display()))
            })?;
        }
        render(report, path).map_err(|e| SmartconError::from(InfraError::from(e)))?;
        debug!(path = %path.display(), rows = report.rows.len(), "workbook saved");
        Ok(())
    }
}

fn render(report: &TaxOfficeReport, path: &Path) -> std::result::Result<(), XlsxError> {
    let title = Format::new().set_bold().set_font_size(16).set_align(FormatAlign::Center);
    let header = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin)
        .set_background_color(0x00D9_E1F2);
    let cell = Format::new().set_border(FormatBorder::Thin);
    let money = Format::new().set_border(FormatBorder::Thin).set_num_format("#,##0");
    let total_label = Format::new().set_bold().set_border(FormatBorder::Thin);
    let total_money =
        Format::new().set_bold().set_border(FormatBorder::Thin).set_num_format("#,##0");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;
    for (col, width) in (0u16..).zip(COLUMN_WIDTHS) {
        sheet.set_column_width(col, width)?;
    }

    sheet.merge_range(0, 0, 0, 3, &report.title, &title)?;
    sheet.write_string(1, 0, report.period_label())?;

    for (col, label) in (0u16..).zip(TAX_OFFICE_HEADERS) {
        sheet.write_string_with_format(HEADER_ROW, col, label, &header)?;
    }

    let mut row = HEADER_ROW + 1;
    for line in &report.rows {
        sheet.write_number_with_format(row, 0, line.number as f64, &cell)?;
        sheet.write_string_with_format(row, 1, &line.name, &cell)?;
        sheet.write_string_with_format(row, 2, &line.id_number, &cell)?;
        sheet.write_number_with_format(row, 3, line.base_pay as f64, &money)?;
        row += 1;
    }

    sheet.merge_range(row, 0, row, 2, "합계", &total_label)?;
    sheet.write_number_with_format(row, 3, report.total_base_pay as f64, &total_money)?;

    workbook.save(path)
}
