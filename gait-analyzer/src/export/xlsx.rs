//! Excel report writer

use super::{ActivityReport, ExportError, ReportRow, ReportSink};
use gait_common::config::OutputFormat;
use gait_common::layout::{REPORT_HEADERS, REPORT_SHEET_NAME};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::Path;

/// Writes reports as a single-sheet `.xlsx` workbook
#[derive(Debug, Default)]
pub struct XlsxReportWriter;

impl XlsxReportWriter {
    pub fn new() -> Self {
        Self
    }
}

fn write_row(sheet: &mut Worksheet, row: u32, data: &ReportRow) -> Result<(), XlsxError> {
    sheet.write_string(row, 0, &data.label)?;
    sheet.write_string(row, 1, &data.side)?;
    sheet.write_string(row, 2, &data.day)?;
    for (offset, value) in data.values.iter().enumerate() {
        sheet.write_number(row, 3 + offset as u16, *value)?;
    }
    Ok(())
}

impl ReportSink for XlsxReportWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Xlsx
    }

    fn write(&self, report: &ActivityReport, path: &Path) -> Result<(), ExportError> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();

        let sheet = workbook.add_worksheet();
        sheet.set_name(REPORT_SHEET_NAME)?;

        for (col, header) in REPORT_HEADERS.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        }

        let mut row: u32 = 1;
        for data in &report.trial_rows {
            write_row(sheet, row, data)?;
            row += 1;
        }

        // blank separator row
        row += 1;

        for data in &report.average_rows {
            write_row(sheet, row, data)?;
            row += 1;
        }

        sheet.autofit();
        workbook.save(path)?;
        Ok(())
    }
}
