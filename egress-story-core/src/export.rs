//! Spreadsheet and CSV export of generated stories

use crate::config::{ExportConfig, ExportFormat};
use crate::error::{Result, StoryError};
use crate::pipeline::StoryRow;
use rust_xlsxwriter::{Format, FormatAlign, Workbook};
use tracing::debug;

/// Column titles and widths, in sheet order
const COLUMNS: [(&str, f64); 4] = [
    ("Index", 8.0),
    ("egress_job_name", 25.0),
    ("user_story", 120.0),
    ("timestamp", 25.0),
];

const STORY_COLUMN: u16 = 2;

/// Export rows in the configured format
pub fn export(rows: &[StoryRow], config: &ExportConfig) -> Result<Vec<u8>> {
    match config.format {
        ExportFormat::Xlsx => to_xlsx(rows, &config.sheet_name),
        ExportFormat::Csv => to_csv(rows),
    }
}

/// Build an xlsx workbook with one sheet of stories
///
/// The story column is wide and wraps, aligned to the top of the row.
pub fn to_xlsx(rows: &[StoryRow], sheet_name: &str) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let wrap = Format::new().set_text_wrap().set_align(FormatAlign::Top);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col, (title, width)) in COLUMNS.iter().enumerate() {
        let col = col as u16;
        worksheet.set_column_width(col, *width)?;
        worksheet.write_string_with_format(0, col, *title, &header)?;
    }
    worksheet.set_column_format(STORY_COLUMN, &wrap)?;

    for (offset, row) in rows.iter().enumerate() {
        let line = offset as u32 + 1;
        worksheet.write_number(line, 0, row.index as f64)?;
        worksheet.write_string(line, 1, &row.job_name)?;
        worksheet.write_string_with_format(line, STORY_COLUMN, &row.story, &wrap)?;
        worksheet.write_string(line, 3, &row.timestamp)?;
    }

    let buffer = workbook.save_to_buffer()?;
    debug!("Built xlsx workbook with {} rows ({} bytes)", rows.len(), buffer.len());
    Ok(buffer)
}

/// Build a CSV document with the same columns as the workbook
pub fn to_csv(rows: &[StoryRow]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(COLUMNS.iter().map(|(title, _)| *title))?;

    for row in rows {
        writer.write_record([
            row.index.to_string().as_str(),
            row.job_name.as_str(),
            row.story.as_str(),
            row.timestamp.as_str(),
        ])?;
    }

    writer.into_inner().map_err(|e| StoryError::export(e.to_string()))
}
