//! Spreadsheet export of an owner's analysis history.
//!
//! Renders the records as a styled xlsx workbook: bold header row, row fill
//! keyed on the sentiment bucket, columns sized to content. Storage-only
//! fields (`id`, `owner`) are excluded.

use rust_xlsxwriter::{Color, Format, Workbook, Worksheet, XlsxError};
use thiserror::Error;

use crate::analysis::AnalysisRecord;

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Error types for export operations
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No records to export")]
    NoRecords,

    #[error("Workbook generation failed: {0}")]
    Workbook(String),
}

const HEADERS: [&str; 7] = [
    "Num",
    "Text",
    "Sentiment",
    "Priority",
    "Confidence",
    "Tags",
    "Timestamp",
];

/// Row fill for the three recognized sentiment buckets; anything else is
/// left unstyled.
fn sentiment_fill(sentiment: &str) -> Option<Color> {
    match sentiment {
        "Positive" => Some(Color::RGB(0xC6EFCE)),
        "Negative" => Some(Color::RGB(0xFFC7CE)),
        "Neutral" => Some(Color::RGB(0xEDEDED)),
        _ => None,
    }
}

fn write_str(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &str,
    format: Option<&Format>,
) -> ExportResult<()> {
    match format {
        Some(f) => worksheet.write_string_with_format(row, col, value, f),
        None => worksheet.write_string(row, col, value),
    }
    .map(|_| ())
    .map_err(workbook_error)
}

fn write_num(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: f64,
    format: Option<&Format>,
) -> ExportResult<()> {
    match format {
        Some(f) => worksheet.write_number_with_format(row, col, value, f),
        None => worksheet.write_number(row, col, value),
    }
    .map(|_| ())
    .map_err(workbook_error)
}

fn workbook_error(e: XlsxError) -> ExportError {
    ExportError::Workbook(e.to_string())
}

/// Renders the given records (already ordered by `num` ascending) into xlsx
/// bytes. Fails with [`ExportError::NoRecords`] when there is nothing to
/// export.
pub fn build_workbook(records: &[AnalysisRecord]) -> ExportResult<Vec<u8>> {
    if records.is_empty() {
        return Err(ExportError::NoRecords);
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(0x4472C4));

    let mut widths: Vec<usize> = HEADERS.iter().map(|h| h.len()).collect();

    for (col, title) in HEADERS.iter().enumerate() {
        write_str(worksheet, 0, col as u16, title, Some(&header_format))?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        let fill = sentiment_fill(&record.sentiment).map(|c| Format::new().set_background_color(c));
        let format = fill.as_ref();

        let tags = record.tags.join(", ");
        let timestamp = record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string();
        let confidence = format!("{:.2}", record.confidence);

        write_num(worksheet, row, 0, record.num as f64, format)?;
        write_str(worksheet, row, 1, &record.text, format)?;
        write_str(worksheet, row, 2, &record.sentiment, format)?;
        write_str(worksheet, row, 3, &record.priority, format)?;
        write_num(worksheet, row, 4, record.confidence, format)?;
        write_str(worksheet, row, 5, &tags, format)?;
        write_str(worksheet, row, 6, &timestamp, format)?;

        let cells = [
            record.num.to_string(),
            record.text.clone(),
            record.sentiment.clone(),
            record.priority.clone(),
            confidence,
            tags,
            timestamp,
        ];
        for (col, value) in cells.iter().enumerate() {
            widths[col] = widths[col].max(value.len());
        }
    }

    for (col, width) in widths.iter().enumerate() {
        // cap width for very long text columns
        let width = (*width).min(60) as f64 + 2.0;
        worksheet
            .set_column_width(col as u16, width)
            .map_err(workbook_error)?;
    }

    workbook.save_to_buffer().map_err(workbook_error)
}
