//! Raw table readers for CSV text and Excel workbooks

use crate::app::models::RawTable;
use crate::{Error, Result};
use calamine::{Data, Reader, Xlsx};
use chrono::Timelike;
use csv::{ByteRecord, ReaderBuilder, StringRecord};
use std::io::Cursor;
use tracing::debug;

/// Read CSV bytes into a raw table
///
/// The first record is the header row. Invalid UTF-8 is replaced rather than
/// rejected, and blank lines are skipped.
pub fn read_csv(name: &str, bytes: &[u8]) -> Result<RawTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .byte_headers()
        .map_err(|e| Error::csv_parsing(name, "Failed to read header row", Some(e)))?
        .iter()
        .map(lossy)
        .collect();

    if headers.iter().all(|header| header.trim().is_empty()) {
        return Err(Error::csv_parsing(name, "File has no header row", None));
    }

    let mut rows = Vec::new();
    let mut record = ByteRecord::new();
    loop {
        let more = reader.read_byte_record(&mut record).map_err(|e| {
            Error::csv_parsing(name, "Malformed CSV record", Some(e))
        })?;
        if !more {
            break;
        }
        if is_blank(record.iter()) {
            continue;
        }
        rows.push(record.iter().map(lossy).collect::<StringRecord>());
    }

    debug!("Read {} rows x {} columns from {}", rows.len(), headers.len(), name);
    Ok(RawTable::new(name, headers, rows))
}

/// Read the first worksheet of an `.xlsx` workbook into a raw table
pub fn read_xlsx(name: &str, bytes: &[u8]) -> Result<RawTable> {
    let mut workbook = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| Error::workbook(name, "Failed to open workbook", Some(e)))?;

    let sheet_names = workbook.sheet_names().to_vec();
    let first_sheet = sheet_names
        .first()
        .ok_or_else(|| Error::workbook(name, "Workbook has no sheets", None))?;

    let range = workbook
        .worksheet_range(first_sheet)
        .map_err(|e| Error::workbook(name, format!("Failed to read sheet '{}'", first_sheet), Some(e)))?;

    let mut sheet_rows = range.rows();
    let headers: Vec<String> = sheet_rows
        .next()
        .ok_or_else(|| Error::workbook(name, format!("Sheet '{}' is empty", first_sheet), None))?
        .iter()
        .map(cell_text)
        .collect();

    let rows: Vec<StringRecord> = sheet_rows
        .map(|row| row.iter().map(cell_text).collect::<Vec<String>>())
        .filter(|cells| !is_blank(cells.iter().map(String::as_bytes)))
        .map(StringRecord::from)
        .collect();

    debug!(
        "Read {} rows x {} columns from sheet '{}' of {}",
        rows.len(),
        headers.len(),
        first_sheet,
        name
    );
    Ok(RawTable::new(name, headers, rows))
}

fn lossy(field: &[u8]) -> String {
    String::from_utf8_lossy(field).into_owned()
}

fn is_blank<'a>(mut fields: impl Iterator<Item = &'a [u8]>) -> bool {
    fields.all(|field| field.iter().all(u8::is_ascii_whitespace))
}

/// Render a workbook cell as the text a CSV export would hold
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) if datetime.time().num_seconds_from_midnight() == 0 => {
                datetime.date().format("%Y-%m-%d").to_string()
            }
            Some(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => dt.as_f64().to_string(),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}
