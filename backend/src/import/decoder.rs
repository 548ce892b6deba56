//! Turns uploaded file bytes into a [`ParsedTable`].
//!
//! The format is chosen from the filename extension: `.csv` goes through the
//! `csv` reader, `.xlsx`/`.xls` through `calamine`. Both paths end in the same
//! shape: an ordered column list and one [`Row`] per data line.

use crate::error::ImportFailure;
use calamine::{open_workbook_auto_from_rs, Data, DataType, Reader};
use chrono::NaiveTime;
use common::model::row::Row;
use csv::{ReaderBuilder, Trim};
use std::collections::HashSet;
use std::io::Cursor;
use std::path::Path;

/// Decoded file content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTable {
    /// Header names in file order. Empty when the file has no data rows.
    pub columns: Vec<String>,
    /// Data rows in file order; each row only has keys listed in `columns`.
    pub rows: Vec<Row>,
}

/// Recognized file families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Spreadsheet,
}

impl FileFormat {
    /// Picks the format from `filename`'s extension, case-insensitively.
    pub fn from_filename(filename: &str) -> Result<Self, ImportFailure> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(FileFormat::Csv),
            "xlsx" | "xls" => Ok(FileFormat::Spreadsheet),
            _ => Err(ImportFailure::UnsupportedFormat(filename.to_string())),
        }
    }
}

/// Decodes `bytes` according to the extension of `filename`.
///
/// Fails with `UnsupportedFormat` before reading anything when the extension is
/// not recognized, and with `DuplicateHeader` when two columns share a name.
pub fn decode(bytes: &[u8], filename: &str) -> Result<ParsedTable, ImportFailure> {
    match FileFormat::from_filename(filename)? {
        FileFormat::Csv => decode_csv(bytes),
        FileFormat::Spreadsheet => decode_spreadsheet(bytes),
    }
}

fn decode_csv(bytes: &[u8]) -> Result<ParsedTable, ImportFailure> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(bytes);

    let header_record = reader
        .headers()
        .map_err(|e| ImportFailure::MalformedFile(e.to_string()))?
        .clone();
    let slots = header_slots(header_record.iter().map(str::to_string))?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ImportFailure::MalformedFile(e.to_string()))?;
        // Cells past the end of a short line are absent; cells without a header are dropped.
        let row: Row = slots
            .iter()
            .filter_map(|(idx, name)| record.get(*idx).map(|value| (name.as_str(), value)))
            .collect();
        rows.push(row);
    }

    let headers = slots.into_iter().map(|(_, name)| name).collect();

    Ok(finish(headers, rows))
}

fn decode_spreadsheet(bytes: &[u8]) -> Result<ParsedTable, ImportFailure> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| ImportFailure::MalformedFile(e.to_string()))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(|e| ImportFailure::MalformedFile(e.to_string()))?,
        None => return Ok(ParsedTable::default()),
    };

    let mut sheet_rows = range.rows();
    let header_cells = match sheet_rows.next() {
        Some(cells) => cells,
        None => return Ok(ParsedTable::default()),
    };

    let slots = header_slots(header_cells.iter().map(cell_text))?;

    let mut rows = Vec::new();
    for cells in sheet_rows {
        if cells.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }
        let row: Row = slots
            .iter()
            .map(|(idx, name)| {
                let text = cells.get(*idx).map(cell_text).unwrap_or_default();
                (name.as_str(), text)
            })
            .collect();
        rows.push(row);
    }

    let headers = slots.into_iter().map(|(_, name)| name).collect();
    Ok(finish(headers, rows))
}

/// Spreadsheet cell as text; empty cells become `""`, dates become ISO 8601.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_datetime() {
            Some(value) if value.time() == NaiveTime::MIN => value.format("%Y-%m-%d").to_string(),
            Some(value) => value.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => cell.to_string(),
        },
        other => other.to_string(),
    }
}

/// Pairs each header cell with its position, dropping blank headers and
/// rejecting names that appear twice.
fn header_slots(
    names: impl Iterator<Item = String>,
) -> Result<Vec<(usize, String)>, ImportFailure> {
    let mut seen = HashSet::new();
    let mut slots = Vec::new();
    for (idx, name) in names.enumerate() {
        let name = name.trim().to_string();
        if name.is_empty() {
            continue;
        }
        if !seen.insert(name.clone()) {
            return Err(ImportFailure::DuplicateHeader(name));
        }
        slots.push((idx, name));
    }
    Ok(slots)
}

// A header without any data row yields no columns, so callers see `NoHeaders`.
fn finish(headers: Vec<String>, rows: Vec<Row>) -> ParsedTable {
    if rows.is_empty() {
        return ParsedTable::default();
    }
    ParsedTable {
        columns: headers,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_rows_are_trimmed_and_blank_lines_skipped() {
        let data = b"Name , Email\n  Jo ,jo@a.com \n\nEd,ed@a.com\n";
        let table = decode(data, "leads.csv").unwrap();

        assert_eq!(table.columns, vec!["Name", "Email"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].get("Name"), Some("Jo"));
        assert_eq!(table.rows[0].get("Email"), Some("jo@a.com"));
        assert_eq!(table.rows[1].get("Name"), Some("Ed"));
    }

    #[test]
    fn extension_is_case_insensitive() {
        let table = decode(b"Email\nx@y.com\n", "LEADS.CSV").unwrap();
        assert_eq!(table.columns, vec!["Email"]);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = decode(b"Email\nx@y.com\n", "leads.txt").unwrap_err();
        assert!(matches!(err, ImportFailure::UnsupportedFormat(_)));

        let err = decode(b"Email\nx@y.com\n", "leads").unwrap_err();
        assert!(matches!(err, ImportFailure::UnsupportedFormat(_)));
    }

    #[test]
    fn header_only_file_has_no_columns() {
        let table = decode(b"Name,Email\n", "leads.csv").unwrap();
        assert!(table.columns.is_empty());
        assert!(table.rows.is_empty());

        let table = decode(b"", "leads.csv").unwrap();
        assert!(table.columns.is_empty());
    }

    #[test]
    fn short_rows_omit_missing_cells() {
        let table = decode(b"Name,Email,Phone\nJo,jo@a.com\n", "leads.csv").unwrap();
        let row = &table.rows[0];
        assert_eq!(row.get("Email"), Some("jo@a.com"));
        assert_eq!(row.get("Phone"), None);
        assert!(row.columns().all(|c| table.columns.iter().any(|h| h == c)));
    }

    #[test]
    fn quoted_fields_keep_embedded_commas() {
        let table = decode(b"Name,Email\n\"Doe, Jo\",jo@a.com\n", "leads.csv").unwrap();
        assert_eq!(table.rows[0].get("Name"), Some("Doe, Jo"));
    }

    #[test]
    fn duplicate_header_is_rejected() {
        let err = decode(b"Email,Name,Email\na@b.com,Jo,c@d.com\n", "leads.csv").unwrap_err();
        match err {
            ImportFailure::DuplicateHeader(name) => assert_eq!(name, "Email"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn blank_csv_header_cells_carry_no_column() {
        let table = decode(b"Name,Email,,\nJo,jo@a.com,,\n", "leads.csv").unwrap();
        assert_eq!(table.columns, vec!["Name", "Email"]);
        assert_eq!(table.rows[0].len(), 2);
        assert_eq!(table.rows[0].get("Email"), Some("jo@a.com"));

        let table = decode(b",Email\nignored,jo@a.com\n", "leads.csv").unwrap();
        assert_eq!(table.columns, vec!["Email"]);
        assert_eq!(table.rows[0].get("Email"), Some("jo@a.com"));
    }

    #[test]
    fn rows_keep_file_column_order() {
        let table = decode(b"Zip,Email,Age\n1,a@b.com,3\n", "leads.csv").unwrap();
        let order: Vec<&str> = table.rows[0].columns().collect();
        assert_eq!(order, vec!["Zip", "Email", "Age"]);
    }

    #[test]
    fn duplicate_spreadsheet_header_is_rejected() {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Email").unwrap();
        sheet.write_string(0, 1, " Email ").unwrap();
        sheet.write_string(1, 0, "a@b.com").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        match decode(&bytes, "leads.xlsx").unwrap_err() {
            ImportFailure::DuplicateHeader(name) => assert_eq!(name, "Email"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn garbage_spreadsheet_is_malformed() {
        let err = decode(b"definitely not a workbook", "leads.xlsx").unwrap_err();
        assert!(matches!(err, ImportFailure::MalformedFile(_)));
    }

    #[test]
    fn spreadsheet_cells_are_coerced_to_text() {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Email").unwrap();
        sheet.write_string(0, 1, "Phone").unwrap();
        sheet.write_string(0, 2, "Notes").unwrap();
        sheet.write_string(0, 3, "Signed Up").unwrap();
        sheet.write_string(1, 0, "jo@a.com").unwrap();
        sheet.write_number(1, 1, 5551234.0).unwrap();
        let date = rust_xlsxwriter::Format::new().set_num_format("yyyy-mm-dd");
        sheet.write_number_with_format(1, 3, 45296.0, &date).unwrap();
        sheet.write_string(3, 0, "ed@a.com").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let table = decode(&bytes, "leads.xlsx").unwrap();
        assert_eq!(table.columns, vec!["Email", "Phone", "Notes", "Signed Up"]);
        // The blank sheet row between the two records is skipped.
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].get("Phone"), Some("5551234"));
        assert_eq!(table.rows[0].get("Notes"), Some(""));
        assert_eq!(table.rows[0].get("Signed Up"), Some("2024-01-05"));
        assert_eq!(table.rows[1].get("Email"), Some("ed@a.com"));
        assert_eq!(table.rows[1].get("Phone"), Some(""));
    }
}
